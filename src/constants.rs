// Fixed local-storage slots.
pub const FLOW_STORAGE_KEY: &str = "ideaflow";
pub const TEMPLATES_STORAGE_KEY: &str = "ideaflow-actions";

// Node footprint on the canvas.
pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 100.0;
pub const HANDLE_RADIUS: f64 = 5.0;

// Camera limits for interactive zooming.
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 4.0;

// Image export geometry.
pub const IMAGE_WIDTH: f64 = 1024.0;
pub const IMAGE_HEIGHT: f64 = 768.0;
pub const EXPORT_PADDING: f64 = 50.0;
pub const EXPORT_MIN_ZOOM: f64 = 0.5;
pub const EXPORT_MAX_ZOOM: f64 = 2.0;
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

// Saves triggered by the pointer leaving the canvas are debounced.
pub const SAVE_DEBOUNCE_MS: u64 = 400;

// Canvas colors
pub const CANVAS_BACKGROUND_COLOR: &str = "#ffffff";
pub const GRID_DOT_COLOR: &str = "#e5e7e9";
pub const NODE_FILL_COLOR: &str = "#f9fbfc";
pub const NODE_BORDER_DEFAULT: &str = "#e2e2e2";
pub const NODE_BORDER_SELECTED: &str = "#86418d";
pub const NODE_LABEL_COLOR: &str = "#1f2428";
pub const NODE_TEXT_COLOR: &str = "#5a6268";
pub const EDGE_COLOR: &str = "#9aa4ab";
pub const HANDLE_COLOR: &str = "#86418d";

// Seed templates shown before the user has stored any of their own.
pub const DEFAULT_TEMPLATES: [&str; 4] = ["Idea", "Research", "Prototype", "Launch"];
