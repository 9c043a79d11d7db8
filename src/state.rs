//! Global application state and the dispatch loop.
//!
//! State lives in a `thread_local` `RefCell`; `dispatch_global_message`
//! runs the reducer inside one borrow, then executes the queued commands
//! (storage writes, restores, UI refreshes) after the borrow is released so
//! a storage fault can never leave a half-applied mutation behind.

use std::cell::RefCell;
use std::collections::HashMap;

use uuid::Uuid;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::constants::DEFAULT_TEMPLATES;
use crate::graph::{ConnectionGuard, ConnectionProposal};
use crate::messages::{Command, Message};
use crate::models::{Edge, Node, Position, StoredFlow, TemplateAction, Viewport};
use crate::storage;
use crate::update::update;

pub struct AppState {
    // The flow graph: nodes keyed by id, edges as a flat list.
    pub nodes: HashMap<String, Node>,
    pub edges: Vec<Edge>,

    // Sidebar template list, persisted in its own slot.
    pub templates: Vec<TemplateAction>,

    /// Single-slot drag payload: the template name picked up on dragstart,
    /// consumed by the canvas drop handler.  Session state, not persisted.
    pub drag_template: Option<String>,

    /// Gate for edge creation, including notification de-dup state.
    pub guard: ConnectionGuard,

    // Camera: flow coordinates of the canvas origin plus zoom.
    pub viewport_x: f64,
    pub viewport_y: f64,
    pub zoom_level: f64,

    // Canvas and rendering
    pub canvas: Option<HtmlCanvasElement>,
    pub context: Option<CanvasRenderingContext2d>,
    pub canvas_width: f64,
    pub canvas_height: f64,

    // Interaction state
    pub selected_node_id: Option<String>,
    pub dragging: Option<String>,
    pub drag_offset_x: f64,
    pub drag_offset_y: f64,
    pub panning: bool,
    pub pan_last_x: f64,
    pub pan_last_y: f64,
    /// In-progress connect gesture: (source node id, source handle).
    pub connecting: Option<(String, String)>,
    // Last pointer position in flow coordinates, for the pending line.
    pub pointer_x: f64,
    pub pointer_y: f64,

    // Whether the flow changed since the last save, and when that was.
    pub state_modified: bool,
    pub last_saved_ms: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            templates: Vec::new(),
            drag_template: None,
            guard: ConnectionGuard::new(),
            viewport_x: 0.0,
            viewport_y: 0.0,
            zoom_level: 1.0,
            canvas: None,
            context: None,
            canvas_width: 800.0,
            canvas_height: 600.0,
            selected_node_id: None,
            dragging: None,
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
            panning: false,
            pan_last_x: 0.0,
            pan_last_y: 0.0,
            connecting: None,
            pointer_x: 0.0,
            pointer_y: 0.0,
            state_modified: false,
            last_saved_ms: 0,
        }
    }

    /// Convert pointer coordinates (pixels relative to the canvas origin)
    /// into flow coordinates.
    pub fn screen_to_flow(&self, x: f64, y: f64) -> Position {
        Position {
            x: x / self.zoom_level + self.viewport_x,
            y: y / self.zoom_level + self.viewport_y,
        }
    }

    /// Inverse of `screen_to_flow`; used to place DOM overlays over nodes.
    pub fn flow_to_screen(&self, position: Position) -> (f64, f64) {
        (
            (position.x - self.viewport_x) * self.zoom_level,
            (position.y - self.viewport_y) * self.zoom_level,
        )
    }

    pub fn viewport(&self) -> Viewport {
        Viewport { x: self.viewport_x, y: self.viewport_y, zoom: self.zoom_level }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport_x = viewport.x;
        self.viewport_y = viewport.y;
        self.zoom_level = viewport.zoom;
    }

    /// Commit an accepted connection proposal as a new edge.
    pub fn add_edge(&mut self, proposal: ConnectionProposal) -> String {
        let id = format!("flowedge-{}", Uuid::new_v4());
        self.edges.push(Edge {
            id: id.clone(),
            source: proposal.source,
            target: proposal.target,
            source_handle: proposal.source_handle,
            target_handle: proposal.target_handle,
        });
        id
    }

    /// Snapshot of everything the durable record carries.
    pub fn stored_flow(&self) -> StoredFlow {
        StoredFlow {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.clone(),
            viewport: self.viewport(),
        }
    }

    /// Replace the in-memory graph and camera with a restored record.
    pub fn apply_flow(&mut self, flow: StoredFlow) {
        self.nodes = flow.nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        self.edges = flow.edges;
        self.set_viewport(flow.viewport);
        self.selected_node_id = None;
        self.connecting = None;
        self.dragging = None;
        self.guard.reset();
        self.state_modified = false;
    }

    /// Run the reducer for one message and collect the commands it queued.
    /// Returns the commands plus whether the canvas needs a redraw.
    pub fn dispatch(&mut self, msg: Message) -> (Vec<Command>, bool) {
        let mut cmds = Vec::new();
        let dirty = update(self, &msg, &mut cmds);
        (cmds, dirty)
    }
}

// We use thread_local to store our app state
thread_local! {
    pub static APP_STATE: RefCell<AppState> = RefCell::new(AppState::new());
}

/// Dispatch a message: reduce, run queued commands, redraw if needed.
pub fn dispatch_global_message(msg: Message) {
    let (cmds, dirty) = APP_STATE.with(|state| state.borrow_mut().dispatch(msg));
    run_commands(cmds);
    if dirty {
        draw_current();
    }
}

fn run_commands(cmds: Vec<Command>) {
    for cmd in cmds {
        match cmd {
            Command::SendMessage(msg) => dispatch_global_message(msg),
            Command::UpdateUI(f) => f(),
            Command::SaveFlow => save_flow_now(),
            Command::SaveTemplates => save_templates_now(),
            Command::RestoreFlow => restore_flow_now(),
            Command::ClearStorage => {
                if let Some(store) = storage::local_storage() {
                    storage::clear_flow(&store);
                }
            }
            Command::ExportImage => export_now(),
            Command::NoOp => {}
        }
    }
}

fn draw_current() {
    APP_STATE.with(|state| {
        crate::canvas::renderer::draw(&state.borrow());
    });
}

fn save_flow_now() {
    let flow = APP_STATE.with(|state| state.borrow().stored_flow());
    match storage::local_storage() {
        Some(store) => {
            if let Err(e) = storage::save_flow(&store, &flow) {
                web_sys::console::warn_1(&format!("Failed to save flow: {:?}", e).into());
                crate::toast::error("Could not save your flow");
            }
        }
        None => crate::toast::error("Storage is unavailable; flow not saved"),
    }
}

fn save_templates_now() {
    let templates = APP_STATE.with(|state| state.borrow().templates.clone());
    if let Some(store) = storage::local_storage() {
        if let Err(e) = storage::save_templates(&store, &templates) {
            web_sys::console::warn_1(&format!("Failed to save actions: {:?}", e).into());
        }
    }
}

fn restore_flow_now() {
    let store = match storage::local_storage() {
        Some(s) => s,
        None => return,
    };
    match storage::read_flow(&store) {
        Some(flow) => dispatch_global_message(Message::ApplyRestoredFlow(flow)),
        None => web_sys::console::log_1(&"No saved flow to restore".into()),
    }
}

fn export_now() {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let result = APP_STATE.with(|state| crate::export::export_png(&document, &state.borrow()));
    if let Err(e) = result {
        web_sys::console::error_1(&format!("Image export failed: {:?}", e).into());
        crate::toast::error("Could not export the image");
    }
}

/// Populate the template list from storage (or the built-in defaults) before
/// the first sidebar render.
pub fn load_templates_on_start() {
    let stored = storage::local_storage().and_then(|store| storage::load_templates(&store));
    let templates = stored.unwrap_or_else(|| {
        DEFAULT_TEMPLATES
            .iter()
            .map(|name| TemplateAction { id: Uuid::new_v4().to_string(), name: name.to_string() })
            .collect()
    });
    APP_STATE.with(|state| {
        state.borrow_mut().templates = templates;
    });
}
