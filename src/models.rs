use serde::{Deserialize, Serialize};

/// Rendering variant of a node.  `Note` nodes carry an editable body text
/// below the label; `Default` nodes render the label only.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Default,
    Note,
}

/// A point in flow coordinates (the logical canvas space, before the camera
/// transform is applied).
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct NodeData {
    /// Set once at creation from the dropped template name.
    pub label: String,
    /// Free text typed into the node body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A visual element on the canvas.  Identity is immutable once created;
/// position is moved around by the drag handling.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData,
}

/// A directed connection, source -> target.  Parallel edges between the same
/// ordered pair are allowed; self-loops never pass the connection guard.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Camera transform over the canvas: `x`/`y` are the flow coordinates of the
/// canvas origin, `zoom` the scale factor.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub struct Viewport {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

/// The durable record written to local storage.  Every field is defaulted so
/// partial or legacy records still restore.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct StoredFlow {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub viewport: Viewport,
}

/// A named, reusable node blueprint listed in the sidebar.  Lives in its own
/// storage slot, independent of the flow record.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct TemplateAction {
    pub id: String,
    pub name: String,
}
