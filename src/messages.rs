// src/messages.rs
//
// The discrete user intents the editor reacts to, and the side effects the
// reducer can queue.

use crate::models::StoredFlow;

#[derive(Debug, Clone)]
pub enum Message {
    // Sidebar template list
    AddTemplate(String),
    DeleteTemplate(String),

    // Drag payload slot, set on dragstart and cleared on dragend
    SetDragTemplate(String),
    ClearDragTemplate,

    // A drop on the canvas; coordinates are screen pixels relative to the
    // canvas origin
    CanvasDrop { x: f64, y: f64 },

    // Connect gesture: press on a source handle, release on a target handle
    StartConnection { source: String, source_handle: String },
    CompleteConnection { target: String, target_handle: String },
    CancelConnection,

    // Node manipulation
    SelectNode(Option<String>),
    StartNodeDrag { node_id: String, offset_x: f64, offset_y: f64 },
    UpdateNodePosition { node_id: String, x: f64, y: f64 },
    StopNodeDrag,
    UpdateNodeText { node_id: String, text: String },
    DeleteSelectedNode,

    // Pointer position in flow coordinates; feeds the pending connection line
    PointerMoved { x: f64, y: f64 },

    // Camera
    StartPan { x: f64, y: f64 },
    UpdatePan { x: f64, y: f64 },
    StopPan,
    Zoom { new_zoom: f64, focus_x: f64, focus_y: f64 },
    CenterView,
    CanvasResized { width: f64, height: f64 },

    // Persistence
    SaveFlow,
    RestoreFlow,
    ApplyRestoredFlow(StoredFlow),
    ClearFlow,
    AutoSave { now_ms: u64 },

    // Export
    DownloadImage,
}

/// Side effects queued by the reducer; executed by `dispatch_global_message`
/// after the state borrow is released.
pub enum Command {
    /// Chain another message to be processed
    SendMessage(Message),

    /// Execute a UI update function after state changes
    UpdateUI(Box<dyn FnOnce() + 'static>),

    /// Write the current flow to durable storage
    SaveFlow,

    /// Write the template list to its own storage slot
    SaveTemplates,

    /// Re-read the durable flow record and apply it
    RestoreFlow,

    /// Delete the durable flow record
    ClearStorage,

    /// Render the flow to a PNG and trigger a download
    ExportImage,

    /// Represents no side effect
    NoOp,
}

#[allow(dead_code)] // Helpers kept for reducer ergonomics
impl Command {
    /// Helper to create a SendMessage command
    pub fn send(msg: Message) -> Self {
        Command::SendMessage(msg)
    }

    /// Helper to create a NoOp command
    pub fn none() -> Self {
        Command::NoOp
    }

    /// Helper to create an UpdateUI command
    pub fn update_ui<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Command::UpdateUI(Box::new(f))
    }
}
