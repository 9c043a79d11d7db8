//! Durable persistence for the flow and the sidebar template list.
//!
//! Everything lives in browser local storage under two fixed keys.  Read
//! failures of any kind (missing record, malformed JSON, storage disabled)
//! collapse into "nothing saved"; write failures are logged and surfaced as
//! a non-fatal warning by the caller.  A storage fault never unwinds into
//! the editor.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::constants::{FLOW_STORAGE_KEY, TEMPLATES_STORAGE_KEY};
use crate::models::{StoredFlow, TemplateAction};

/// Grab local storage, or `None` when the browser has it disabled.
pub fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Serialize the complete diagram under the fixed key, overwriting any prior
/// record.
pub fn save_flow(storage: &Storage, flow: &StoredFlow) -> Result<(), JsValue> {
    let json = serde_json::to_string(flow).map_err(|e| JsValue::from_str(&e.to_string()))?;
    storage.set_item(FLOW_STORAGE_KEY, &json)
}

/// Read the saved flow.  Absent and unparsable records are both an explicit
/// "no saved flow" outcome, never an error.
pub fn read_flow(storage: &Storage) -> Option<StoredFlow> {
    let raw = storage.get_item(FLOW_STORAGE_KEY).ok().flatten()?;
    let parsed = parse_flow(&raw);
    if parsed.is_none() {
        web_sys::console::warn_1(&"Ignoring unreadable saved flow record".into());
    }
    parsed
}

/// Delete the durable record.  Failure to delete is swallowed; clearing the
/// in-memory graph must succeed regardless.
pub fn clear_flow(storage: &Storage) {
    if let Err(e) = storage.remove_item(FLOW_STORAGE_KEY) {
        web_sys::console::warn_1(&format!("Failed to clear saved flow: {:?}", e).into());
    }
}

pub fn save_templates(storage: &Storage, templates: &[TemplateAction]) -> Result<(), JsValue> {
    let json = serde_json::to_string(templates).map_err(|e| JsValue::from_str(&e.to_string()))?;
    storage.set_item(TEMPLATES_STORAGE_KEY, &json)
}

pub fn load_templates(storage: &Storage) -> Option<Vec<TemplateAction>> {
    let raw = storage.get_item(TEMPLATES_STORAGE_KEY).ok().flatten()?;
    parse_templates(&raw)
}

fn parse_flow(raw: &str) -> Option<StoredFlow> {
    serde_json::from_str(raw).ok()
}

fn parse_templates(raw: &str) -> Option<Vec<TemplateAction>> {
    serde_json::from_str(raw).ok()
}
