use wasm_bindgen::prelude::*;

mod canvas;
mod components;
mod constants;
mod export;
mod graph;
mod messages;
mod models;
mod node_builder;
mod state;
mod storage;
mod toast;
mod ui;
mod update;
mod utils;

// Browser-only round-trip tests (run with wasm-pack test).
#[cfg(all(test, target_arch = "wasm32"))]
mod persistence_tests;

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");

    // Static page scaffold, then the interactive components.
    ui::setup::create_base_ui(&document)?;
    components::canvas_editor::setup_canvas(&document)?;
    ui::events::setup_ui_event_handlers(&document)?;

    // The sidebar renders from the template list, so load that slot first.
    state::load_templates_on_start();
    components::sidebar::setup_sidebar(&document)?;
    components::sidebar::refresh_action_list(&document)?;

    // Restore the last saved flow once on mount.  When no record exists the
    // canvas simply starts empty.
    state::dispatch_global_message(messages::Message::RestoreFlow);

    Ok(())
}
