//! Toolbar button handlers.  Each button dispatches one message; the
//! reducer and command layer do the rest.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MouseEvent};

use crate::{messages::Message, state::dispatch_global_message};

/// Entry point - call once after the base UI was rendered.
pub fn setup_ui_event_handlers(document: &Document) -> Result<(), JsValue> {
    setup_save_button_handler(document)?;
    setup_restore_button_handler(document)?;
    setup_clear_button_handler(document)?;
    setup_center_view_button_handler(document)?;
    setup_download_button_handler(document)?;
    Ok(())
}

fn setup_save_button_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("save-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::SaveFlow);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

/// Restore re-reads the durable record and overwrites unsaved edits.
fn setup_restore_button_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("restore-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::RestoreFlow);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_clear_button_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("clear-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let confirm = window
                .confirm_with_message("Clear all nodes and the saved flow? This cannot be undone.")
                .unwrap_or(false);
            if confirm {
                dispatch_global_message(Message::ClearFlow);
            }
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_center_view_button_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("center-view-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::CenterView);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_download_button_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("download-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::DownloadImage);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}
