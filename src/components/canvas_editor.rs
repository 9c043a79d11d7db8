//! The canvas surface: element setup, drop handling, and the mouse/wheel
//! gestures (node drag, canvas pan, connect-from-handle, zoom).  Every
//! gesture is translated into a `Message`; no graph logic lives here.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, DragEvent, Element, HtmlCanvasElement,
    HtmlTextAreaElement, KeyboardEvent, MouseEvent, WheelEvent,
};

use crate::canvas::shapes::{handle_position, SOURCE_HANDLES, TARGET_HANDLES};
use crate::constants::{HANDLE_RADIUS, NODE_HEIGHT, NODE_WIDTH};
use crate::messages::Message;
use crate::models::Position;
use crate::state::{dispatch_global_message, AppState, APP_STATE};

/// Create the `<canvas>` inside `#canvas-container` and wire every listener.
pub fn setup_canvas(document: &Document) -> Result<(), JsValue> {
    let container = document
        .get_element_by_id("canvas-container")
        .ok_or_else(|| JsValue::from_str("Canvas container not found"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_id("flow-canvas");
    container.append_child(&canvas)?;

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    APP_STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.canvas = Some(canvas.clone());
        state.context = Some(context);
    });

    fit_canvas_to_container(&container, &canvas);

    attach_drop_handlers(&canvas)?;
    attach_mouse_handlers(document, &canvas)?;
    attach_wheel_handler(&canvas)?;
    attach_keyboard_handler(document)?;
    attach_resize_handler(container, canvas)?;

    Ok(())
}

/// Match the canvas backing store to the container size and the device
/// pixel ratio, and tell the reducer about the new logical size.
fn fit_canvas_to_container(container: &Element, canvas: &HtmlCanvasElement) {
    let width = container.client_width() as f64;
    let height = container.client_height() as f64;
    let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);

    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", width));
    let _ = style.set_property("height", &format!("{}px", height));

    dispatch_global_message(Message::CanvasResized { width, height });
}

fn attach_drop_handlers(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let ondragover = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: DragEvent| {
        event.prevent_default();
        if let Some(dt) = event.data_transfer() {
            dt.set_drop_effect("move");
        }
    }));
    canvas.add_event_listener_with_callback("dragover", ondragover.as_ref().unchecked_ref())?;
    ondragover.forget();

    let target = canvas.clone();
    let ondrop = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: DragEvent| {
        event.prevent_default();
        let (x, y) = relative_position(&target, event.client_x(), event.client_y());
        dispatch_global_message(Message::CanvasDrop { x, y });
    }));
    canvas.add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
    ondrop.forget();

    Ok(())
}

fn attach_mouse_handlers(document: &Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    // mousedown: source handle beats node body beats empty canvas.
    {
        let target = canvas.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = relative_position(&target, event.client_x(), event.client_y());
            let action = APP_STATE.with(|state| {
                let state = state.borrow();
                let flow = state.screen_to_flow(x, y);
                if let Some((node_id, handle)) = handle_at(&state, flow, &SOURCE_HANDLES) {
                    return MouseDown::Connect { node_id, handle, flow };
                }
                if let Some(node_id) = node_at(&state, flow) {
                    let position = state.nodes[&node_id].position;
                    return MouseDown::Drag {
                        node_id,
                        offset_x: flow.x - position.x,
                        offset_y: flow.y - position.y,
                    };
                }
                MouseDown::Pan
            });
            match action {
                MouseDown::Connect { node_id, handle, flow } => {
                    dispatch_global_message(Message::PointerMoved { x: flow.x, y: flow.y });
                    dispatch_global_message(Message::StartConnection {
                        source: node_id,
                        source_handle: handle,
                    });
                }
                MouseDown::Drag { node_id, offset_x, offset_y } => {
                    dispatch_global_message(Message::SelectNode(Some(node_id.clone())));
                    dispatch_global_message(Message::StartNodeDrag { node_id, offset_x, offset_y });
                }
                MouseDown::Pan => {
                    dispatch_global_message(Message::SelectNode(None));
                    dispatch_global_message(Message::StartPan { x, y });
                }
            }
        }));
        canvas.add_event_listener_with_callback("mousedown", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // mousemove: feed whichever gesture is active.
    {
        let target = canvas.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = relative_position(&target, event.client_x(), event.client_y());
            let (flow, dragging, panning) = APP_STATE.with(|state| {
                let state = state.borrow();
                let flow = state.screen_to_flow(x, y);
                let dragging = state
                    .dragging
                    .clone()
                    .map(|id| (id, state.drag_offset_x, state.drag_offset_y));
                (flow, dragging, state.panning)
            });

            dispatch_global_message(Message::PointerMoved { x: flow.x, y: flow.y });
            if let Some((node_id, offset_x, offset_y)) = dragging {
                dispatch_global_message(Message::UpdateNodePosition {
                    node_id,
                    x: flow.x - offset_x,
                    y: flow.y - offset_y,
                });
            } else if panning {
                dispatch_global_message(Message::UpdatePan { x, y });
            }
        }));
        canvas.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // mouseup: complete or cancel whatever was in flight.
    {
        let target = canvas.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = relative_position(&target, event.client_x(), event.client_y());
            let (connecting, dragging, panning, drop_target) = APP_STATE.with(|state| {
                let state = state.borrow();
                let flow = state.screen_to_flow(x, y);
                (
                    state.connecting.is_some(),
                    state.dragging.is_some(),
                    state.panning,
                    handle_at(&state, flow, &TARGET_HANDLES),
                )
            });

            if connecting {
                match drop_target {
                    Some((node_id, handle)) => dispatch_global_message(Message::CompleteConnection {
                        target: node_id,
                        target_handle: handle,
                    }),
                    None => dispatch_global_message(Message::CancelConnection),
                }
            }
            if dragging {
                dispatch_global_message(Message::StopNodeDrag);
            }
            if panning {
                dispatch_global_message(Message::StopPan);
            }
        }));
        canvas.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Leaving the canvas persists outstanding edits (debounced).
    {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::AutoSave { now_ms: crate::utils::now_ms() });
        }));
        canvas.add_event_listener_with_callback("mouseleave", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Double-click opens the in-node text editor overlay.
    {
        let target = canvas.clone();
        let doc = document.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = relative_position(&target, event.client_x(), event.client_y());
            let node_id = APP_STATE.with(|state| {
                let state = state.borrow();
                let flow = state.screen_to_flow(x, y);
                node_at(&state, flow)
            });
            if let Some(node_id) = node_id {
                if let Err(e) = open_text_editor(&doc, &node_id) {
                    web_sys::console::warn_1(&format!("Failed to open editor: {:?}", e).into());
                }
            }
        }));
        canvas.add_event_listener_with_callback("dblclick", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

fn attach_wheel_handler(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let target = canvas.clone();
    let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        let (x, y) = relative_position(&target, event.client_x(), event.client_y());
        let factor = if event.delta_y() < 0.0 { 1.1 } else { 1.0 / 1.1 };
        let new_zoom = APP_STATE.with(|state| state.borrow().zoom_level) * factor;
        dispatch_global_message(Message::Zoom { new_zoom, focus_x: x, focus_y: y });
    }));
    canvas.add_event_listener_with_callback("wheel", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn attach_keyboard_handler(document: &Document) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: KeyboardEvent| {
        // Don't hijack Delete while the user is typing.
        if let Some(target) = event.target() {
            if let Some(el) = target.dyn_ref::<Element>() {
                let tag = el.tag_name();
                if tag == "INPUT" || tag == "TEXTAREA" {
                    return;
                }
            }
        }
        match event.key().as_str() {
            "Delete" | "Backspace" => dispatch_global_message(Message::DeleteSelectedNode),
            _ => {}
        }
    }));
    document.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn attach_resize_handler(container: Element, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: web_sys::Event| {
        fit_canvas_to_container(&container, &canvas);
    }));
    window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

enum MouseDown {
    Connect { node_id: String, handle: String, flow: Position },
    Drag { node_id: String, offset_x: f64, offset_y: f64 },
    Pan,
}

/// Pointer coordinates relative to the canvas origin.
fn relative_position(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn node_at(state: &AppState, flow: Position) -> Option<String> {
    state
        .nodes
        .values()
        .find(|node| {
            flow.x >= node.position.x
                && flow.x <= node.position.x + NODE_WIDTH
                && flow.y >= node.position.y
                && flow.y <= node.position.y + NODE_HEIGHT
        })
        .map(|node| node.id.clone())
}

/// The handle dot (of the given kinds) under the pointer, with a little
/// extra tolerance so the dots are easy to grab.
fn handle_at(state: &AppState, flow: Position, handles: &[&str]) -> Option<(String, String)> {
    let grab = HANDLE_RADIUS + 4.0;
    for node in state.nodes.values() {
        for handle in handles {
            let (hx, hy) = handle_position(node.position, handle);
            let (dx, dy) = (flow.x - hx, flow.y - hy);
            if dx * dx + dy * dy <= grab * grab {
                return Some((node.id.clone(), handle.to_string()));
            }
        }
    }
    None
}

/// Absolutely positioned `<textarea>` over the node; commits on blur.
fn open_text_editor(document: &Document, node_id: &str) -> Result<(), JsValue> {
    let container = document
        .get_element_by_id("canvas-container")
        .ok_or_else(|| JsValue::from_str("Canvas container not found"))?;

    let placement = APP_STATE.with(|state| {
        let state = state.borrow();
        state.nodes.get(node_id).map(|node| {
            let (sx, sy) = state.flow_to_screen(node.position);
            (sx, sy, state.zoom_level, node.data.text.clone().unwrap_or_default())
        })
    });
    let (sx, sy, zoom, text) = match placement {
        Some(p) => p,
        None => return Ok(()),
    };

    let editor: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    editor.set_class_name("node-text-editor");
    editor.set_value(&text);
    editor.set_placeholder("Type your thoughts here...");
    let style = editor.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("left", &format!("{}px", sx));
    let _ = style.set_property("top", &format!("{}px", sy + 30.0 * zoom));
    let _ = style.set_property("width", &format!("{}px", NODE_WIDTH * zoom));
    let _ = style.set_property("height", &format!("{}px", (NODE_HEIGHT - 30.0) * zoom));
    container.append_child(&editor)?;
    let _ = editor.focus();

    {
        let editor_for_blur = editor.clone();
        let node_id = node_id.to_string();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: web_sys::Event| {
            dispatch_global_message(Message::UpdateNodeText {
                node_id: node_id.clone(),
                text: editor_for_blur.value(),
            });
            editor_for_blur.remove();
        }));
        editor.add_event_listener_with_callback("blur", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}
