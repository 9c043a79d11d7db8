//! The sidebar "Component Library": a text input for new action templates
//! and a draggable list of the stored ones.  Dragging an entry tags the
//! DataTransfer and fills the session drag slot that the canvas drop
//! handler consumes.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DragEvent, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use crate::messages::Message;
use crate::state::{dispatch_global_message, APP_STATE};

const INPUT_PLACEHOLDER: &str = "Study..";
const INPUT_ERROR_PLACEHOLDER: &str = "Please enter a valid value";

/// Build the sidebar DOM into the `#sidebar` container.
pub fn setup_sidebar(document: &Document) -> Result<(), JsValue> {
    let sidebar = document
        .get_element_by_id("sidebar")
        .ok_or_else(|| JsValue::from_str("Sidebar container not found"))?;

    let heading = document.create_element("h3")?;
    heading.set_text_content(Some("Component Library"));
    sidebar.append_child(&heading)?;

    let row = document.create_element("div")?;
    row.set_class_name("new-action-row");

    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_id("new-action-input");
    input.set_type("text");
    input.set_placeholder(INPUT_PLACEHOLDER);
    row.append_child(&input)?;

    let add_btn = document.create_element("button")?;
    add_btn.set_id("add-action-button");
    add_btn.set_class_name("add-action-button");
    add_btn.set_text_content(Some("+"));
    row.append_child(&add_btn)?;

    sidebar.append_child(&row)?;

    let list = document.create_element("div")?;
    list.set_id("action-list");
    list.set_class_name("action-list");
    sidebar.append_child(&list)?;

    {
        let input = input.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: MouseEvent| {
            submit_new_action(&input);
        }));
        add_btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let input_for_key = input.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                event.prevent_default();
                submit_new_action(&input_for_key);
            }
        }));
        input.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

/// Blank and whitespace-only names are rejected: the field switches to an
/// error presentation instead of dispatching anything.
fn submit_new_action(input: &HtmlInputElement) {
    let value = input.value();
    if value.trim().is_empty() {
        input.set_value("");
        input.set_placeholder(INPUT_ERROR_PLACEHOLDER);
        let _ = input.class_list().add_1("input-error");
        return;
    }
    input.set_placeholder(INPUT_PLACEHOLDER);
    let _ = input.class_list().remove_1("input-error");
    dispatch_global_message(Message::AddTemplate(value));
    input.set_value("");
}

/// Clear and repopulate the action list from the current template state.
pub fn refresh_action_list(document: &Document) -> Result<(), JsValue> {
    let list = match document.get_element_by_id("action-list") {
        Some(el) => el,
        None => return Ok(()),
    };
    list.set_inner_html("");

    let templates = APP_STATE.with(|state| state.borrow().templates.clone());
    for template in templates {
        let entry: HtmlElement = document.create_element("div")?.dyn_into()?;
        entry.set_class_name("action-entry");
        entry.set_attribute("draggable", "true")?;

        let name_el = document.create_element("span")?;
        name_el.set_text_content(Some(&template.name));
        entry.append_child(&name_el)?;

        let delete_btn: HtmlElement = document.create_element("button")?.dyn_into()?;
        delete_btn.set_class_name("delete-action");
        delete_btn.set_inner_html("&times;");
        entry.append_child(&delete_btn)?;

        {
            let name = template.name.clone();
            let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: DragEvent| {
                if let Some(dt) = event.data_transfer() {
                    let _ = dt.set_data("text/plain", &name);
                    dt.set_effect_allowed("move");
                }
                dispatch_global_message(Message::SetDragTemplate(name.clone()));
            }));
            entry.add_event_listener_with_callback("dragstart", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }

        {
            let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_: DragEvent| {
                dispatch_global_message(Message::ClearDragTemplate);
            }));
            entry.add_event_listener_with_callback("dragend", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }

        {
            let id = template.id.clone();
            let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: MouseEvent| {
                event.stop_propagation();
                dispatch_global_message(Message::DeleteTemplate(id.clone()));
            }));
            delete_btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }

        list.append_child(&entry)?;
    }

    Ok(())
}
