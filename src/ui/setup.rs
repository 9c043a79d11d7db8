//! Base page scaffold: sidebar slot, header with the toolbar, and the
//! canvas container.  Components fill these containers afterwards.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// Build the static page structure under `<body>`.
pub fn create_base_ui(document: &Document) -> Result<(), JsValue> {
    ensure_layout_styles(document)?;

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let root = document.create_element("div")?;
    root.set_id("app-root");
    body.append_child(&root)?;

    let sidebar = document.create_element("div")?;
    sidebar.set_id("sidebar");
    root.append_child(&sidebar)?;

    let main_panel = document.create_element("div")?;
    main_panel.set_id("main-panel");
    root.append_child(&main_panel)?;

    let header = document.create_element("div")?;
    header.set_id("header");
    let title = document.create_element("h2")?;
    title.set_text_content(Some("Your Ideas to Actions!"));
    header.append_child(&title)?;
    header.append_child(&create_toolbar(document)?.into())?;
    main_panel.append_child(&header)?;

    let canvas_container = document.create_element("div")?;
    canvas_container.set_id("canvas-container");
    main_panel.append_child(&canvas_container)?;

    Ok(())
}

fn create_toolbar(document: &Document) -> Result<Element, JsValue> {
    let toolbar = document.create_element("div")?;
    toolbar.set_id("toolbar");

    for (id, label) in [
        ("save-button", "Save"),
        ("restore-button", "Restore"),
        ("clear-button", "Clear"),
        ("center-view-button", "Center View"),
        ("download-button", "Download an Image"),
    ] {
        let button = document.create_element("button")?;
        button.set_id(id);
        button.set_class_name("toolbar-button");
        button.set_text_content(Some(label));
        toolbar.append_child(&button)?;
    }

    Ok(toolbar)
}

fn ensure_layout_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("layout-styles").is_some() {
        return Ok(());
    }

    let css = "
body{margin:0;font-family:Arial,Helvetica,sans-serif;background:#f9fbfc}
#app-root{display:flex;height:100vh;border:1px solid #e5e7e9;border-radius:4px}
#sidebar{width:220px;padding:12px;background:#f9fbfc;border-right:1px solid #e5e7e9;overflow-y:auto}
#main-panel{flex:1;display:flex;flex-direction:column}
#header{display:flex;align-items:center;justify-content:space-between;padding:0 16px;border-bottom:1px solid #e5e7e9;background:#fff}
#header h2{font-size:18px;margin:10px 0}
#toolbar{display:flex;gap:10px}
.toolbar-button{color:#86418d;border:1px solid #86418d;background:#fff;border-radius:4px;font-size:14px;padding:2px 10px;cursor:pointer}
#canvas-container{flex:1;position:relative;background:#fff;overflow:hidden}
#flow-canvas{display:block}
.new-action-row{display:flex;align-items:center;gap:6px}
#new-action-input{flex:1;padding:8px 12px;margin-bottom:4px;border:none;border-bottom:1px solid #c9ced3;background:transparent;outline:none}
#new-action-input.input-error{border-bottom-color:#af2426}
#new-action-input.input-error::placeholder{color:#af2426}
.add-action-button{color:#86418d;background:none;border:none;font-size:20px;cursor:pointer}
.action-list{margin-top:12px}
.action-entry{display:flex;align-items:center;justify-content:space-between;border:1px solid #e2e2e2;border-radius:6px;padding:8px 12px;margin-bottom:10px;background:#f6f6f6;cursor:grab}
.delete-action{color:#af2426;background:none;border:none;font-size:16px;cursor:pointer}
.node-text-editor{resize:none;border:1px solid #86418d;border-radius:4px;font-size:12px;font-family:inherit;outline:none;z-index:10}
";

    let style = document.create_element("style")?;
    style.set_id("layout-styles");
    style.set_text_content(Some(css));
    if let Ok(Some(head)) = document.query_selector("head") {
        head.append_child(&style)?;
    }
    Ok(())
}
