//! Image export and fit-to-bounds camera math.
//!
//! The coordinator computes the bounding box of the current nodes and a
//! scale-to-fit camera, then hands the pixel work to the canvas rasterizer
//! (`to_data_url`) and triggers a client-side download.  The same fit
//! formula backs the toolbar "Center view" action.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement};

use crate::constants::{
    EXPORT_MAX_ZOOM, EXPORT_MIN_ZOOM, EXPORT_PADDING, EXPORT_PIXEL_RATIO, IMAGE_HEIGHT,
    IMAGE_WIDTH, NODE_HEIGHT, NODE_WIDTH,
};
use crate::models::{Node, Viewport};
use crate::state::AppState;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bounding box of all node rects, or `None` for an empty graph.
pub fn nodes_bounds<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Option<Bounds> {
    let mut iter = nodes.into_iter();
    let first = iter.next()?;
    let mut min_x = first.position.x;
    let mut min_y = first.position.y;
    let mut max_x = first.position.x + NODE_WIDTH;
    let mut max_y = first.position.y + NODE_HEIGHT;

    for node in iter {
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_x = max_x.max(node.position.x + NODE_WIDTH);
        max_y = max_y.max(node.position.y + NODE_HEIGHT);
    }

    Some(Bounds { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y })
}

/// Scale-to-fit with padding: the camera that shows `bounds` centred inside
/// a `width` x `height` output, zoom clamped to `[min_zoom, max_zoom]`.
pub fn viewport_for_bounds(
    bounds: Bounds,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
    padding: f64,
) -> Viewport {
    let fit_x = (width - 2.0 * padding) / bounds.width;
    let fit_y = (height - 2.0 * padding) / bounds.height;
    let zoom = fit_x.min(fit_y).clamp(min_zoom, max_zoom);

    // Centre of the bounds maps to the centre of the output.
    let x = bounds.x + bounds.width / 2.0 - width / (2.0 * zoom);
    let y = bounds.y + bounds.height / 2.0 - height / (2.0 * zoom);

    Viewport { x, y, zoom }
}

/// Render the current flow into an offscreen canvas and trigger a PNG
/// download.  Fire-and-forget: editor state is never touched.
pub fn export_png(document: &Document, state: &AppState) -> Result<(), JsValue> {
    let bounds = match nodes_bounds(state.nodes.values()) {
        Some(b) => b,
        None => {
            crate::toast::info("Nothing to export yet");
            return Ok(());
        }
    };
    let viewport = viewport_for_bounds(
        bounds,
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        EXPORT_MIN_ZOOM,
        EXPORT_MAX_ZOOM,
        EXPORT_PADDING,
    );

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width((IMAGE_WIDTH * EXPORT_PIXEL_RATIO) as u32);
    canvas.set_height((IMAGE_HEIGHT * EXPORT_PIXEL_RATIO) as u32);
    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context for export canvas"))?
        .dyn_into()?;

    crate::canvas::renderer::draw_scene(
        &context,
        state,
        &viewport,
        EXPORT_PIXEL_RATIO,
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        false,
    );

    // The rasterizer does the pixel work; we only supplied the camera.
    let data_url = canvas.to_data_url_with_type("image/png")?;
    download_image(document, &data_url)
}

/// Equivalent of clicking a transient `<a download>` anchor.
fn download_image(document: &Document, data_url: &str) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_download("flow.png");
    anchor.set_href(data_url);
    anchor.click();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeData, NodeKind, Position};

    fn node_at(x: f64, y: f64) -> Node {
        Node {
            id: format!("n-{}-{}", x, y),
            kind: NodeKind::Note,
            position: Position { x, y },
            data: NodeData { label: "n".into(), text: None },
        }
    }

    #[test]
    fn empty_graph_has_no_bounds() {
        let nodes: Vec<Node> = Vec::new();
        assert_eq!(nodes_bounds(&nodes), None);
    }

    #[test]
    fn bounds_span_all_node_rects() {
        let nodes = vec![node_at(0.0, 0.0), node_at(400.0, -100.0)];
        let b = nodes_bounds(&nodes).unwrap();
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, -100.0);
        assert_eq!(b.width, 400.0 + NODE_WIDTH);
        assert_eq!(b.height, 100.0 + NODE_HEIGHT);
    }

    #[test]
    fn fit_zoom_is_clamped() {
        // A tiny diagram would need zoom far above the max.
        let small = Bounds { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        let vp = viewport_for_bounds(small, 1000.0, 1000.0, 0.5, 2.0, 0.0);
        assert_eq!(vp.zoom, 2.0);

        // A huge diagram would need zoom far below the min.
        let huge = Bounds { x: 0.0, y: 0.0, width: 100_000.0, height: 100_000.0 };
        let vp = viewport_for_bounds(huge, 1000.0, 1000.0, 0.5, 2.0, 0.0);
        assert_eq!(vp.zoom, 0.5);
    }

    #[test]
    fn fit_centres_the_bounds() {
        let bounds = Bounds { x: 100.0, y: 50.0, width: 200.0, height: 100.0 };
        let vp = viewport_for_bounds(bounds, 800.0, 600.0, 0.1, 10.0, 0.0);

        // The centre of the bounds must land on the centre of the output.
        let centre_x = (bounds.x + bounds.width / 2.0 - vp.x) * vp.zoom;
        let centre_y = (bounds.y + bounds.height / 2.0 - vp.y) * vp.zoom;
        assert!((centre_x - 400.0).abs() < 1e-9);
        assert!((centre_y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn padding_shrinks_the_usable_area() {
        let bounds = Bounds { x: 0.0, y: 0.0, width: 100.0, height: 100.0 };
        let without = viewport_for_bounds(bounds, 400.0, 400.0, 0.1, 10.0, 0.0);
        let with = viewport_for_bounds(bounds, 400.0, 400.0, 0.1, 10.0, 50.0);
        assert!(with.zoom < without.zoom);
        assert_eq!(with.zoom, 3.0);
    }
}
