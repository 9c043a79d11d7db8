//! Canvas rendering of the flow: background grid, edges, nodes, and the
//! in-progress connection line.  Purely mechanical; all decisions about
//! what exists on the canvas were made before this module is called.

use web_sys::CanvasRenderingContext2d;

use super::shapes;
use crate::constants::*;
use crate::models::{Edge, Viewport};
use crate::state::AppState;

/// Redraw the live canvas from the current state.
pub fn draw(state: &AppState) {
    let context = match (&state.canvas, &state.context) {
        (Some(_), Some(context)) => context,
        _ => return,
    };

    let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    draw_scene(
        context,
        state,
        &state.viewport(),
        dpr,
        state.canvas_width,
        state.canvas_height,
        true,
    );
}

/// Draw the flow through an explicit camera.  `interactive` adds the live
/// chrome (selection ring, pending connection line) that has no place in an
/// exported image.
pub fn draw_scene(
    context: &CanvasRenderingContext2d,
    state: &AppState,
    viewport: &Viewport,
    pixel_ratio: f64,
    width: f64,
    height: f64,
    interactive: bool,
) {
    context.save();
    let _ = context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    context.set_fill_style_str(CANVAS_BACKGROUND_COLOR);
    context.fill_rect(0.0, 0.0, width * pixel_ratio, height * pixel_ratio);

    // Device pixels first, then the camera.
    let _ = context.scale(pixel_ratio, pixel_ratio);
    let _ = context.scale(viewport.zoom, viewport.zoom);
    let _ = context.translate(-viewport.x, -viewport.y);

    draw_grid(context, viewport, width, height);

    for edge in &state.edges {
        draw_edge(context, state, edge);
    }

    if interactive {
        if let Some((source, handle)) = &state.connecting {
            if let Some(node) = state.nodes.get(source) {
                let (sx, sy) = shapes::handle_position(node.position, handle);
                context.begin_path();
                context.move_to(sx, sy);
                context.line_to(state.pointer_x, state.pointer_y);
                context.set_stroke_style_str(HANDLE_COLOR);
                context.set_line_width(1.5);
                context.stroke();
            }
        }
    }

    for node in state.nodes.values() {
        let selected =
            interactive && state.selected_node_id.as_deref() == Some(node.id.as_str());
        shapes::draw_node(context, node, selected);
    }

    context.restore();
}

/// Dot grid over the visible flow-coordinate range.
fn draw_grid(context: &CanvasRenderingContext2d, viewport: &Viewport, width: f64, height: f64) {
    const STEP: f64 = 24.0;

    let left = viewport.x;
    let top = viewport.y;
    let right = viewport.x + width / viewport.zoom;
    let bottom = viewport.y + height / viewport.zoom;

    context.set_fill_style_str(GRID_DOT_COLOR);
    let mut gx = (left / STEP).floor() * STEP;
    while gx <= right {
        let mut gy = (top / STEP).floor() * STEP;
        while gy <= bottom {
            context.begin_path();
            let _ = context.arc(gx, gy, 1.0, 0.0, std::f64::consts::TAU);
            context.fill();
            gy += STEP;
        }
        gx += STEP;
    }
}

fn draw_edge(context: &CanvasRenderingContext2d, state: &AppState, edge: &Edge) {
    // Dangling endpoints can exist in a record restored from untrusted
    // storage; skip them instead of crashing.
    let (source, target) = match (state.nodes.get(&edge.source), state.nodes.get(&edge.target)) {
        (Some(s), Some(t)) => (s, t),
        _ => return,
    };

    let source_handle = edge.source_handle.as_deref().unwrap_or("b");
    let target_handle = edge.target_handle.as_deref().unwrap_or("a");
    let (sx, sy) = shapes::handle_position(source.position, source_handle);
    let (tx, ty) = shapes::handle_position(target.position, target_handle);

    // An S-shaped curve between the two handles.
    let bend = ((ty - sy) / 2.0).abs().clamp(20.0, 80.0);
    let (c1x, c1y) = (sx, sy + bend);
    let (c2x, c2y) = (tx, ty - bend);

    context.begin_path();
    context.move_to(sx, sy);
    context.bezier_curve_to(c1x, c1y, c2x, c2y, tx, ty);
    context.set_stroke_style_str(EDGE_COLOR);
    context.set_line_width(1.5);
    context.stroke();

    let angle = f64::atan2(ty - c2y, tx - c2x);
    shapes::draw_arrowhead(context, tx, ty, angle);
}
