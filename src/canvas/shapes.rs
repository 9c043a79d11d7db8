//! Drawing primitives for the flow canvas: node boxes, handles, arrowheads.

use web_sys::CanvasRenderingContext2d;

use crate::constants::*;
use crate::models::{Node, NodeKind, Position};

/// Connection handles, matching the stored `sourceHandle`/`targetHandle`
/// values: targets on top/left, sources on bottom/right.
pub const SOURCE_HANDLES: [&str; 2] = ["b", "c"];
pub const TARGET_HANDLES: [&str; 2] = ["a", "d"];

/// Centre of a handle dot on the node's border, in flow coordinates.
pub fn handle_position(position: Position, handle: &str) -> (f64, f64) {
    let Position { x, y } = position;
    match handle {
        "a" => (x + NODE_WIDTH / 2.0, y),
        "b" => (x + NODE_WIDTH / 2.0, y + NODE_HEIGHT),
        "c" => (x + NODE_WIDTH, y + NODE_HEIGHT / 2.0),
        "d" => (x, y + NODE_HEIGHT / 2.0),
        _ => (x + NODE_WIDTH / 2.0, y + NODE_HEIGHT),
    }
}

pub fn draw_node(context: &CanvasRenderingContext2d, node: &Node, selected: bool) {
    context.save();

    context.set_fill_style_str(NODE_FILL_COLOR);
    rounded_rect_path(context, node.position.x, node.position.y, NODE_WIDTH, NODE_HEIGHT, 8.0);
    context.fill();

    if selected {
        context.set_stroke_style_str(NODE_BORDER_SELECTED);
        context.set_line_width(2.5);
    } else {
        context.set_stroke_style_str(NODE_BORDER_DEFAULT);
        context.set_line_width(1.5);
    }
    context.stroke();

    // Label, then the free-text body for note nodes.
    context.set_fill_style_str(NODE_LABEL_COLOR);
    context.set_font("600 14px Arial, sans-serif");
    let _ = context.fill_text(&node.data.label, node.position.x + 12.0, node.position.y + 24.0);

    if node.kind == NodeKind::Note {
        if let Some(text) = &node.data.text {
            context.set_fill_style_str(NODE_TEXT_COLOR);
            context.set_font("12px Arial, sans-serif");
            for (i, line) in wrap_text(text, 30).iter().take(4).enumerate() {
                let _ = context.fill_text(
                    line,
                    node.position.x + 12.0,
                    node.position.y + 44.0 + i as f64 * 16.0,
                );
            }
        }
    }

    for handle in SOURCE_HANDLES.iter().chain(TARGET_HANDLES.iter()) {
        let (hx, hy) = handle_position(node.position, handle);
        draw_handle(context, hx, hy);
    }

    context.restore();
}

pub fn draw_handle(context: &CanvasRenderingContext2d, x: f64, y: f64) {
    context.begin_path();
    let _ = context.arc(x, y, HANDLE_RADIUS, 0.0, std::f64::consts::TAU);
    context.set_fill_style_str(HANDLE_COLOR);
    context.fill();
}

/// Filled triangle at `(x, y)` pointing along `angle`.
pub fn draw_arrowhead(context: &CanvasRenderingContext2d, x: f64, y: f64, angle: f64) {
    let head_len = 10.0;
    context.begin_path();
    context.move_to(x, y);
    context.line_to(
        x - head_len * f64::cos(angle - std::f64::consts::PI / 6.0),
        y - head_len * f64::sin(angle - std::f64::consts::PI / 6.0),
    );
    context.line_to(
        x - head_len * f64::cos(angle + std::f64::consts::PI / 6.0),
        y - head_len * f64::sin(angle + std::f64::consts::PI / 6.0),
    );
    context.close_path();
    context.set_fill_style_str(EDGE_COLOR);
    context.fill();
}

fn rounded_rect_path(
    context: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
) {
    context.begin_path();
    context.move_to(x + radius, y);
    let _ = context.arc_to(x + width, y, x + width, y + height, radius);
    let _ = context.arc_to(x + width, y + height, x, y + height, radius);
    let _ = context.arc_to(x, y + height, x, y, radius);
    let _ = context.arc_to(x, y, x + width, y, radius);
    context.close_path();
}

/// Greedy word wrap by character budget; enough for node-sized text blocks.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_sit_on_the_node_border() {
        let p = Position { x: 10.0, y: 20.0 };
        assert_eq!(handle_position(p, "a"), (10.0 + NODE_WIDTH / 2.0, 20.0));
        assert_eq!(handle_position(p, "b"), (10.0 + NODE_WIDTH / 2.0, 20.0 + NODE_HEIGHT));
        assert_eq!(handle_position(p, "c"), (10.0 + NODE_WIDTH, 20.0 + NODE_HEIGHT / 2.0));
        assert_eq!(handle_position(p, "d"), (10.0, 20.0 + NODE_HEIGHT / 2.0));
    }

    #[test]
    fn wrap_respects_the_character_budget() {
        let lines = wrap_text("one two three four five six", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
        for line in &lines {
            assert!(line.len() <= 9);
        }
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap_text("", 20).is_empty());
        assert!(wrap_text("   ", 20).is_empty());
    }
}
