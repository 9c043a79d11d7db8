//! Construction of canvas nodes from dropped sidebar templates.

use uuid::Uuid;

use crate::models::{Node, NodeData, NodeKind, Position};

/// Fluent builder for flow nodes.  Dropping a template produces a `Note`
/// node whose label is the template name and whose body text starts empty.
pub struct NodeBuilder {
    kind: NodeKind,
    label: String,
    position: Position,
}

impl NodeBuilder {
    pub fn note(label: &str) -> Self {
        Self {
            kind: NodeKind::Note,
            label: label.to_string(),
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Finalize node creation with a fresh session-unique id.
    pub fn build(self) -> Node {
        Node {
            id: format!("flownode-{}", Uuid::new_v4()),
            kind: self.kind,
            position: self.position,
            data: NodeData { label: self.label, text: None },
        }
    }
}

/// Translate a drop into a new node.  Returns `None` when no template drag
/// is active; a stray drop on the canvas is silently ignored.
pub fn node_from_drop(template: Option<&str>, position: Position) -> Option<Node> {
    let label = template?.trim();
    if label.is_empty() {
        return None;
    }
    Some(NodeBuilder::note(label).at(position).build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_without_a_dragged_template_creates_nothing() {
        let at = Position { x: 10.0, y: 20.0 };
        assert!(node_from_drop(None, at).is_none());
        assert!(node_from_drop(Some(""), at).is_none());
        assert!(node_from_drop(Some("   "), at).is_none());
    }

    #[test]
    fn drop_creates_one_node_with_label_and_position() {
        let at = Position { x: 120.0, y: -35.5 };
        let node = node_from_drop(Some("Research"), at).expect("node");
        assert_eq!(node.data.label, "Research");
        assert_eq!(node.data.text, None);
        assert_eq!(node.position, at);
        assert_eq!(node.kind, NodeKind::Note);
        assert!(node.id.starts_with("flownode-"));
    }

    #[test]
    fn ids_are_unique_across_builds() {
        let a = NodeBuilder::note("a").build();
        let b = NodeBuilder::note("a").build();
        assert_ne!(a.id, b.id);
    }
}
