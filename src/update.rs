//! The reducer: every state transition in the editor goes through here.
//!
//! Returns `true` when the canvas needs a redraw.  DOM side effects never
//! run inside the reducer; they ride out in `Command`s so the transitions
//! stay plain testable functions over `AppState`.

use uuid::Uuid;

use crate::constants::{EXPORT_PADDING, MAX_ZOOM, MIN_ZOOM, SAVE_DEBOUNCE_MS};
use crate::export::{nodes_bounds, viewport_for_bounds};
use crate::graph::{ConnectionOutcome, ConnectionProposal};
use crate::messages::{Command, Message};
use crate::models::{TemplateAction, Viewport};
use crate::node_builder::node_from_drop;
use crate::state::AppState;

pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::AddTemplate(name) => {
            let name = name.trim();
            if name.is_empty() {
                return false;
            }
            state.templates.push(TemplateAction {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
            });
            cmds.push(Command::SaveTemplates);
            cmds.push(refresh_sidebar());
            false
        }
        Message::DeleteTemplate(id) => {
            state.templates.retain(|t| t.id != *id);
            cmds.push(Command::SaveTemplates);
            cmds.push(refresh_sidebar());
            false
        }
        Message::SetDragTemplate(name) => {
            state.drag_template = Some(name.clone());
            false
        }
        Message::ClearDragTemplate => {
            state.drag_template = None;
            false
        }
        Message::CanvasDrop { x, y } => {
            let position = state.screen_to_flow(*x, *y);
            match node_from_drop(state.drag_template.as_deref(), position) {
                Some(node) => {
                    state.nodes.insert(node.id.clone(), node);
                    state.state_modified = true;
                    true
                }
                // A drop with no active drag-template is silently ignored.
                None => false,
            }
        }
        Message::StartConnection { source, source_handle } => {
            state.connecting = Some((source.clone(), source_handle.clone()));
            false
        }
        Message::CompleteConnection { target, target_handle } => {
            let (source, source_handle) = match state.connecting.take() {
                Some(from) => from,
                None => return false,
            };
            let proposal = ConnectionProposal {
                source,
                target: target.clone(),
                source_handle: Some(source_handle),
                target_handle: Some(target_handle.clone()),
            };
            match state.guard.evaluate(&proposal, &state.nodes, &state.edges) {
                ConnectionOutcome::Accepted => {
                    state.add_edge(proposal);
                    state.state_modified = true;
                }
                ConnectionOutcome::Rejected { reason, notify } => {
                    if notify {
                        let text = reason.user_message();
                        cmds.push(Command::update_ui(move || crate::toast::error(text)));
                    }
                }
            }
            true
        }
        Message::CancelConnection => state.connecting.take().is_some(),
        Message::SelectNode(node_id) => {
            if state.selected_node_id == *node_id {
                return false;
            }
            state.selected_node_id = node_id.clone();
            true
        }
        Message::StartNodeDrag { node_id, offset_x, offset_y } => {
            state.dragging = Some(node_id.clone());
            state.drag_offset_x = *offset_x;
            state.drag_offset_y = *offset_y;
            false
        }
        Message::UpdateNodePosition { node_id, x, y } => {
            if let Some(node) = state.nodes.get_mut(node_id) {
                node.position.x = *x;
                node.position.y = *y;
                state.state_modified = true;
                return true;
            }
            false
        }
        Message::StopNodeDrag => {
            state.dragging = None;
            false
        }
        Message::UpdateNodeText { node_id, text } => {
            if let Some(node) = state.nodes.get_mut(node_id) {
                node.data.text = if text.is_empty() { None } else { Some(text.clone()) };
                state.state_modified = true;
                return true;
            }
            false
        }
        Message::DeleteSelectedNode => {
            let id = match state.selected_node_id.take() {
                Some(id) => id,
                None => return false,
            };
            state.nodes.remove(&id);
            state.edges.retain(|e| e.source != id && e.target != id);
            state.state_modified = true;
            true
        }
        Message::PointerMoved { x, y } => {
            state.pointer_x = *x;
            state.pointer_y = *y;
            // Only the pending connection line cares about pointer movement.
            state.connecting.is_some()
        }
        Message::StartPan { x, y } => {
            state.panning = true;
            state.pan_last_x = *x;
            state.pan_last_y = *y;
            false
        }
        Message::UpdatePan { x, y } => {
            if !state.panning {
                return false;
            }
            let dx = *x - state.pan_last_x;
            let dy = *y - state.pan_last_y;
            state.viewport_x -= dx / state.zoom_level;
            state.viewport_y -= dy / state.zoom_level;
            state.pan_last_x = *x;
            state.pan_last_y = *y;
            state.state_modified = true;
            true
        }
        Message::StopPan => {
            state.panning = false;
            false
        }
        Message::Zoom { new_zoom, focus_x, focus_y } => {
            // Keep the flow point under the cursor fixed while zooming.
            let fx = focus_x / state.zoom_level + state.viewport_x;
            let fy = focus_y / state.zoom_level + state.viewport_y;
            state.zoom_level = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
            state.viewport_x = fx - focus_x / state.zoom_level;
            state.viewport_y = fy - focus_y / state.zoom_level;
            state.state_modified = true;
            true
        }
        Message::CenterView => {
            match nodes_bounds(state.nodes.values()) {
                Some(bounds) => {
                    let vp = viewport_for_bounds(
                        bounds,
                        state.canvas_width,
                        state.canvas_height,
                        MIN_ZOOM,
                        MAX_ZOOM,
                        EXPORT_PADDING,
                    );
                    state.set_viewport(vp);
                }
                None => state.set_viewport(Viewport::default()),
            }
            state.state_modified = true;
            true
        }
        Message::CanvasResized { width, height } => {
            state.canvas_width = *width;
            state.canvas_height = *height;
            true
        }
        Message::SaveFlow => {
            state.state_modified = false;
            cmds.push(Command::SaveFlow);
            false
        }
        Message::RestoreFlow => {
            cmds.push(Command::RestoreFlow);
            false
        }
        Message::ApplyRestoredFlow(flow) => {
            state.apply_flow(flow.clone());
            true
        }
        Message::ClearFlow => {
            state.nodes.clear();
            state.edges.clear();
            state.selected_node_id = None;
            state.connecting = None;
            state.guard.reset();
            state.state_modified = false;
            cmds.push(Command::ClearStorage);
            cmds.push(Command::update_ui(|| crate::toast::success("Canvas cleared")));
            true
        }
        Message::AutoSave { now_ms } => {
            if !state.state_modified {
                return false;
            }
            if now_ms.saturating_sub(state.last_saved_ms) < SAVE_DEBOUNCE_MS {
                return false;
            }
            state.last_saved_ms = *now_ms;
            state.state_modified = false;
            cmds.push(Command::SaveFlow);
            false
        }
        Message::DownloadImage => {
            cmds.push(Command::ExportImage);
            false
        }
    }
}

fn refresh_sidebar() -> Command {
    Command::update_ui(|| {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = crate::components::sidebar::refresh_action_list(&document);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeKind, StoredFlow};
    use crate::node_builder::NodeBuilder;

    fn dispatch(state: &mut AppState, msg: Message) -> Vec<Command> {
        let mut cmds = Vec::new();
        update(state, &msg, &mut cmds);
        cmds
    }

    fn add_node(state: &mut AppState, label: &str) -> String {
        let node = NodeBuilder::note(label).build();
        let id = node.id.clone();
        state.nodes.insert(id.clone(), node);
        id
    }

    fn connect(state: &mut AppState, source: &str, target: &str) -> Vec<Command> {
        let mut cmds = dispatch(
            state,
            Message::StartConnection { source: source.to_string(), source_handle: "b".into() },
        );
        cmds.extend(dispatch(
            state,
            Message::CompleteConnection { target: target.to_string(), target_handle: "a".into() },
        ));
        cmds
    }

    #[test]
    fn drop_without_payload_is_a_no_op() {
        let mut state = AppState::new();
        dispatch(&mut state, Message::CanvasDrop { x: 10.0, y: 10.0 });
        assert!(state.nodes.is_empty());
        assert!(!state.state_modified);
    }

    #[test]
    fn drop_with_payload_creates_a_node_at_the_transformed_position() {
        let mut state = AppState::new();
        state.zoom_level = 2.0;
        state.viewport_x = 100.0;
        state.viewport_y = 50.0;
        dispatch(&mut state, Message::SetDragTemplate("Research".into()));
        dispatch(&mut state, Message::CanvasDrop { x: 40.0, y: 20.0 });

        assert_eq!(state.nodes.len(), 1);
        let node = state.nodes.values().next().unwrap();
        assert_eq!(node.data.label, "Research");
        assert_eq!(node.kind, NodeKind::Note);
        assert_eq!(node.position.x, 40.0 / 2.0 + 100.0);
        assert_eq!(node.position.y, 20.0 / 2.0 + 50.0);
        assert!(state.state_modified);
    }

    #[test]
    fn accepted_connection_commits_an_edge() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");

        connect(&mut state, &a, &b);
        assert_eq!(state.edges.len(), 1);
        let edge = &state.edges[0];
        assert_eq!(edge.source, a);
        assert_eq!(edge.target, b);
        assert_eq!(edge.source_handle.as_deref(), Some("b"));
        assert_eq!(edge.target_handle.as_deref(), Some("a"));
    }

    #[test]
    fn cycle_closing_connection_is_rejected() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");
        let c = add_node(&mut state, "c");

        connect(&mut state, &a, &b);
        connect(&mut state, &b, &c);
        assert_eq!(state.edges.len(), 2);

        // c -> a would close the loop; a -> c is a legal shortcut.
        let cmds = connect(&mut state, &c, &a);
        assert_eq!(state.edges.len(), 2);
        assert!(cmds.iter().any(|c| matches!(c, Command::UpdateUI(_))));

        connect(&mut state, &a, &c);
        assert_eq!(state.edges.len(), 3);
    }

    #[test]
    fn repeated_rejection_queues_no_second_notification() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");
        connect(&mut state, &a, &b);

        let first = connect(&mut state, &b, &a);
        let second = connect(&mut state, &b, &a);
        assert!(first.iter().any(|c| matches!(c, Command::UpdateUI(_))));
        assert!(!second.iter().any(|c| matches!(c, Command::UpdateUI(_))));
    }

    #[test]
    fn deleting_a_node_drops_its_incident_edges() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");
        let c = add_node(&mut state, "c");
        connect(&mut state, &a, &b);
        connect(&mut state, &b, &c);

        dispatch(&mut state, Message::SelectNode(Some(b.clone())));
        dispatch(&mut state, Message::DeleteSelectedNode);

        assert!(!state.nodes.contains_key(&b));
        assert!(state.edges.is_empty());
        assert_eq!(state.selected_node_id, None);
    }

    #[test]
    fn clear_empties_the_graph_and_queues_storage_deletion() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");
        connect(&mut state, &a, &b);

        let cmds = dispatch(&mut state, Message::ClearFlow);
        assert!(state.nodes.is_empty());
        assert!(state.edges.is_empty());
        assert!(cmds.iter().any(|c| matches!(c, Command::ClearStorage)));
    }

    #[test]
    fn restored_flow_replaces_the_graph_and_camera() {
        let mut state = AppState::new();
        add_node(&mut state, "stale");

        let node = NodeBuilder::note("restored").build();
        let id = node.id.clone();
        let flow = StoredFlow {
            nodes: vec![node],
            edges: vec![],
            viewport: Viewport { x: 7.0, y: -3.0, zoom: 2.5 },
        };
        dispatch(&mut state, Message::ApplyRestoredFlow(flow));

        assert_eq!(state.nodes.len(), 1);
        assert!(state.nodes.contains_key(&id));
        assert_eq!(state.viewport_x, 7.0);
        assert_eq!(state.viewport_y, -3.0);
        assert_eq!(state.zoom_level, 2.5);
        assert!(!state.state_modified);
    }

    #[test]
    fn zoom_is_clamped_and_keeps_the_focus_point_fixed() {
        let mut state = AppState::new();
        dispatch(&mut state, Message::Zoom { new_zoom: 100.0, focus_x: 0.0, focus_y: 0.0 });
        assert_eq!(state.zoom_level, MAX_ZOOM);

        state.zoom_level = 1.0;
        state.viewport_x = 0.0;
        state.viewport_y = 0.0;
        let focus = (200.0, 150.0);
        let before = state.screen_to_flow(focus.0, focus.1);
        dispatch(&mut state, Message::Zoom { new_zoom: 2.0, focus_x: focus.0, focus_y: focus.1 });
        let after = state.screen_to_flow(focus.0, focus.1);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn auto_save_is_debounced() {
        let mut state = AppState::new();
        add_node(&mut state, "a");
        state.state_modified = true;

        let first = dispatch(&mut state, Message::AutoSave { now_ms: 1_000 });
        assert!(first.iter().any(|c| matches!(c, Command::SaveFlow)));

        state.state_modified = true;
        let too_soon = dispatch(&mut state, Message::AutoSave { now_ms: 1_200 });
        assert!(!too_soon.iter().any(|c| matches!(c, Command::SaveFlow)));

        let later = dispatch(&mut state, Message::AutoSave { now_ms: 2_000 });
        assert!(later.iter().any(|c| matches!(c, Command::SaveFlow)));
    }

    #[test]
    fn auto_save_without_changes_writes_nothing() {
        let mut state = AppState::new();
        let cmds = dispatch(&mut state, Message::AutoSave { now_ms: 10_000 });
        assert!(cmds.is_empty());
    }

    #[test]
    fn blank_template_names_are_rejected() {
        let mut state = AppState::new();
        let before = state.templates.len();
        dispatch(&mut state, Message::AddTemplate("   ".into()));
        assert_eq!(state.templates.len(), before);

        dispatch(&mut state, Message::AddTemplate("Launch".into()));
        assert_eq!(state.templates.len(), before + 1);
        assert_eq!(state.templates.last().unwrap().name, "Launch");
    }

    #[test]
    fn save_then_restore_round_trips_the_graph() {
        let mut state = AppState::new();
        let a = add_node(&mut state, "a");
        let b = add_node(&mut state, "b");
        connect(&mut state, &a, &b);
        state.viewport_x = 11.0;
        state.viewport_y = 22.0;
        state.zoom_level = 0.75;

        let record = state.stored_flow();
        let mut fresh = AppState::new();
        dispatch(&mut fresh, Message::ApplyRestoredFlow(record));

        assert_eq!(fresh.nodes, state.nodes);
        assert_eq!(fresh.edges, state.edges);
        assert_eq!(fresh.viewport(), state.viewport());
    }
}
