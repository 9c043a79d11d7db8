//! Browser round-trip tests for the flow record: save then restore must
//! reproduce an equivalent graph and camera, and clear must delete the
//! durable record.  Runs against real localStorage via wasm-pack test.

use wasm_bindgen_test::*;

use crate::graph::ConnectionProposal;
use crate::models::Position;
use crate::node_builder::NodeBuilder;
use crate::state::AppState;
use crate::storage;

wasm_bindgen_test_configure!(run_in_browser);

fn sample_state() -> AppState {
    let mut state = AppState::new();
    let a = NodeBuilder::note("Idea").at(Position { x: 40.0, y: 60.0 }).build();
    let b = NodeBuilder::note("Prototype").at(Position { x: 320.0, y: 240.0 }).build();
    let (a_id, b_id) = (a.id.clone(), b.id.clone());
    state.nodes.insert(a_id.clone(), a);
    state.nodes.insert(b_id.clone(), b);
    state.add_edge(ConnectionProposal {
        source: a_id,
        target: b_id,
        source_handle: Some("b".into()),
        target_handle: Some("a".into()),
    });
    state.viewport_x = 12.5;
    state.viewport_y = -8.0;
    state.zoom_level = 1.25;
    state
}

#[wasm_bindgen_test]
fn flow_round_trips_through_local_storage() {
    let store = storage::local_storage().expect("local storage available in test browser");
    let state = sample_state();

    storage::save_flow(&store, &state.stored_flow()).expect("save succeeds");
    let record = storage::read_flow(&store).expect("record present after save");

    let mut fresh = AppState::new();
    fresh.apply_flow(record);
    assert_eq!(fresh.nodes, state.nodes);
    assert_eq!(fresh.edges, state.edges);
    assert_eq!(fresh.viewport(), state.viewport());

    storage::clear_flow(&store);
}

#[wasm_bindgen_test]
fn clear_removes_the_durable_record() {
    let store = storage::local_storage().expect("local storage available in test browser");
    let state = sample_state();

    storage::save_flow(&store, &state.stored_flow()).expect("save succeeds");
    assert!(storage::read_flow(&store).is_some());

    storage::clear_flow(&store);
    assert!(storage::read_flow(&store).is_none());
}

#[wasm_bindgen_test]
fn restoring_without_a_record_reports_no_saved_flow() {
    let store = storage::local_storage().expect("local storage available in test browser");
    storage::clear_flow(&store);
    assert!(storage::read_flow(&store).is_none());
}

#[wasm_bindgen_test]
fn corrupt_record_is_treated_as_absent() {
    let store = storage::local_storage().expect("local storage available in test browser");
    store
        .set_item(crate::constants::FLOW_STORAGE_KEY, "{definitely not json")
        .expect("raw write");
    assert!(storage::read_flow(&store).is_none());
    storage::clear_flow(&store);
}
