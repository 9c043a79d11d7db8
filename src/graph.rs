//! Connection gating for the flow graph.
//!
//! Every proposed edge passes through [`ConnectionGuard::evaluate`] before it
//! is committed.  The guard rejects self-loops and edges that would close a
//! directed cycle, and remembers the last rejected pair so the user is not
//! spammed with identical feedback while hovering the same illegal target.

use std::collections::{HashMap, HashSet};

use crate::models::{Edge, Node};

/// An edge the user is about to create.  Handles are carried along so an
/// accepted proposal can be committed verbatim.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConnectionProposal {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RejectReason {
    /// The target id does not resolve to a node.  The canvas should never
    /// offer a dangling handle; treated as a plain rejection rather than a
    /// crash.
    UnknownTarget,
    SelfLoop,
    WouldCycle,
}

impl RejectReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectReason::UnknownTarget => "That connection target no longer exists",
            RejectReason::SelfLoop => "You can't connect a node to itself",
            RejectReason::WouldCycle => "This connection would create a cycle in the flow",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConnectionOutcome {
    Accepted,
    /// `notify` is true only when this rejection differs from the previously
    /// rejected (source, target) pair.
    Rejected { reason: RejectReason, notify: bool },
}

impl ConnectionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ConnectionOutcome::Accepted)
    }
}

/// Gate for edge creation.  Holds only the notification de-dup state; the
/// legality check itself is a pure function of the committed graph.
#[derive(Default)]
pub struct ConnectionGuard {
    last_rejected: Option<(String, String)>,
}

impl ConnectionGuard {
    pub fn new() -> Self {
        Self { last_rejected: None }
    }

    /// Decide whether `proposal` may be committed against the current graph.
    /// The proposed edge itself is not part of `edges` during evaluation.
    pub fn evaluate(
        &mut self,
        proposal: &ConnectionProposal,
        nodes: &HashMap<String, Node>,
        edges: &[Edge],
    ) -> ConnectionOutcome {
        if !nodes.contains_key(&proposal.target) {
            return self.reject(proposal, RejectReason::UnknownTarget);
        }
        if proposal.target == proposal.source {
            return self.reject(proposal, RejectReason::SelfLoop);
        }
        // Would the new edge let us walk from target back around to source?
        if reaches(&proposal.target, &proposal.source, edges) {
            return self.reject(proposal, RejectReason::WouldCycle);
        }
        self.last_rejected = None;
        ConnectionOutcome::Accepted
    }

    /// Forget the remembered rejection, e.g. after the graph was replaced
    /// wholesale by a restore.
    pub fn reset(&mut self) {
        self.last_rejected = None;
    }

    fn reject(&mut self, proposal: &ConnectionProposal, reason: RejectReason) -> ConnectionOutcome {
        let pair = (proposal.source.clone(), proposal.target.clone());
        let notify = self.last_rejected.as_ref() != Some(&pair);
        self.last_rejected = Some(pair);
        ConnectionOutcome::Rejected { reason, notify }
    }
}

/// Depth-first reachability over outgoing edges.  The visited set makes the
/// walk terminate even when the stored graph already contains a cycle
/// (possible after restoring a corrupted record).
pub fn reaches(from: &str, to: &str, edges: &[Edge]) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![from];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        for edge in edges.iter().filter(|e| e.source == current) {
            if edge.target == to {
                return true;
            }
            stack.push(edge.target.as_str());
        }
    }
    false
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::models::{NodeData, NodeKind, Position};
    use proptest::prelude::*;

    fn graph_nodes(count: usize) -> HashMap<String, Node> {
        (0..count)
            .map(|i| {
                let id = format!("n{}", i);
                (
                    id.clone(),
                    Node {
                        id,
                        kind: NodeKind::Note,
                        position: Position::default(),
                        data: NodeData { label: format!("n{}", i), text: None },
                    },
                )
            })
            .collect()
    }

    proptest! {
        /// Feeding arbitrary proposals through the guard and committing only
        /// the accepted ones must never produce a graph containing a cycle.
        #[test]
        fn accepted_edges_keep_the_graph_acyclic(
            pairs in proptest::collection::vec((0usize..8, 0usize..8), 0..48)
        ) {
            let nodes = graph_nodes(8);
            let mut edges: Vec<Edge> = Vec::new();
            let mut guard = ConnectionGuard::new();

            for (s, t) in pairs {
                let prop = ConnectionProposal {
                    source: format!("n{}", s),
                    target: format!("n{}", t),
                    source_handle: None,
                    target_handle: None,
                };
                let outcome = guard.evaluate(&prop, &nodes, &edges);
                if s == t {
                    prop_assert!(!outcome.is_accepted());
                }
                if outcome.is_accepted() {
                    edges.push(Edge {
                        id: format!("e{}", edges.len()),
                        source: prop.source,
                        target: prop.target,
                        source_handle: None,
                        target_handle: None,
                    });
                }
            }

            for id in nodes.keys() {
                prop_assert!(!reaches(id, id, &edges), "cycle through {}", id);
            }
        }

        /// The guard rejects exactly the proposals whose target already
        /// reaches the source (plus self-loops).
        #[test]
        fn rejection_matches_reachability(
            existing in proptest::collection::vec((0usize..6, 0usize..6), 0..20),
            s in 0usize..6,
            t in 0usize..6,
        ) {
            let nodes = graph_nodes(6);
            let edges: Vec<Edge> = existing
                .iter()
                .enumerate()
                .map(|(i, (a, b))| Edge {
                    id: format!("e{}", i),
                    source: format!("n{}", a),
                    target: format!("n{}", b),
                    source_handle: None,
                    target_handle: None,
                })
                .collect();

            let prop = ConnectionProposal {
                source: format!("n{}", s),
                target: format!("n{}", t),
                source_handle: None,
                target_handle: None,
            };
            let mut guard = ConnectionGuard::new();
            let accepted = guard.evaluate(&prop, &nodes, &edges).is_accepted();
            let expected = s != t && !reaches(&prop.target, &prop.source, &edges);
            prop_assert_eq!(accepted, expected);
        }
    }
}
