//! Graph structure algorithms: connected components
//!
//! Colexification networks are undirected, so components are the maximal
//! sets of concepts linked by any chain of shared forms. Isolated concepts
//! form singleton components.
//!
//! # Example
//!
//! ```
//! use colex_network::{components, AttrGraph};
//!
//! // Two components: a - b, c - d
//! let mut graph = AttrGraph::new();
//! graph.add_edge("a", "b");
//! graph.add_edge("c", "d");
//!
//! let comps = components(&graph);
//! assert_eq!(comps.len(), 2);
//! assert!(comps[0].contains("a") && comps[0].contains("b"));
//! ```

use crate::storage::{AttrGraph, NodeId};
use std::collections::BTreeSet;

/// Connected components as sets of node labels, deterministically ordered
///
/// Components are sorted lexicographically by their (sorted) member labels,
/// so repeated calls on an unchanged graph give the same order regardless of
/// node insertion order.
#[must_use]
pub fn components(graph: &AttrGraph) -> Vec<BTreeSet<String>> {
    let mut comps: Vec<BTreeSet<String>> = component_ids(graph)
        .into_iter()
        .map(|ids| {
            ids.into_iter()
                .filter_map(|id| graph.node_label(id).map(str::to_string))
                .collect()
        })
        .collect();
    comps.sort();
    comps
}

/// Connected components as node ids, in discovery order
///
/// Each component lists its nodes in depth-first visiting order starting
/// from the lowest id not yet visited.
#[must_use]
pub fn component_ids(graph: &AttrGraph) -> Vec<Vec<NodeId>> {
    let n = graph.num_nodes();
    let mut visited = vec![false; n];
    let mut comps = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }

        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(node) = stack.pop() {
            #[allow(clippy::cast_possible_truncation)]
            let node_id = NodeId(node as u32);
            component.push(node_id);

            for neighbor in graph.neighbors(node_id) {
                let idx = neighbor.0 as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    stack.push(idx);
                }
            }
        }

        comps.push(component);
    }

    comps
}

/// Count the connected components
#[must_use]
pub fn count_components(graph: &AttrGraph) -> usize {
    component_ids(graph).len()
}
