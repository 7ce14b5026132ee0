//! Read-only projections of a generated [`Constellation`] for external
//! graph tools.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use idleiss_types::SystemId;
use serde::Serialize;

use crate::graph::Constellation;

/// Render a constellation as a `Graph a->b, c->d` edge list.
///
/// Ids are shifted to start at 1 and each edge is written once, higher id
/// first, in ascending order. A constellation without edges renders as
/// `Graph`.
pub fn edge_list(constellation: &Constellation) -> String {
    let rendered: BTreeSet<(u128, u128)> = constellation
        .edges()
        .map(|(hi, lo)| (one_based(hi), one_based(lo)))
        .collect();

    if rendered.is_empty() {
        return String::from("Graph");
    }
    let edges: Vec<String> = rendered
        .iter()
        .map(|(hi, lo)| format!("{hi}->{lo}"))
        .collect();
    format!("Graph {}", edges.join(", "))
}

fn one_based(id: SystemId) -> u128 {
    u128::from(id.into_inner()).saturating_add(1)
}

/// A plain undirected graph: deduplicated edges plus the nodes that have
/// none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphExport {
    /// Each edge once, as `(higher id, lower id)`.
    pub edges: BTreeSet<(SystemId, SystemId)>,
    /// Systems with no connections.
    pub isolated: BTreeSet<SystemId>,
}

impl GraphExport {
    /// Snapshot the edges and isolated systems of `constellation`.
    pub fn from_constellation(constellation: &Constellation) -> Self {
        Self {
            edges: constellation.edges().collect(),
            isolated: constellation.isolated().into_iter().collect(),
        }
    }

    /// Number of distinct nodes, counting both edge endpoints and isolated
    /// systems.
    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the exported graph forms one component. An empty graph is
    /// connected.
    pub fn is_connected(&self) -> bool {
        let mut adjacency: BTreeMap<SystemId, Vec<SystemId>> = BTreeMap::new();
        for &(hi, lo) in &self.edges {
            adjacency.entry(hi).or_default().push(lo);
            adjacency.entry(lo).or_default().push(hi);
        }

        let nodes = self.nodes();
        let Some(&start) = nodes.first() else {
            return true;
        };

        let mut visited = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &peer in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(peer) {
                    queue.push_back(peer);
                }
            }
        }
        visited.len() == nodes.len()
    }

    fn nodes(&self) -> BTreeSet<SystemId> {
        self.edges
            .iter()
            .flat_map(|&(hi, lo)| [hi, lo])
            .chain(self.isolated.iter().copied())
            .collect()
    }
}
