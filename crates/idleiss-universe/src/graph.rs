//! Constellation graph: solar systems as nodes, undirected jump connections
//! as edges.
//!
//! Each [`SolarSystem`] stores the ids of its peers. The [`Constellation`]
//! owns its systems in a `BTreeMap<SystemId, SolarSystem>`, so iteration
//! follows creation order (ids are handed out monotonically) and every
//! connection is written to both endpoints in one call.
//!
//! Reachability uses an explicit worklist with a side set of visited ids;
//! nodes carry no traversal state of their own.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use idleiss_types::SystemId;
use serde::{Deserialize, Serialize};

use crate::error::UniverseError;

/// A solar system: one node of a constellation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarSystem {
    /// Session-unique identifier.
    id: SystemId,
    /// Session-unique generated code, e.g. `D-PNP9`.
    name: String,
    /// Ids of directly connected systems.
    connections: BTreeSet<SystemId>,
}

impl SolarSystem {
    /// Create an unconnected system.
    pub const fn new(id: SystemId, name: String) -> Self {
        Self {
            id,
            name,
            connections: BTreeSet::new(),
        }
    }

    /// The system's id.
    pub const fn id(&self) -> SystemId {
        self.id
    }

    /// The system's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of directly connected systems, in ascending order.
    pub const fn connections(&self) -> &BTreeSet<SystemId> {
        &self.connections
    }

    /// Number of connections.
    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Whether the system has no connections at all.
    pub fn is_orphan(&self) -> bool {
        self.connections.is_empty()
    }

    /// Whether this system lists `other` as a peer.
    pub fn connection_exists(&self, other: SystemId) -> bool {
        self.connections.contains(&other)
    }
}

impl core::fmt::Display for SolarSystem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SolarSystem {} ({}) connections:", self.id, self.name)?;
        for peer in &self.connections {
            write!(f, " {peer}")?;
        }
        Ok(())
    }
}

/// An ordered collection of solar systems and the connections between them.
///
/// Produced by [`ConstellationGenerator`](crate::generator::ConstellationGenerator);
/// the caller owns it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constellation {
    systems: BTreeMap<SystemId, SolarSystem>,
}

impl Constellation {
    /// Create an empty constellation.
    pub const fn new() -> Self {
        Self {
            systems: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Node operations
    // -------------------------------------------------------------------

    /// Add a system.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::DuplicateSystem`] if the id is already present.
    pub fn add_system(&mut self, system: SolarSystem) -> Result<(), UniverseError> {
        let id = system.id;
        if self.systems.contains_key(&id) {
            return Err(UniverseError::DuplicateSystem(id));
        }
        self.systems.insert(id, system);
        Ok(())
    }

    /// Look up a system by id.
    pub fn get(&self, id: SystemId) -> Option<&SolarSystem> {
        self.systems.get(&id)
    }

    /// Number of systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the constellation has no systems.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// All system ids in creation order.
    pub fn ids(&self) -> Vec<SystemId> {
        self.systems.keys().copied().collect()
    }

    /// Iterate over systems in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SolarSystem> {
        self.systems.values()
    }

    // -------------------------------------------------------------------
    // Edge operations
    // -------------------------------------------------------------------

    /// Connect `a` and `b` in both directions.
    ///
    /// Returns `Ok(true)` when a new edge was added and `Ok(false)` when the
    /// two systems were already connected.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidArgument`] for a self-loop,
    /// [`UniverseError::SystemNotFound`] for an unknown id, and
    /// [`UniverseError::InternalConsistency`] if only one of the two systems
    /// lists the other.
    pub fn add_connection(&mut self, a: SystemId, b: SystemId) -> Result<bool, UniverseError> {
        if a == b {
            return Err(UniverseError::InvalidArgument {
                reason: format!("solar system {a} cannot connect to itself"),
            });
        }
        let a_lists_b = self
            .systems
            .get(&a)
            .ok_or(UniverseError::SystemNotFound(a))?
            .connection_exists(b);
        let b_lists_a = self
            .systems
            .get(&b)
            .ok_or(UniverseError::SystemNotFound(b))?
            .connection_exists(a);

        match (a_lists_b, b_lists_a) {
            (true, true) => Ok(false),
            (false, false) => {
                if let Some(system) = self.systems.get_mut(&a) {
                    system.connections.insert(b);
                }
                if let Some(system) = self.systems.get_mut(&b) {
                    system.connections.insert(a);
                }
                Ok(true)
            }
            (true, false) => Err(one_way(a, b)),
            (false, true) => Err(one_way(b, a)),
        }
    }

    /// Whether `a` lists `b` as a peer. Unknown ids are never connected.
    pub fn connection_exists(&self, a: SystemId, b: SystemId) -> bool {
        self.systems
            .get(&a)
            .is_some_and(|system| system.connection_exists(b))
    }

    /// Iterate over each undirected edge once, as `(higher id, lower id)`,
    /// ordered by the higher id.
    pub fn edges(&self) -> impl Iterator<Item = (SystemId, SystemId)> + '_ {
        self.systems.values().flat_map(|system| {
            system
                .connections
                .range(..system.id)
                .map(move |&peer| (system.id, peer))
        })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Ids of systems with no connections.
    pub fn isolated(&self) -> Vec<SystemId> {
        self.systems
            .values()
            .filter(|system| system.is_orphan())
            .map(SolarSystem::id)
            .collect()
    }

    // -------------------------------------------------------------------
    // Graph queries
    // -------------------------------------------------------------------

    /// Every system reachable from `seed`, including `seed` itself.
    ///
    /// Returns an empty set if `seed` is not part of the constellation.
    pub fn reachable_from(&self, seed: SystemId) -> BTreeSet<SystemId> {
        let mut visited = BTreeSet::new();
        if !self.systems.contains_key(&seed) {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited.insert(seed);
        queue.push_back(seed);

        while let Some(current) = queue.pop_front() {
            let Some(system) = self.systems.get(&current) else {
                continue;
            };
            for &peer in &system.connections {
                if visited.insert(peer) {
                    queue.push_back(peer);
                }
            }
        }

        visited
    }

    /// Whether every system is reachable from every other one.
    ///
    /// An empty constellation counts as connected.
    pub fn is_connected(&self) -> bool {
        let Some(&seed) = self.systems.keys().next() else {
            return true;
        };
        self.reachable_from(seed).len() == self.systems.len()
    }

    /// Check the adjacency invariants: every peer exists, lists the
    /// connection back, and no system is connected to itself.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InternalConsistency`] describing the first
    /// broken invariant. Only deserialized or otherwise externally built
    /// constellations can fail this check.
    pub fn verify_adjacency(&self) -> Result<(), UniverseError> {
        for system in self.systems.values() {
            for &peer in &system.connections {
                if peer == system.id {
                    return Err(UniverseError::InternalConsistency {
                        reason: format!("solar system {peer} is connected to itself"),
                    });
                }
                if !self.connection_exists(peer, system.id) {
                    return Err(one_way(system.id, peer));
                }
            }
        }
        Ok(())
    }
}

/// The error for an edge recorded on `from` but not on `to`.
fn one_way(from: SystemId, to: SystemId) -> UniverseError {
    UniverseError::InternalConsistency {
        reason: format!("one-way connection from solar system {from} to {to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> SystemId {
        SystemId::new(raw)
    }

    fn make_constellation(count: u64) -> Constellation {
        let mut constellation = Constellation::new();
        for raw in 0..count {
            let _ = constellation.add_system(SolarSystem::new(id(raw), format!("S-{raw:04}")));
        }
        constellation
    }

    fn make_path(count: u64) -> Constellation {
        let mut constellation = make_constellation(count);
        for raw in 1..count {
            let _ = constellation.add_connection(id(raw - 1), id(raw));
        }
        constellation
    }

    #[test]
    fn add_connection_is_symmetric() {
        let mut constellation = make_constellation(2);
        assert!(matches!(constellation.add_connection(id(0), id(1)), Ok(true)));
        assert!(constellation.connection_exists(id(0), id(1)));
        assert!(constellation.connection_exists(id(1), id(0)));
        assert!(constellation.verify_adjacency().is_ok());
    }

    #[test]
    fn add_connection_is_idempotent() {
        let mut constellation = make_constellation(2);
        let _ = constellation.add_connection(id(0), id(1));
        let before = constellation.clone();
        assert!(matches!(constellation.add_connection(id(1), id(0)), Ok(false)));
        assert!(matches!(constellation.add_connection(id(0), id(1)), Ok(false)));
        assert_eq!(constellation, before);
        assert_eq!(constellation.edge_count(), 1);
    }

    #[test]
    fn self_loop_rejected() {
        let mut constellation = make_constellation(1);
        let result = constellation.add_connection(id(0), id(0));
        assert!(matches!(result, Err(UniverseError::InvalidArgument { .. })));
        assert!(constellation.get(id(0)).is_some_and(SolarSystem::is_orphan));
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut constellation = make_constellation(1);
        let result = constellation.add_connection(id(0), id(9));
        assert!(matches!(result, Err(UniverseError::SystemNotFound(missing)) if missing == id(9)));
    }

    #[test]
    fn one_way_edge_is_internal_inconsistency() {
        let mut constellation = make_constellation(2);
        if let Some(system) = constellation.systems.get_mut(&id(0)) {
            system.connections.insert(id(1));
        }
        let result = constellation.add_connection(id(0), id(1));
        assert!(matches!(result, Err(UniverseError::InternalConsistency { .. })));
        let reverse = constellation.add_connection(id(1), id(0));
        assert!(matches!(reverse, Err(UniverseError::InternalConsistency { .. })));
        assert!(constellation.verify_adjacency().is_err());
    }

    #[test]
    fn duplicate_system_rejected() {
        let mut constellation = make_constellation(1);
        let result = constellation.add_system(SolarSystem::new(id(0), String::from("X-AAAA")));
        assert!(matches!(result, Err(UniverseError::DuplicateSystem(_))));
        assert_eq!(constellation.len(), 1);
    }

    #[test]
    fn edges_are_listed_once_high_to_low() {
        let mut constellation = make_constellation(4);
        let _ = constellation.add_connection(id(0), id(3));
        let _ = constellation.add_connection(id(2), id(1));
        let _ = constellation.add_connection(id(3), id(1));
        let edges: Vec<(SystemId, SystemId)> = constellation.edges().collect();
        assert_eq!(
            edges,
            vec![(id(2), id(1)), (id(3), id(0)), (id(3), id(1))]
        );
    }

    #[test]
    fn isolated_lists_orphans() {
        let mut constellation = make_constellation(4);
        let _ = constellation.add_connection(id(0), id(2));
        assert_eq!(constellation.isolated(), vec![id(1), id(3)]);
    }

    #[test]
    fn path_is_connected() {
        let constellation = make_path(6);
        assert!(constellation.is_connected());
        assert_eq!(constellation.reachable_from(id(5)).len(), 6);
    }

    #[test]
    fn split_graph_is_not_connected() {
        let mut constellation = make_constellation(4);
        let _ = constellation.add_connection(id(0), id(1));
        let _ = constellation.add_connection(id(2), id(3));
        assert!(!constellation.is_connected());
        let reached = constellation.reachable_from(id(0));
        assert_eq!(reached, [id(0), id(1)].into_iter().collect());
    }

    #[test]
    fn reachable_from_unknown_seed_is_empty() {
        let constellation = make_path(3);
        assert!(constellation.reachable_from(id(40)).is_empty());
    }

    #[test]
    fn long_path_needs_no_recursion() {
        let constellation = make_path(50_000);
        assert!(constellation.is_connected());
    }

    #[test]
    fn empty_constellation_is_connected() {
        assert!(Constellation::new().is_connected());
    }

    #[test]
    fn display_lists_peers() {
        let constellation = make_path(3);
        let rendered = constellation.get(id(1)).map(ToString::to_string);
        assert_eq!(
            rendered.as_deref(),
            Some("SolarSystem 1 (S-0001) connections: 0 2")
        );
    }
}
