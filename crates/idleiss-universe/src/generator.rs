//! Random constellation generation with connectivity repair.
//!
//! A constellation starts as `system_count` unconnected systems. A wiring
//! pass then draws `floor(connectedness * system_count)` random pairs
//! (capped at [`MAX_DRAWS_PER_PAIR`] per distinct pair) and connects them;
//! repeated draws of the same pair are absorbed. The result
//! is usually several components plus a few orphans, so a repair loop
//! stitches everything to the component holding the first system (the
//! seed):
//!
//! 1. Flood from the seed and classify every system as *flooded*
//!    (reachable), *orphan* (no connections) or *disjoint* (connected to
//!    something, but not reachable).
//! 2. If any disjoint system exists, connect the first one to a random
//!    flooded system and flood again. One edge merges a whole component.
//! 3. Otherwise only orphans are left. Connect each orphan, in id order, to a
//!    random pick among the flooded systems and the orphans already handled
//!    in this pass.
//!
//! The loop ends when the flood covers every system. Each cycle merges at
//! least one component, so it ends after at most one cycle per component;
//! `max_repair_cycles` caps it regardless.

use idleiss_types::SystemId;
use rand::seq::IndexedRandom;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::UniverseError;
use crate::graph::{Constellation, SolarSystem};
use crate::session::Session;

/// Smallest constellation that can be generated.
pub const MIN_CONSTELLATION_SIZE: usize = 2;

/// Upper bound on random draws per distinct pair of systems.
pub const MAX_DRAWS_PER_PAIR: usize = 8;

/// Tuning parameters for [`ConstellationGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Random edges drawn per system before repair. Typical values sit
    /// between 1.0 and 1.5; denser graphs need fewer repair edges.
    #[serde(default = "default_connectedness")]
    pub connectedness: f64,

    /// Repair cycles allowed before giving up with
    /// [`UniverseError::FailedToConverge`].
    #[serde(default = "default_max_repair_cycles")]
    pub max_repair_cycles: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            connectedness: default_connectedness(),
            max_repair_cycles: default_max_repair_cycles(),
        }
    }
}

const fn default_connectedness() -> f64 {
    1.35
}

const fn default_max_repair_cycles() -> u32 {
    10_000
}

/// Builds connected constellations using a [`Session`]'s random source and
/// name registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationGenerator {
    config: GeneratorConfig,
}

/// Systems of a constellation sorted by how the last flood reached them.
#[derive(Debug, Default)]
struct Classification {
    flooded: Vec<SystemId>,
    orphans: Vec<SystemId>,
    disjoint: Vec<SystemId>,
}

impl ConstellationGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidArgument`] if `connectedness` is
    /// negative, NaN or infinite.
    pub fn new(config: GeneratorConfig) -> Result<Self, UniverseError> {
        if !config.connectedness.is_finite() || config.connectedness < 0.0 {
            return Err(UniverseError::InvalidArgument {
                reason: format!(
                    "connectedness must be a finite, non-negative number, got {}",
                    config.connectedness
                ),
            });
        }
        Ok(Self { config })
    }

    /// Create a generator with the given connectedness and the default
    /// repair ceiling.
    ///
    /// # Errors
    ///
    /// See [`ConstellationGenerator::new`].
    pub fn with_connectedness(connectedness: f64) -> Result<Self, UniverseError> {
        Self::new(GeneratorConfig {
            connectedness,
            ..GeneratorConfig::default()
        })
    }

    /// The generator's parameters.
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The configured connectedness.
    pub const fn connectedness(&self) -> f64 {
        self.config.connectedness
    }

    /// Generate a single connected constellation of `system_count` systems.
    ///
    /// New systems take the session's next ids and freshly allocated names.
    /// Generation runs against a copy of the session that replaces it only
    /// on success: a failed call leaves names, ids, and the random stream
    /// as they were.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidArgument`] if `system_count` is below
    /// [`MIN_CONSTELLATION_SIZE`], and [`UniverseError::FailedToConverge`] if
    /// repair exceeds `max_repair_cycles`.
    pub fn generate(
        &self,
        session: &mut Session,
        system_count: usize,
    ) -> Result<Constellation, UniverseError> {
        if system_count < MIN_CONSTELLATION_SIZE {
            return Err(UniverseError::InvalidArgument {
                reason: format!(
                    "a constellation needs at least {MIN_CONSTELLATION_SIZE} systems, got {system_count}"
                ),
            });
        }

        let mut staged = session.clone();
        let constellation = self.build(&mut staged, system_count)?;
        *session = staged;
        Ok(constellation)
    }

    fn build(
        &self,
        session: &mut Session,
        system_count: usize,
    ) -> Result<Constellation, UniverseError> {
        let mut constellation = Constellation::new();
        let mut ids = Vec::with_capacity(system_count);
        for _ in 0..system_count {
            let name = session.allocate_name()?;
            let id = session.allocate_system_id()?;
            constellation.add_system(SolarSystem::new(id, name))?;
            ids.push(id);
        }

        let draws = self.edge_draws(system_count);
        for _ in 0..draws {
            let (a, b) = pick_pair(session, &ids)?;
            constellation.add_connection(a, b)?;
        }
        let random_edges = constellation.edge_count();

        let cycles = self.repair(session, &mut constellation, &ids)?;

        info!(
            systems = system_count,
            first_id = ids.first().map_or(0, |id| id.into_inner()),
            random_edges,
            edges = constellation.edge_count(),
            repair_cycles = cycles,
            "Constellation generated"
        );

        Ok(constellation)
    }

    /// Number of random pairs to draw for `system_count` systems.
    ///
    /// Capped at [`MAX_DRAWS_PER_PAIR`] draws per distinct pair; past that
    /// point the graph is complete with overwhelming probability.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn edge_draws(&self, system_count: usize) -> usize {
        // Float-to-int `as` saturates; connectedness is finite and >= 0.
        let requested = (self.config.connectedness * system_count as f64).floor() as usize;
        let pairs = system_count.saturating_mul(system_count.saturating_sub(1)) / 2;
        requested.min(pairs.saturating_mul(MAX_DRAWS_PER_PAIR))
    }

    /// Stitch every component to the seed's component. Returns the number
    /// of repair cycles used.
    fn repair(
        &self,
        session: &mut Session,
        constellation: &mut Constellation,
        ids: &[SystemId],
    ) -> Result<u32, UniverseError> {
        let Some((&seed, others)) = ids.split_first() else {
            return Ok(0);
        };

        // Never start the flood on an orphan.
        if constellation.get(seed).is_some_and(SolarSystem::is_orphan) {
            let target = pick(session, others, seed)?;
            constellation.add_connection(seed, target)?;
        }

        let mut cycles: u32 = 0;
        loop {
            let flooded = constellation.reachable_from(seed);
            if flooded.len() == ids.len() {
                return Ok(cycles);
            }
            if cycles >= self.config.max_repair_cycles {
                return Err(UniverseError::FailedToConverge {
                    cycles: self.config.max_repair_cycles,
                });
            }
            cycles = cycles.saturating_add(1);

            let mut classes = Classification::default();
            for &id in ids {
                if constellation.get(id).is_some_and(SolarSystem::is_orphan) {
                    classes.orphans.push(id);
                } else if flooded.contains(&id) {
                    classes.flooded.push(id);
                } else {
                    classes.disjoint.push(id);
                }
            }
            debug!(
                cycle = cycles,
                flooded = classes.flooded.len(),
                orphans = classes.orphans.len(),
                disjoint = classes.disjoint.len(),
                "Repairing constellation"
            );

            if let Some(&stray) = classes.disjoint.first() {
                let target = pick(session, &classes.flooded, stray)?;
                constellation.add_connection(stray, target)?;
                continue;
            }

            // Orphans handled earlier in this pass become valid targets.
            let mut targets = classes.flooded;
            for orphan in classes.orphans {
                let target = pick(session, &targets, orphan)?;
                constellation.add_connection(orphan, target)?;
                targets.push(orphan);
            }
        }
    }
}

/// Draw two distinct systems uniformly at random.
fn pick_pair(session: &mut Session, ids: &[SystemId]) -> Result<(SystemId, SystemId), UniverseError> {
    let mut picks = index::sample(session.rng_mut(), ids.len(), 2).into_iter();
    let first = picks.next().and_then(|i| ids.get(i).copied());
    let second = picks.next().and_then(|i| ids.get(i).copied());
    match (first, second) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(UniverseError::InternalConsistency {
            reason: format!("cannot draw two systems from {}", ids.len()),
        }),
    }
}

/// Pick a random connection target for `system` from `candidates`.
fn pick(
    session: &mut Session,
    candidates: &[SystemId],
    system: SystemId,
) -> Result<SystemId, UniverseError> {
    candidates
        .choose(session.rng_mut())
        .copied()
        .ok_or_else(|| UniverseError::InternalConsistency {
            reason: format!("no reachable solar system to attach {system} to"),
        })
}
