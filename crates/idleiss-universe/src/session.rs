//! Per-universe generation state.
//!
//! A [`Session`] bundles everything that must persist across generation
//! calls for one universe: the seeded random source, the name registry, and
//! the next free solar system id. It replaces process-wide state, so any
//! number of independent universes can coexist in one process.
//!
//! # Determinism
//!
//! The random source is a `ChaCha8` stream seeded once from the universe
//! seed and never reseeded. Given the same seed and the same sequence of
//! calls, a session produces the same ids, names and edges on every
//! platform.

use idleiss_types::SystemId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::UniverseError;
use crate::names::NameRegistry;

/// Generation state owned by one universe.
///
/// Every operation takes `&mut self`; a session shared between threads
/// needs external synchronization.
#[derive(Debug, Clone)]
pub struct Session {
    /// The seed the random source was created from.
    seed: u64,
    /// The single random source shared by naming and wiring.
    rng: ChaCha8Rng,
    /// Every name registered so far.
    names: NameRegistry,
    /// The id the next solar system will receive.
    next_system_id: SystemId,
}

impl Session {
    /// Create a session with an empty registry, seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            names: NameRegistry::new(),
            next_system_id: SystemId::new(0),
        }
    }

    /// The seed this session was created from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The session's random source.
    pub const fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// The session's name registry.
    pub const fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// Mutable access to the session's name registry.
    pub const fn names_mut(&mut self) -> &mut NameRegistry {
        &mut self.names
    }

    /// Whether `name` is already taken in this session.
    pub fn name_exists(&self, name: &str) -> bool {
        self.names.exists(name)
    }

    /// Reserve a caller-chosen name.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::DuplicateName`] if the name is taken.
    pub fn register_name(&mut self, name: &str) -> Result<(), UniverseError> {
        self.names.register(name)
    }

    /// Generate and reserve a fresh system code using the session's random
    /// source.
    ///
    /// # Errors
    ///
    /// See [`NameRegistry::allocate`].
    pub fn allocate_name(&mut self) -> Result<String, UniverseError> {
        self.names.allocate(&mut self.rng)
    }

    /// The id the next solar system will receive.
    pub const fn next_system_id(&self) -> SystemId {
        self.next_system_id
    }

    /// Hand out the next solar system id.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::IdsExhausted`] once `u64::MAX` has been used.
    pub fn allocate_system_id(&mut self) -> Result<SystemId, UniverseError> {
        let id = self.next_system_id;
        self.next_system_id = id.next().ok_or(UniverseError::IdsExhausted)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut session = Session::new(1);
        let ids: Vec<u64> = (0..4)
            .filter_map(|_| session.allocate_system_id().ok())
            .map(SystemId::into_inner)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(session.next_system_id(), SystemId::new(4));
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let mut session = Session::new(1);
        session.next_system_id = SystemId::new(u64::MAX);
        assert!(matches!(
            session.allocate_system_id(),
            Err(UniverseError::IdsExhausted)
        ));
    }

    #[test]
    fn same_seed_same_names() {
        let mut a = Session::new(42);
        let mut b = Session::new(42);
        for _ in 0..20 {
            assert_eq!(a.allocate_name().ok(), b.allocate_name().ok());
        }
    }

    #[test]
    fn sessions_are_isolated() {
        let mut a = Session::new(42);
        let b = Session::new(42);
        assert!(a.register_name("Genesis").is_ok());
        assert!(a.name_exists("Genesis"));
        assert!(!b.name_exists("Genesis"));
    }

    #[test]
    fn allocated_names_are_registered() {
        let mut session = Session::new(5);
        let name = session.allocate_name().unwrap_or_default();
        assert!(session.name_exists(&name));
        assert!(session.register_name(&name).is_err());
    }
}
