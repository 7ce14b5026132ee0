//! Collision-free naming for every entity in a universe.
//!
//! Solar systems get generated codes in the style `D-PNP9`, `6VDT-H` or
//! `CCP-US`: five uppercase letters or digits with a single dash at an
//! internal position. Regions, constellations, and hand-named systems from a
//! configuration share the same [`NameRegistry`], so no two entities of a
//! session can ever carry the same name.

use std::collections::BTreeSet;

use rand::Rng;

use crate::error::UniverseError;

/// Characters a generated system code is drawn from.
const NAME_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Number of alphanumeric characters in a generated code (the dash is extra).
pub const NAME_CODE_LEN: usize = 5;

/// Draw a single system code from `rng`.
///
/// The dash position is drawn first, uniformly from 1 to 4, so the prefix
/// before the dash has between one and four characters. The five characters
/// are then drawn uniformly from `A-Z` and `0-9`.
pub fn generate_system_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let dash_position = rng.random_range(1..NAME_CODE_LEN);
    let mut name = String::with_capacity(NAME_CODE_LEN.saturating_add(1));
    for position in 0..NAME_CODE_LEN {
        if position == dash_position {
            name.push('-');
        }
        let index = rng.random_range(0..NAME_ALPHABET.len());
        name.push(NAME_ALPHABET.get(index).map_or('A', |&byte| char::from(byte)));
    }
    name
}

/// The set of every name registered during a session.
///
/// Names are never released: once registered, a name stays taken for the
/// lifetime of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRegistry {
    used: BTreeSet<String>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            used: BTreeSet::new(),
        }
    }

    /// Whether `name` has already been registered.
    pub fn exists(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Reserve `name`.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::DuplicateName`] if the name is already taken.
    pub fn register(&mut self, name: &str) -> Result<(), UniverseError> {
        if self.used.contains(name) {
            return Err(UniverseError::DuplicateName(name.to_owned()));
        }
        self.used.insert(name.to_owned());
        Ok(())
    }

    /// Draw system codes from `rng` until one is not yet registered.
    ///
    /// The returned name is NOT reserved; see [`allocate`](Self::allocate).
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        loop {
            let candidate = generate_system_name(rng);
            if !self.exists(&candidate) {
                return candidate;
            }
        }
    }

    /// Generate an unused system code and reserve it in one step.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the generated code is unused by construction.
    /// The [`Result`] mirrors [`register`](Self::register).
    pub fn allocate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, UniverseError> {
        let name = self.generate(rng);
        self.register(&name)?;
        Ok(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether no name has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Iterate over registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(String::as_str)
    }
}
