//! Shared type definitions for the Idle ISS universe generator.
//!
//! Every crate in the workspace speaks in these types, so identifiers and
//! the security classification of a region can never be mixed up with plain
//! integers or free-form strings.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for entity identifiers
//! - [`enums`] -- Closed enumerations (security tiers)

pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::SecurityTier;
pub use ids::SystemId;
