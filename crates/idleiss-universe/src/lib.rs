//! Universe generation for Idle ISS.
//!
//! This crate builds the star map: solar systems grouped into randomly
//! wired but always connected constellations, with every name unique in
//! its universe. It also loads and cross-checks the universe configuration
//! document that describes regions, constellations, and security tiers.
//!
//! # Modules
//!
//! - [`names`] -- System code generation (`D-PNP9`) and the name registry.
//! - [`graph`] -- [`SolarSystem`] nodes and the [`Constellation`] graph,
//!   with symmetric connections and reachability queries.
//! - [`generator`] -- Random wiring plus connectivity repair.
//! - [`session`] -- Seeded random source, registry, and id counter for one
//!   universe.
//! - [`config`] -- Typed configuration schema and JSON/YAML loaders.
//! - [`validation`] -- Cross-field consistency rules for a configuration.
//! - [`universe`] -- The [`Universe`] facade tying the above together.
//! - [`export`] -- Edge-list and plain-graph projections for external tools.
//! - [`error`] -- Error types.
//!
//! # Example
//!
//! ```
//! use idleiss_universe::Universe;
//!
//! let mut universe = Universe::new(42, 1.35)?;
//! let constellation = universe.generate_constellation(15)?;
//! assert_eq!(constellation.len(), 15);
//! assert!(constellation.is_connected());
//! # Ok::<(), idleiss_universe::UniverseError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod graph;
pub mod names;
pub mod session;
pub mod universe;
pub mod validation;

// Re-export primary types at crate root.
pub use config::{ConfigError, RegionConfig, StructureGap, UniverseConfig, missing_keys};
pub use error::UniverseError;
pub use export::{GraphExport, edge_list};
pub use generator::{
    ConstellationGenerator, GeneratorConfig, MAX_DRAWS_PER_PAIR, MIN_CONSTELLATION_SIZE,
};
pub use graph::{Constellation, SolarSystem};
pub use names::{NameRegistry, generate_system_name};
pub use session::Session;
pub use universe::Universe;
pub use validation::{ConsistencyRule, verify};
