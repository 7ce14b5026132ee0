//! Error types for the `idleiss-universe` crate.
//!
//! All fallible operations in this crate return [`UniverseError`] through the
//! standard [`Result`] type. Loading a configuration from bytes adds the
//! I/O and parser failures of [`ConfigError`](crate::config::ConfigError).

use idleiss_types::SystemId;

use crate::config::StructureGap;
use crate::validation::ConsistencyRule;

/// Errors that can occur while naming, generating, or validating a universe.
///
/// Every variant is fatal for the operation that produced it: inputs are
/// deterministic, so retrying the same call fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// A caller supplied an argument outside the accepted range.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// A name was registered twice within one session.
    #[error("entity name exists: {0}")]
    DuplicateName(String),

    /// A solar system was not found in the constellation.
    #[error("solar system not found: {0}")]
    SystemNotFound(SystemId),

    /// A solar system id was inserted twice into one constellation.
    #[error("duplicate solar system id: {0}")]
    DuplicateSystem(SystemId),

    /// The configuration document is missing a required key.
    #[error("{0}")]
    ConfigStructure(StructureGap),

    /// A cross-field consistency rule of the configuration does not hold.
    #[error(
        "{rule} violated: expected {expected}, found {actual}{}",
        location(.region.as_deref(), .constellation.as_deref())
    )]
    ConfigConsistency {
        /// The violated rule.
        rule: ConsistencyRule,
        /// The value the rule requires (the bound, for upper-bound rules).
        expected: u64,
        /// The value found in the configuration.
        actual: u64,
        /// Offending region, for per-region rules.
        region: Option<String>,
        /// Offending constellation, for per-constellation rules.
        constellation: Option<String>,
    },

    /// A region declares a security rating outside High, Low and Null.
    #[error("{region}: invalid security rating {value:?}")]
    InvalidSecurityTier {
        /// The region carrying the bad rating.
        region: String,
        /// The rating as written in the configuration.
        value: String,
    },

    /// The adjacency structure broke one of its own invariants.
    #[error("internal consistency violated: {reason}")]
    InternalConsistency {
        /// Description of the broken invariant.
        reason: String,
    },

    /// Connectivity repair hit its cycle ceiling without connecting the graph.
    #[error("constellation failed to converge within {cycles} repair cycles")]
    FailedToConverge {
        /// The configured ceiling.
        cycles: u32,
    },

    /// Arithmetic overflow while evaluating a configuration rule.
    #[error("arithmetic overflow while checking {rule}")]
    ArithmeticOverflow {
        /// The rule being evaluated.
        rule: ConsistencyRule,
    },

    /// The solar system id counter ran out of values.
    #[error("solar system id space exhausted")]
    IdsExhausted,

    /// A structurally complete document holds values of the wrong type.
    #[error("malformed configuration value: {reason}")]
    Deserialize {
        /// The deserializer's description of the problem.
        reason: String,
    },
}

/// Render the `" (region: X, constellation: Y)"` suffix of a consistency error.
fn location(region: Option<&str>, constellation: Option<&str>) -> String {
    match (region, constellation) {
        (Some(region), Some(constellation)) => {
            format!(" (region: {region}, constellation: {constellation})")
        }
        (Some(region), None) => format!(" (region: {region})"),
        (None, Some(constellation)) => format!(" (constellation: {constellation})"),
        (None, None) => String::new(),
    }
}
