//! Universe configuration: typed schema, structural check, and loaders.
//!
//! A universe is described by a nested document (JSON or YAML) whose keys
//! are human-readable phrases such as `"System Count"`. Loading happens in
//! three steps:
//!
//! 1. parse the bytes into a [`serde_json::Value`],
//! 2. run [`missing_keys`] on the raw document so a missing key is reported
//!    by name rather than as a generic deserialization failure,
//! 3. deserialize into [`UniverseConfig`].
//!
//! Cross-field consistency is checked separately by
//! [`verify`](crate::validation::verify).

use std::collections::BTreeMap;
use std::path::Path;

use idleiss_types::SecurityTier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UniverseError;

/// Required top-level keys, in the order they are reported.
pub const REQUIRED_KEYS: [&str; 15] = [
    "Universe Seed",
    "System Count",
    "Constellation Count",
    "Systems Per Constellation",
    "Region Count",
    "Constellations Per Region",
    "Systems Per Region",
    "High Security Systems",
    "High Security Regions",
    "Low Security Systems",
    "Low Security Regions",
    "Null Security Systems",
    "Null Security Regions",
    "Connectedness",
    "Universe Structure",
];

/// Required keys of every region in `"Universe Structure"`.
pub const REQUIRED_REGION_KEYS: [&str; 4] = [
    "Security",
    "Orphan Systems",
    "Special Systems",
    "Constellations",
];

/// Errors that can occur when loading a universe configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The document parsed but is not a valid universe configuration.
    #[error("invalid universe config: {source}")]
    Invalid {
        /// The structural or consistency failure.
        #[from]
        source: UniverseError,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// The first structural gap found in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureGap {
    /// Top-level keys are missing.
    TopLevel {
        /// The missing keys, in [`REQUIRED_KEYS`] order.
        keys: Vec<&'static str>,
    },
    /// A region is missing required keys.
    Region {
        /// The incomplete region.
        region: String,
        /// The missing keys, in [`REQUIRED_REGION_KEYS`] order.
        keys: Vec<&'static str>,
    },
    /// A value that must be an object is something else.
    NotAnObject {
        /// Where the value sits: `"Universe Structure"` or a region name.
        path: String,
    },
}

impl core::fmt::Display for StructureGap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TopLevel { keys } => write!(f, "{} not found in config", keys.join(", ")),
            Self::Region { region, keys } => {
                write!(f, "{region}: {} not found in config", keys.join(", "))
            }
            Self::NotAnObject { path } => write!(f, "{path}: expected an object in config"),
        }
    }
}

/// Report the first structural gap of a raw configuration document, or
/// `None` if every required key is present.
///
/// Top-level keys are checked first. Regions are then checked in name
/// order, and the first incomplete region is reported with all of its
/// missing keys.
pub fn missing_keys(document: &Value) -> Option<StructureGap> {
    let Some(root) = document.as_object() else {
        return Some(StructureGap::TopLevel {
            keys: REQUIRED_KEYS.to_vec(),
        });
    };

    let missing: Vec<&'static str> = REQUIRED_KEYS
        .into_iter()
        .filter(|key| !root.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Some(StructureGap::TopLevel { keys: missing });
    }

    let Some(regions) = root.get("Universe Structure").and_then(Value::as_object) else {
        return Some(StructureGap::NotAnObject {
            path: String::from("Universe Structure"),
        });
    };

    let mut names: Vec<&String> = regions.keys().collect();
    names.sort();
    for name in names {
        let Some(region) = regions.get(name).and_then(Value::as_object) else {
            return Some(StructureGap::NotAnObject { path: name.clone() });
        };
        let missing: Vec<&'static str> = REQUIRED_REGION_KEYS
            .into_iter()
            .filter(|key| !region.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Some(StructureGap::Region {
                region: name.clone(),
                keys: missing,
            });
        }
    }

    None
}

/// A complete universe configuration.
///
/// Field names follow the document keys; see [`REQUIRED_KEYS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Seed for the session's random source.
    #[serde(rename = "Universe Seed")]
    pub universe_seed: u64,

    /// Total number of solar systems.
    #[serde(rename = "System Count")]
    pub system_count: u64,

    /// Total number of constellations.
    #[serde(rename = "Constellation Count")]
    pub constellation_count: u64,

    /// Systems in every fully specified constellation.
    #[serde(rename = "Systems Per Constellation")]
    pub systems_per_constellation: u64,

    /// Total number of regions.
    #[serde(rename = "Region Count")]
    pub region_count: u64,

    /// Constellations in every fully specified region.
    #[serde(rename = "Constellations Per Region")]
    pub constellations_per_region: u64,

    /// Systems in every region.
    #[serde(rename = "Systems Per Region")]
    pub systems_per_region: u64,

    /// Systems in high security space.
    #[serde(rename = "High Security Systems")]
    pub high_security_systems: u64,

    /// Regions of high security space.
    #[serde(rename = "High Security Regions")]
    pub high_security_regions: u64,

    /// Systems in low security space.
    #[serde(rename = "Low Security Systems")]
    pub low_security_systems: u64,

    /// Regions of low security space.
    #[serde(rename = "Low Security Regions")]
    pub low_security_regions: u64,

    /// Systems in null security space.
    #[serde(rename = "Null Security Systems")]
    pub null_security_systems: u64,

    /// Regions of null security space.
    #[serde(rename = "Null Security Regions")]
    pub null_security_regions: u64,

    /// Random edges per system used when generating constellations.
    #[serde(rename = "Connectedness")]
    pub connectedness: f64,

    /// Regions by name.
    #[serde(rename = "Universe Structure")]
    pub universe_structure: BTreeMap<String, RegionConfig>,
}

/// One region of the universe structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Security rating as written: `"High"`, `"Low"` or `"Null"`.
    #[serde(rename = "Security", deserialize_with = "security_rating")]
    pub security: String,

    /// Named systems that belong to no constellation.
    #[serde(rename = "Orphan Systems")]
    pub orphan_systems: Vec<String>,

    /// Named systems with special roles.
    #[serde(rename = "Special Systems")]
    pub special_systems: Vec<String>,

    /// Constellations by name, each an ordered list of system names.
    #[serde(rename = "Constellations")]
    pub constellations: BTreeMap<String, Vec<String>>,
}

/// Read a security rating verbatim. A non-string value keeps its literal
/// text (`null`, `3`, `true`) so validation can report it as an invalid
/// tier.
fn security_rating<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(rating) => rating,
        other => other.to_string(),
    })
}

/// Rewrite null `Security` values to `"Null"`. YAML reads an unquoted
/// `Null` as the null value; JSON documents never go through this.
fn normalize_yaml_ratings(document: &mut Value) {
    let Some(regions) = document
        .get_mut("Universe Structure")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    for region in regions.values_mut() {
        if let Some(rating) = region.get_mut("Security").filter(|rating| rating.is_null()) {
            *rating = Value::String(SecurityTier::Null.as_str().to_owned());
        }
    }
}

impl RegionConfig {
    /// The parsed security tier, or `None` for an unknown rating.
    pub fn tier(&self) -> Option<SecurityTier> {
        SecurityTier::parse(&self.security)
    }
}

impl UniverseConfig {
    /// Declared system count for `tier`.
    pub const fn tier_systems(&self, tier: SecurityTier) -> u64 {
        match tier {
            SecurityTier::High => self.high_security_systems,
            SecurityTier::Low => self.low_security_systems,
            SecurityTier::Null => self.null_security_systems,
        }
    }

    /// Declared region count for `tier`.
    pub const fn tier_regions(&self, tier: SecurityTier) -> u64 {
        match tier {
            SecurityTier::High => self.high_security_regions,
            SecurityTier::Low => self.low_security_regions,
            SecurityTier::Null => self.null_security_regions,
        }
    }

    /// Build a configuration from a raw document.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::ConfigStructure`] for a missing key and
    /// [`UniverseError::Deserialize`] for a value of the wrong type.
    pub fn from_value(document: Value) -> Result<Self, UniverseError> {
        if let Some(gap) = missing_keys(&document) {
            return Err(UniverseError::ConfigStructure(gap));
        }
        serde_json::from_value(document).map_err(|e| UniverseError::Deserialize {
            reason: e.to_string(),
        })
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not valid JSON, or
    /// [`ConfigError::Invalid`] if the document is incomplete.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(document)?)
    }

    /// Parse a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if the document is incomplete.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut document: Value = serde_yml::from_str(yaml)?;
        normalize_yaml_ratings(&mut document);
        Ok(Self::from_value(document)?)
    }

    /// Load a configuration file. Files ending in `.yaml` or `.yml` are read
    /// as YAML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus the
    /// errors of [`parse_json`](Self::parse_json) and
    /// [`parse_yaml`](Self::parse_yaml).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::parse_yaml(&contents)
        } else {
            Self::parse_json(&contents)
        }
    }
}
