//! The [`Universe`]: one session, one generator, and optionally the
//! configuration it was built from.

use std::path::Path;

use tracing::info;

use crate::config::{ConfigError, UniverseConfig};
use crate::error::UniverseError;
use crate::generator::ConstellationGenerator;
use crate::graph::Constellation;
use crate::session::Session;
use crate::validation;

/// A universe under construction.
///
/// Every name and id handed out by [`generate_constellation`] is unique
/// within the universe, including against names reserved by its
/// configuration.
///
/// [`generate_constellation`]: Universe::generate_constellation
#[derive(Debug, Clone)]
pub struct Universe {
    session: Session,
    generator: ConstellationGenerator,
    config: Option<UniverseConfig>,
}

impl Universe {
    /// Create an unconfigured universe.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidArgument`] if `connectedness` is
    /// negative or not finite.
    pub fn new(seed: u64, connectedness: f64) -> Result<Self, UniverseError> {
        Ok(Self {
            session: Session::new(seed),
            generator: ConstellationGenerator::with_connectedness(connectedness)?,
            config: None,
        })
    }

    /// Validate `config` and build a universe from it.
    ///
    /// The session is seeded with `Universe Seed`, and every region,
    /// constellation, and system name in the structure is reserved.
    ///
    /// # Errors
    ///
    /// Returns the first violation found by
    /// [`verify`](crate::validation::verify), or
    /// [`UniverseError::InvalidArgument`] for a bad `Connectedness`.
    pub fn from_config(config: UniverseConfig) -> Result<Self, UniverseError> {
        let generator = ConstellationGenerator::with_connectedness(config.connectedness)?;
        let mut session = Session::new(config.universe_seed);
        validation::verify(&config, session.names_mut())?;

        info!(
            seed = config.universe_seed,
            systems = config.system_count,
            constellations = config.constellation_count,
            regions = config.region_count,
            reserved_names = session.names().len(),
            "Universe configuration verified"
        );

        Ok(Self {
            session,
            generator,
            config: Some(config),
        })
    }

    /// Load, check, and verify a configuration file.
    ///
    /// # Errors
    ///
    /// See [`UniverseConfig::from_file`] and [`from_config`](Self::from_config).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading universe configuration");
        let config = UniverseConfig::from_file(path)?;
        Ok(Self::from_config(config)?)
    }

    /// Parse and verify a JSON configuration.
    ///
    /// # Errors
    ///
    /// See [`UniverseConfig::parse_json`] and [`from_config`](Self::from_config).
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_config(UniverseConfig::parse_json(json)?)?)
    }

    /// Parse and verify a YAML configuration.
    ///
    /// # Errors
    ///
    /// See [`UniverseConfig::parse_yaml`] and [`from_config`](Self::from_config).
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_config(UniverseConfig::parse_yaml(yaml)?)?)
    }

    /// Generate one connected constellation of `system_count` systems.
    ///
    /// # Errors
    ///
    /// See [`ConstellationGenerator::generate`].
    pub fn generate_constellation(
        &mut self,
        system_count: usize,
    ) -> Result<Constellation, UniverseError> {
        self.generator.generate(&mut self.session, system_count)
    }

    /// The configuration this universe was built from, if any.
    pub const fn config(&self) -> Option<&UniverseConfig> {
        self.config.as_ref()
    }

    /// The universe's generation state.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The target average number of random edges per system.
    pub const fn connectedness(&self) -> f64 {
        self.generator.connectedness()
    }

    /// Whether `name` is taken in this universe.
    pub fn name_exists(&self, name: &str) -> bool {
        self.session.name_exists(name)
    }
}
