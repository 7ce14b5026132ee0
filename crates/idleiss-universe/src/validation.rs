//! Cross-field consistency checks for a [`UniverseConfig`].
//!
//! [`verify`] evaluates the rules below in a fixed order and stops at the
//! first violation:
//!
//! | Stage | Check |
//! |-------|-------|
//! | Counters | [`COUNTER_RULES`]: total and per-tier system arithmetic, region totals |
//! | Tiers | every region's `Security` is High, Low or Null |
//! | Tier regions | [`TIER_REGION_RULES`]: declared per-tier region counts match the structure |
//! | Region shape | High/Low regions are complete, Null regions stay within bounds |
//! | Names | every region, constellation, and system name is unique |
//!
//! Names are registered into a copy of the caller's [`NameRegistry`] that is
//! committed only when every check passes, so a failed verification leaves
//! the registry untouched.

use idleiss_types::SecurityTier;
use tracing::debug;

use crate::config::{RegionConfig, UniverseConfig};
use crate::error::UniverseError;
use crate::names::NameRegistry;

/// A named consistency rule of a universe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyRule {
    /// `System Count == Constellation Count * Systems Per Constellation`.
    SystemsByConstellation,
    /// `System Count == Region Count * Systems Per Region`.
    SystemsByRegion,
    /// `System Count == Region Count * Constellations Per Region * Systems Per Constellation`.
    SystemsByRegionAndConstellation,
    /// `<tier> Security Systems == <tier> Security Regions * Systems Per Region`.
    TierSystems(SecurityTier),
    /// `Region Count == High + Low + Null Security Regions`.
    RegionTierSum,
    /// `Region Count ==` number of regions in `Universe Structure`.
    RegionsEnumerated,
    /// `<tier> Security Regions ==` number of regions rated `<tier>`.
    TierRegions(SecurityTier),
    /// A High or Low region has exactly `Constellations Per Region` constellations.
    ConstellationsPerRegion,
    /// A High or Low constellation has exactly `Systems Per Constellation` systems.
    SystemsPerConstellation,
    /// A Null region has at most `Constellations Per Region` constellations.
    NullConstellationsPerRegion,
    /// A Null constellation has at most `Systems Per Constellation` systems.
    NullSystemsPerConstellation,
}

impl core::fmt::Display for ConsistencyRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SystemsByConstellation => f.write_str(
                "'System Count' == 'Constellation Count' * 'Systems Per Constellation'",
            ),
            Self::SystemsByRegion => {
                f.write_str("'System Count' == 'Region Count' * 'Systems Per Region'")
            }
            Self::SystemsByRegionAndConstellation => f.write_str(
                "'System Count' == 'Region Count' * 'Constellations Per Region' * 'Systems Per Constellation'",
            ),
            Self::TierSystems(tier) => write!(
                f,
                "'{tier} Security Systems' == '{tier} Security Regions' * 'Systems Per Region'"
            ),
            Self::RegionTierSum => f.write_str(
                "'Region Count' == 'High Security Regions' + 'Low Security Regions' + 'Null Security Regions'",
            ),
            Self::RegionsEnumerated => {
                f.write_str("'Region Count' == number of regions in 'Universe Structure'")
            }
            Self::TierRegions(tier) => write!(
                f,
                "'{tier} Security Regions' == number of regions with Security {tier}"
            ),
            Self::ConstellationsPerRegion => {
                f.write_str("constellations in region == 'Constellations Per Region'")
            }
            Self::SystemsPerConstellation => {
                f.write_str("systems in constellation == 'Systems Per Constellation'")
            }
            Self::NullConstellationsPerRegion => {
                f.write_str("constellations in null region <= 'Constellations Per Region'")
            }
            Self::NullSystemsPerConstellation => {
                f.write_str("systems in null constellation <= 'Systems Per Constellation'")
            }
        }
    }
}

/// A predicate over a whole configuration.
pub type RuleCheck = fn(&UniverseConfig) -> Result<(), UniverseError>;

/// Counter rules, in evaluation order.
pub const COUNTER_RULES: [(ConsistencyRule, RuleCheck); 8] = [
    (ConsistencyRule::SystemsByConstellation, systems_by_constellation),
    (ConsistencyRule::SystemsByRegion, systems_by_region),
    (
        ConsistencyRule::SystemsByRegionAndConstellation,
        systems_by_region_and_constellation,
    ),
    (ConsistencyRule::TierSystems(SecurityTier::High), high_security_systems),
    (ConsistencyRule::TierSystems(SecurityTier::Low), low_security_systems),
    (ConsistencyRule::TierSystems(SecurityTier::Null), null_security_systems),
    (ConsistencyRule::RegionTierSum, region_tier_sum),
    (ConsistencyRule::RegionsEnumerated, regions_enumerated),
];

/// Declared-versus-actual tier region rules, in evaluation order.
///
/// These assume every region carries a valid rating; [`verify`] checks that
/// first.
pub const TIER_REGION_RULES: [(ConsistencyRule, RuleCheck); 3] = [
    (ConsistencyRule::TierRegions(SecurityTier::High), high_security_regions),
    (ConsistencyRule::TierRegions(SecurityTier::Low), low_security_regions),
    (ConsistencyRule::TierRegions(SecurityTier::Null), null_security_regions),
];

/// Check every consistency rule of `config` and register all of its names.
///
/// Security ratings are checked before the tier region counts: a region
/// with an unknown rating belongs to no tier, so the counts would report a
/// mismatch and the bad rating itself would never surface.
///
/// # Errors
///
/// Returns the first violation: [`UniverseError::ConfigConsistency`],
/// [`UniverseError::ArithmeticOverflow`],
/// [`UniverseError::InvalidSecurityTier`] or [`UniverseError::DuplicateName`].
pub fn verify(config: &UniverseConfig, registry: &mut NameRegistry) -> Result<(), UniverseError> {
    for (_, check) in COUNTER_RULES {
        check(config)?;
    }
    debug!(
        system_count = config.system_count,
        region_count = config.region_count,
        "Universe counters consistent"
    );

    check_security_tiers(config)?;
    for (_, check) in TIER_REGION_RULES {
        check(config)?;
    }

    for (name, region) in &config.universe_structure {
        check_region_shape(config, name, region)?;
    }
    debug!(
        regions = config.universe_structure.len(),
        "Universe structure consistent"
    );

    let mut staged = registry.clone();
    register_names(config, &mut staged)?;
    let registered = staged.len().saturating_sub(registry.len());
    *registry = staged;
    debug!(registered, "Universe names registered");
    Ok(())
}

/// Reject any region whose rating is not High, Low or Null.
///
/// # Errors
///
/// Returns [`UniverseError::InvalidSecurityTier`] for the first such region.
pub fn check_security_tiers(config: &UniverseConfig) -> Result<(), UniverseError> {
    for (name, region) in &config.universe_structure {
        if region.tier().is_none() {
            return Err(UniverseError::InvalidSecurityTier {
                region: name.clone(),
                value: region.security.clone(),
            });
        }
    }
    Ok(())
}

/// Check the constellation and system counts of one region against the
/// per-region targets.
///
/// High and Low regions must match the targets exactly; Null regions may
/// fall short but never exceed them.
///
/// # Errors
///
/// Returns [`UniverseError::ConfigConsistency`] naming the region (and
/// constellation), or [`UniverseError::InvalidSecurityTier`] for an unknown
/// rating.
pub fn check_region_shape(
    config: &UniverseConfig,
    name: &str,
    region: &RegionConfig,
) -> Result<(), UniverseError> {
    let tier = region.tier().ok_or_else(|| UniverseError::InvalidSecurityTier {
        region: name.to_owned(),
        value: region.security.clone(),
    })?;

    let exact = tier.requires_exact_shape();
    let (constellation_rule, system_rule) = if exact {
        (
            ConsistencyRule::ConstellationsPerRegion,
            ConsistencyRule::SystemsPerConstellation,
        )
    } else {
        (
            ConsistencyRule::NullConstellationsPerRegion,
            ConsistencyRule::NullSystemsPerConstellation,
        )
    };

    let constellations = count(region.constellations.len());
    if violates(exact, config.constellations_per_region, constellations) {
        return Err(UniverseError::ConfigConsistency {
            rule: constellation_rule,
            expected: config.constellations_per_region,
            actual: constellations,
            region: Some(name.to_owned()),
            constellation: None,
        });
    }

    for (constellation, systems) in &region.constellations {
        let systems = count(systems.len());
        if violates(exact, config.systems_per_constellation, systems) {
            return Err(UniverseError::ConfigConsistency {
                rule: system_rule,
                expected: config.systems_per_constellation,
                actual: systems,
                region: Some(name.to_owned()),
                constellation: Some(constellation.clone()),
            });
        }
    }

    Ok(())
}

/// Register every name of the structure: per region, the region itself, its
/// orphan systems, its special systems, then each constellation followed by
/// its systems.
///
/// # Errors
///
/// Returns [`UniverseError::DuplicateName`] on the first collision.
pub fn register_names(
    config: &UniverseConfig,
    registry: &mut NameRegistry,
) -> Result<(), UniverseError> {
    for (name, region) in &config.universe_structure {
        registry.register(name)?;
        for orphan in &region.orphan_systems {
            registry.register(orphan)?;
        }
        for special in &region.special_systems {
            registry.register(special)?;
        }
        for (constellation, systems) in &region.constellations {
            registry.register(constellation)?;
            for system in systems {
                registry.register(system)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Counter rules
// ---------------------------------------------------------------------------

fn systems_by_constellation(config: &UniverseConfig) -> Result<(), UniverseError> {
    let rule = ConsistencyRule::SystemsByConstellation;
    let expected = product(
        rule,
        &[config.constellation_count, config.systems_per_constellation],
    )?;
    require_equal(rule, expected, config.system_count)
}

fn systems_by_region(config: &UniverseConfig) -> Result<(), UniverseError> {
    let rule = ConsistencyRule::SystemsByRegion;
    let expected = product(rule, &[config.region_count, config.systems_per_region])?;
    require_equal(rule, expected, config.system_count)
}

fn systems_by_region_and_constellation(config: &UniverseConfig) -> Result<(), UniverseError> {
    let rule = ConsistencyRule::SystemsByRegionAndConstellation;
    let expected = product(
        rule,
        &[
            config.region_count,
            config.constellations_per_region,
            config.systems_per_constellation,
        ],
    )?;
    require_equal(rule, expected, config.system_count)
}

fn tier_systems(config: &UniverseConfig, tier: SecurityTier) -> Result<(), UniverseError> {
    let rule = ConsistencyRule::TierSystems(tier);
    let expected = product(rule, &[config.tier_regions(tier), config.systems_per_region])?;
    require_equal(rule, expected, config.tier_systems(tier))
}

fn high_security_systems(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_systems(config, SecurityTier::High)
}

fn low_security_systems(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_systems(config, SecurityTier::Low)
}

fn null_security_systems(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_systems(config, SecurityTier::Null)
}

fn region_tier_sum(config: &UniverseConfig) -> Result<(), UniverseError> {
    let rule = ConsistencyRule::RegionTierSum;
    let expected = SecurityTier::ALL
        .into_iter()
        .try_fold(0_u64, |sum, tier| sum.checked_add(config.tier_regions(tier)))
        .ok_or(UniverseError::ArithmeticOverflow { rule })?;
    require_equal(rule, expected, config.region_count)
}

fn regions_enumerated(config: &UniverseConfig) -> Result<(), UniverseError> {
    require_equal(
        ConsistencyRule::RegionsEnumerated,
        config.region_count,
        count(config.universe_structure.len()),
    )
}

// ---------------------------------------------------------------------------
// Tier region rules
// ---------------------------------------------------------------------------

fn tier_regions(config: &UniverseConfig, tier: SecurityTier) -> Result<(), UniverseError> {
    let rated = config
        .universe_structure
        .values()
        .filter(|region| region.tier() == Some(tier))
        .count();
    require_equal(
        ConsistencyRule::TierRegions(tier),
        config.tier_regions(tier),
        count(rated),
    )
}

fn high_security_regions(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_regions(config, SecurityTier::High)
}

fn low_security_regions(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_regions(config, SecurityTier::Low)
}

fn null_security_regions(config: &UniverseConfig) -> Result<(), UniverseError> {
    tier_regions(config, SecurityTier::Null)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Multiply `factors`, reporting overflow against `rule`.
fn product(rule: ConsistencyRule, factors: &[u64]) -> Result<u64, UniverseError> {
    factors
        .iter()
        .try_fold(1_u64, |acc, &factor| acc.checked_mul(factor))
        .ok_or(UniverseError::ArithmeticOverflow { rule })
}

const fn require_equal(
    rule: ConsistencyRule,
    expected: u64,
    actual: u64,
) -> Result<(), UniverseError> {
    if expected == actual {
        Ok(())
    } else {
        Err(UniverseError::ConfigConsistency {
            rule,
            expected,
            actual,
            region: None,
            constellation: None,
        })
    }
}

/// Whether `actual` breaks a target: any difference when `exact`, only an
/// excess otherwise.
const fn violates(exact: bool, target: u64, actual: u64) -> bool {
    if exact { actual != target } else { actual > target }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
