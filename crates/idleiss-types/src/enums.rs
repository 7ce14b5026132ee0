//! Enumeration types for the Idle ISS universe.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Security tiers
// ---------------------------------------------------------------------------

/// The security classification of a region.
///
/// High and low security space must be fully specified in a universe
/// configuration. Null security space may be sparse: fewer constellations
/// and fewer named systems than the per-region targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecurityTier {
    /// Fully specified, policed space.
    High,
    /// Fully specified, lightly policed space.
    Low,
    /// Lawless space; may be partially specified.
    Null,
}

impl SecurityTier {
    /// Every tier, in the order configuration rules are evaluated.
    pub const ALL: [Self; 3] = [Self::High, Self::Low, Self::Null];

    /// Parse the configuration spelling of a tier (`"High"`, `"Low"`,
    /// `"Null"`). Matching is exact; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "High" => Some(Self::High),
            "Low" => Some(Self::Low),
            "Null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The configuration spelling of this tier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
            Self::Null => "Null",
        }
    }

    /// Whether regions of this tier must list every constellation and
    /// system explicitly.
    pub const fn requires_exact_shape(self) -> bool {
        matches!(self, Self::High | Self::Low)
    }
}

impl core::fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_exact_spelling() {
        for tier in SecurityTier::ALL {
            assert_eq!(SecurityTier::parse(tier.as_str()), Some(tier));
        }
    }

    #[test]
    fn parse_rejects_other_values() {
        assert_eq!(SecurityTier::parse("high"), None);
        assert_eq!(SecurityTier::parse("Medium"), None);
        assert_eq!(SecurityTier::parse(""), None);
    }

    #[test]
    fn only_null_space_may_be_sparse() {
        assert!(SecurityTier::High.requires_exact_shape());
        assert!(SecurityTier::Low.requires_exact_shape());
        assert!(!SecurityTier::Null.requires_exact_shape());
    }
}
