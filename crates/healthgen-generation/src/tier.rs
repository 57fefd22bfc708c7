//! Project tiers

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Complexity level of a generated project.
///
/// Tiers are totally ordered; a higher tier always carries every feature of
/// the tiers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Health endpoints, Kubernetes manifests and a TypeScript client
    Basic,
    /// Adds dependency health checks and server timing
    Intermediate,
    /// Adds OpenTelemetry tracing and CloudEvents
    Advanced,
    /// Adds mTLS, RBAC, audit logging and compliance reporting
    Enterprise,
}

impl Tier {
    /// All tiers, lowest first
    pub const ALL: [Tier; 4] = [
        Tier::Basic,
        Tier::Intermediate,
        Tier::Advanced,
        Tier::Enterprise,
    ];

    /// Lowercase tier name
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
            Tier::Enterprise => "enterprise",
        }
    }

    /// The next tier up, if any
    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Basic => Some(Tier::Intermediate),
            Tier::Intermediate => Some(Tier::Advanced),
            Tier::Advanced => Some(Tier::Enterprise),
            Tier::Enterprise => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Tier::Basic),
            "intermediate" => Ok(Tier::Intermediate),
            "advanced" => Ok(Tier::Advanced),
            "enterprise" => Ok(Tier::Enterprise),
            _ => Err(GenerationError::InvalidTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Basic < Tier::Intermediate);
        assert!(Tier::Intermediate < Tier::Advanced);
        assert!(Tier::Advanced < Tier::Enterprise);
    }

    #[test]
    fn test_parse_tier_case_insensitive() {
        assert_eq!("Enterprise".parse::<Tier>().unwrap(), Tier::Enterprise);
        assert_eq!(" basic ".parse::<Tier>().unwrap(), Tier::Basic);
    }

    #[test]
    fn test_parse_unknown_tier() {
        let err = "nightly".parse::<Tier>().unwrap_err();
        assert!(matches!(err, GenerationError::InvalidTier(ref name) if name == "nightly"));
    }

    #[test]
    fn test_next_tier() {
        assert_eq!(Tier::Basic.next(), Some(Tier::Intermediate));
        assert_eq!(Tier::Enterprise.next(), None);
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for tier in Tier::ALL {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Tier::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");
    }
}
