//! Subscription plan tiers.
//!
//! The plan decides how many AI requests a user gets, over which window,
//! and whether the learning period applies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Entry plan.
    /// - 5 AI requests per week
    /// - AI blocked during the learning period
    Basic,

    /// Professional plan, also stored as `pro` by older clients.
    /// - 7 AI requests per week
    #[serde(alias = "pro")]
    Professional,

    /// Premium plan.
    /// - 50 AI requests per calendar month
    Premium,
}

impl PlanTier {
    /// Returns the canonical storage value for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Basic => "basic",
            PlanTier::Professional => "professional",
            PlanTier::Premium => "premium",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Basic => "Basic",
            PlanTier::Professional => "Professional",
            PlanTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlanTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(PlanTier::Basic),
            "professional" | "pro" => Ok(PlanTier::Professional),
            "premium" => Ok(PlanTier::Premium),
            other => Err(ValidationError::UnknownPlan(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!("basic".parse::<PlanTier>().unwrap(), PlanTier::Basic);
        assert_eq!("professional".parse::<PlanTier>().unwrap(), PlanTier::Professional);
        assert_eq!("premium".parse::<PlanTier>().unwrap(), PlanTier::Premium);
    }

    #[test]
    fn pro_is_an_alias_for_professional() {
        assert_eq!("pro".parse::<PlanTier>().unwrap(), PlanTier::Professional);
        assert_eq!(" PRO ".parse::<PlanTier>().unwrap(), PlanTier::Professional);
    }

    #[test]
    fn rejects_unknown_plan() {
        assert!(matches!(
            "gold".parse::<PlanTier>(),
            Err(ValidationError::UnknownPlan(_))
        ));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&PlanTier::Professional).unwrap();
        assert_eq!(json, "\"professional\"");
    }

    #[test]
    fn deserializes_pro_alias() {
        let tier: PlanTier = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(tier, PlanTier::Professional);
    }

    #[test]
    fn as_str_roundtrips_through_from_str() {
        for tier in [PlanTier::Basic, PlanTier::Professional, PlanTier::Premium] {
            assert_eq!(tier.as_str().parse::<PlanTier>().unwrap(), tier);
        }
    }
}
