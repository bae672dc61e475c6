//! Grower preferences
//!
//! Closed sets: an unrecognized value is an error, never a silent "no adjustment".

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmingType {
    Organic,
    Chemical,
    #[default]
    Mixed,
}

impl FarmingType {
    const EXPECTED: &'static str = "organic, chemical, mixed";

    pub fn as_str(&self) -> &'static str {
        match self {
            FarmingType::Organic => "organic",
            FarmingType::Chemical => "chemical",
            FarmingType::Mixed => "mixed",
        }
    }
}

impl FromStr for FarmingType {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organic" => Ok(FarmingType::Organic),
            "chemical" => Ok(FarmingType::Chemical),
            "mixed" => Ok(FarmingType::Mixed),
            _ => Err(AdvisorError::InvalidPreferenceValue {
                field: "farming_type",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for FarmingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl Budget {
    const EXPECTED: &'static str = "low, medium, high";

    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Low => "low",
            Budget::Medium => "medium",
            Budget::High => "high",
        }
    }
}

impl FromStr for Budget {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Budget::Low),
            "medium" => Ok(Budget::Medium),
            "high" => Ok(Budget::High),
            _ => Err(AdvisorError::InvalidPreferenceValue {
                field: "budget",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both preferences, echoed back in the recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Preferences {
    pub farming_type: FarmingType,
    pub budget: Budget,
}

impl Preferences {
    pub fn new(farming_type: FarmingType, budget: Budget) -> Self {
        Self { farming_type, budget }
    }

    /// Parse optional raw strings; a missing value takes the default
    pub fn parse(farming_type: Option<&str>, budget: Option<&str>) -> Result<Self, AdvisorError> {
        Ok(Self {
            farming_type: farming_type.map(str::parse::<FarmingType>).transpose()?.unwrap_or_default(),
            budget: budget.map(str::parse::<Budget>).transpose()?.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Organic".parse::<FarmingType>().unwrap(), FarmingType::Organic);
        assert_eq!(" HIGH ".parse::<Budget>().unwrap(), Budget::High);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "biodynamic".parse::<FarmingType>().unwrap_err();
        match err {
            AdvisorError::InvalidPreferenceValue { field, value, .. } => {
                assert_eq!(field, "farming_type");
                assert_eq!(value, "biodynamic");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!("cheap".parse::<Budget>().is_err());
    }

    #[test]
    fn test_missing_values_default() {
        let prefs = Preferences::parse(None, None).unwrap();
        assert_eq!(prefs, Preferences::new(FarmingType::Mixed, Budget::Medium));

        let prefs = Preferences::parse(Some("chemical"), None).unwrap();
        assert_eq!(prefs.farming_type, FarmingType::Chemical);
        assert_eq!(prefs.budget, Budget::Medium);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_value(Preferences::new(FarmingType::Organic, Budget::Low)).unwrap();
        assert_eq!(json, serde_json::json!({"farming_type": "organic", "budget": "low"}));
    }
}
