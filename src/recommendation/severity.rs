//! Severity Assessment
//!
//! Maps the share of affected plants onto one of four ordered tiers. Each tier
//! carries fixed messaging and a monitoring cadence.
//!
//! # Tier boundaries (inclusive upper bound)
//! - (.., 10]  → Mild (1)
//! - (10, 30]  → Moderate (2)
//! - (30, 60]  → Severe (3)
//! - (60, ..)  → Critical (4)

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl SeverityTier {
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Mild,
        SeverityTier::Moderate,
        SeverityTier::Severe,
        SeverityTier::Critical,
    ];

    /// Resolve the tier for an affected percentage
    ///
    /// Never fails: values above 100 resolve to Critical and negative values to
    /// Mild. Range validation is the caller's job.
    pub fn assess(affected_percentage: f64) -> Self {
        if affected_percentage <= 10.0 {
            SeverityTier::Mild
        } else if affected_percentage <= 30.0 {
            SeverityTier::Moderate
        } else if affected_percentage <= 60.0 {
            SeverityTier::Severe
        } else {
            SeverityTier::Critical
        }
    }

    /// Catalog severity id (1-4)
    pub fn id(&self) -> u8 {
        match self {
            SeverityTier::Mild => 1,
            SeverityTier::Moderate => 2,
            SeverityTier::Severe => 3,
            SeverityTier::Critical => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.id() == id)
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
            SeverityTier::Critical => "Critical",
        }
    }

    pub fn urgency(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "[CAUTION] Act within 3-7 days. Early intervention prevents spread.",
            SeverityTier::Moderate => "[CAUTION] Act within 1-3 days. Disease is spreading actively.",
            SeverityTier::Severe => {
                "[URGENT] Act immediately (within 24 hours). Significant crop damage occurring."
            }
            SeverityTier::Critical => {
                "[URGENT] URGENT: Act immediately. Crop failure risk is high. Consult an expert."
            }
        }
    }

    pub fn monitoring_frequency(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "Every 3-4 days",
            SeverityTier::Moderate => "Every 2 days",
            SeverityTier::Severe => "Daily",
            SeverityTier::Critical => "Twice daily",
        }
    }

    pub fn monitoring_duration(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "2-3 weeks",
            SeverityTier::Moderate => "3-4 weeks",
            SeverityTier::Severe => "4-6 weeks",
            SeverityTier::Critical => "6-8 weeks",
        }
    }

    /// Severe and Critical get the extended immediate-action list
    pub fn is_escalated(&self) -> bool {
        self.id() >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive_upper() {
        assert_eq!(SeverityTier::assess(0.0), SeverityTier::Mild);
        assert_eq!(SeverityTier::assess(10.0), SeverityTier::Mild);
        assert_eq!(SeverityTier::assess(10.01), SeverityTier::Moderate);
        assert_eq!(SeverityTier::assess(30.0), SeverityTier::Moderate);
        assert_eq!(SeverityTier::assess(30.5), SeverityTier::Severe);
        assert_eq!(SeverityTier::assess(60.0), SeverityTier::Severe);
        assert_eq!(SeverityTier::assess(60.01), SeverityTier::Critical);
        assert_eq!(SeverityTier::assess(100.0), SeverityTier::Critical);
    }

    #[test]
    fn test_out_of_range_still_resolves() {
        assert_eq!(SeverityTier::assess(150.0), SeverityTier::Critical);
        assert_eq!(SeverityTier::assess(-3.0), SeverityTier::Mild);
    }

    #[test]
    fn test_twenty_five_percent_is_moderate() {
        let tier = SeverityTier::assess(25.0);
        assert_eq!((tier.id(), tier.display_text()), (2, "Moderate"));
    }

    #[test]
    fn test_partition_has_no_gaps() {
        // Tiers never go down as the percentage rises, and every tier is hit
        let mut last = SeverityTier::Mild;
        let mut seen = Vec::new();
        for step in 0..=10_000 {
            let tier = SeverityTier::assess(step as f64 / 100.0);
            assert!(tier >= last);
            if !seen.contains(&tier) {
                seen.push(tier);
            }
            last = tier;
        }
        assert_eq!(seen, SeverityTier::ALL.to_vec());
    }

    #[test]
    fn test_id_round_trip_and_tables() {
        for tier in SeverityTier::ALL {
            assert_eq!(SeverityTier::from_id(tier.id()), Some(tier));
            assert!(!tier.urgency().is_empty());
        }
        assert_eq!(SeverityTier::from_id(0), None);
        assert_eq!(SeverityTier::Severe.monitoring_frequency(), "Daily");
        assert_eq!(SeverityTier::Critical.monitoring_duration(), "6-8 weeks");
        assert!(!SeverityTier::Moderate.is_escalated());
        assert!(SeverityTier::Severe.is_escalated());
    }
}
