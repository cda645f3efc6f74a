//! Mining feasibility verdicts and per-tier action plans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::risk::RiskTier;

/// Confidence at or above which a moderate-risk site is cleared for mining.
pub const MODERATE_CLEARANCE_CONFIDENCE: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeasibilityStatus {
    #[serde(rename = "FIT")]
    Fit,
    #[serde(rename = "CONDITIONALLY FIT")]
    ConditionallyFit,
    #[serde(rename = "NOT FIT")]
    NotFit,
}

impl FeasibilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FeasibilityStatus::Fit => "FIT",
            FeasibilityStatus::ConditionallyFit => "CONDITIONALLY FIT",
            FeasibilityStatus::NotFit => "NOT FIT",
        }
    }
}

impl fmt::Display for FeasibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub status: FeasibilityStatus,
    pub recommendation: &'static str,
}

/// Decide whether a site is fit for mining.
///
/// The score is accepted for parity with the dashboard inputs; the verdict
/// depends on tier and confidence only.
pub fn classify(tier: RiskTier, _score: f64, confidence: u32) -> FeasibilityResult {
    let (status, recommendation) = match tier {
        RiskTier::Low => (
            FeasibilityStatus::Fit,
            "Low risk environment - Suitable for mining operations with standard safety protocols",
        ),
        RiskTier::Moderate if confidence >= MODERATE_CLEARANCE_CONFIDENCE => (
            FeasibilityStatus::Fit,
            "Moderate risk with high confidence - Mining approved with enhanced monitoring",
        ),
        RiskTier::Moderate => (
            FeasibilityStatus::ConditionallyFit,
            "Moderate risk with lower confidence - Additional geological assessment required before mining",
        ),
        RiskTier::High => (
            FeasibilityStatus::NotFit,
            "High risk environment - Mining operations not recommended without major risk mitigation",
        ),
        RiskTier::Critical => (
            FeasibilityStatus::NotFit,
            "Critical risk environment - Mining operations strictly prohibited until risk is mitigated",
        ),
    };

    FeasibilityResult {
        status,
        recommendation,
    }
}

/// What site crews should do at a given tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub headline: &'static str,
    pub summary: &'static str,
    pub actions: [&'static str; 5],
}

pub fn action_plan(tier: RiskTier) -> ActionPlan {
    match tier {
        RiskTier::Critical => ActionPlan {
            headline: "IMMEDIATE ACTION REQUIRED",
            summary: "Immediate evacuation and area closure required. Deploy emergency monitoring systems.",
            actions: [
                "Evacuate all personnel from the risk zone immediately",
                "Close access roads and establish safety perimeters",
                "Deploy real-time monitoring equipment with emergency alerts",
                "Notify emergency response teams and local authorities",
                "Schedule immediate geotechnical assessment",
            ],
        },
        RiskTier::High => ActionPlan {
            headline: "HIGH PRIORITY ACTIONS",
            summary: "High risk of rockfall. Restrict access and increase monitoring frequency.",
            actions: [
                "Restrict access to high-risk areas",
                "Increase monitoring frequency to daily inspections",
                "Install warning signs and barriers",
                "Evaluate protective measures (nets, fences)",
                "Develop evacuation plan for affected areas",
            ],
        },
        RiskTier::Moderate => ActionPlan {
            headline: "MODERATE RISK MANAGEMENT",
            summary: "Maintain vigilance and implement enhanced monitoring protocols.",
            actions: [
                "Continue standard monitoring procedures",
                "Implement warning systems for personnel",
                "Schedule bi-weekly inspections",
                "Increase vigilance after significant weather events",
                "Review safety protocols regularly",
            ],
        },
        RiskTier::Low => ActionPlan {
            headline: "STANDARD MONITORING PROTOCOL",
            summary: "Low risk level. Maintain regular safety protocols and monitoring schedule.",
            actions: [
                "Continue standard monitoring schedule",
                "Maintain existing safety protocols",
                "Quarterly risk assessment reviews",
                "Train personnel on rockfall recognition",
                "Update emergency plans annually",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_is_always_fit() {
        for confidence in [0, 50, 70, 100] {
            assert_eq!(
                classify(RiskTier::Low, 10.0, confidence).status,
                FeasibilityStatus::Fit
            );
        }
    }

    #[test]
    fn test_moderate_depends_on_confidence() {
        assert_eq!(
            classify(RiskTier::Moderate, 40.0, 70).status,
            FeasibilityStatus::Fit
        );
        assert_eq!(
            classify(RiskTier::Moderate, 40.0, 69).status,
            FeasibilityStatus::ConditionallyFit
        );
    }

    #[test]
    fn test_high_and_critical_are_not_fit() {
        for confidence in [0, 80, 95] {
            assert_eq!(
                classify(RiskTier::High, 60.0, confidence).status,
                FeasibilityStatus::NotFit
            );
            assert_eq!(
                classify(RiskTier::Critical, 90.0, confidence).status,
                FeasibilityStatus::NotFit
            );
        }
    }

    #[test]
    fn test_recommendations_differ_between_high_and_critical() {
        let high = classify(RiskTier::High, 60.0, 80);
        let critical = classify(RiskTier::Critical, 90.0, 85);
        assert_ne!(high.recommendation, critical.recommendation);
        assert!(critical.recommendation.contains("prohibited"));
    }

    #[test]
    fn test_status_serializes_with_spaces() {
        let json = serde_json::to_string(&FeasibilityStatus::ConditionallyFit).unwrap();
        assert_eq!(json, "\"CONDITIONALLY FIT\"");
    }

    #[test]
    fn test_action_plans_have_distinct_headlines() {
        let headlines: Vec<&str> = [
            RiskTier::Low,
            RiskTier::Moderate,
            RiskTier::High,
            RiskTier::Critical,
        ]
        .into_iter()
        .map(|t| action_plan(t).headline)
        .collect();
        assert_eq!(headlines.len(), 4);
        assert!(headlines.iter().all(|h| !h.is_empty()));
        assert_eq!(action_plan(RiskTier::Critical).headline, "IMMEDIATE ACTION REQUIRED");
    }
}
