//! Display bands for individual factor contributions.

use serde::Serialize;

use crate::risk::{Contribution, Factor};

/// Contributions above this count as active.
const ACTIVE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskCategory {
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Minimal => "MINIMAL",
            RiskCategory::Low => "LOW",
            RiskCategory::Moderate => "MODERATE",
            RiskCategory::High => "HIGH",
            RiskCategory::Extreme => "EXTREME",
        }
    }

    /// Lowercase id the front end uses as a style hook.
    pub fn id(self) -> &'static str {
        match self {
            RiskCategory::Minimal => "minimal",
            RiskCategory::Low => "low",
            RiskCategory::Moderate => "moderate",
            RiskCategory::High => "high",
            RiskCategory::Extreme => "extreme",
        }
    }

    /// Bar colour for the contributions chart.
    pub fn color(self) -> &'static str {
        match self {
            RiskCategory::Minimal => "#48bb78",
            RiskCategory::Low => "#4299e1",
            RiskCategory::Moderate => "#ed8936",
            RiskCategory::High => "#f56565",
            RiskCategory::Extreme => "#e53e3e",
        }
    }
}

pub fn categorize(value: f64) -> RiskCategory {
    match value {
        v if v < 20.0 => RiskCategory::Minimal,
        v if v < 40.0 => RiskCategory::Low,
        v if v < 60.0 => RiskCategory::Moderate,
        v if v < 80.0 => RiskCategory::High,
        _ => RiskCategory::Extreme,
    }
}

/// Band a contribution into its `(label, id)` pair.
pub fn bucket(value: f64) -> (&'static str, &'static str) {
    let category = categorize(value);
    (category.label(), category.id())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorView {
    pub factor: Factor,
    pub value: f64,
    pub category: RiskCategory,
    pub category_id: &'static str,
}

pub fn factor_views(contributions: &[Contribution]) -> Vec<FactorView> {
    contributions
        .iter()
        .map(|c| {
            let category = categorize(c.value);
            FactorView {
                factor: c.factor,
                value: c.value,
                category,
                category_id: category.id(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorStats {
    pub highest: f64,
    pub average: f64,
    pub active: usize,
    pub total: usize,
}

pub fn factor_stats(contributions: &[Contribution]) -> FactorStats {
    let total = contributions.len();
    if total == 0 {
        return FactorStats {
            highest: 0.0,
            average: 0.0,
            active: 0,
            total,
        };
    }

    let highest = contributions
        .iter()
        .map(|c| c.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let average = contributions.iter().map(|c| c.value).sum::<f64>() / total as f64;
    let active = contributions
        .iter()
        .filter(|c| c.value > ACTIVE_THRESHOLD)
        .count();

    FactorStats {
        highest,
        average,
        active,
        total,
    }
}
