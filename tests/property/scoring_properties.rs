use proptest::prelude::*;
use rockfall::feasibility::{FeasibilityStatus, classify};
use rockfall::risk::{ImageHeuristics, RiskInput, RiskTier, RockType, score};

fn rock_type() -> impl Strategy<Value = RockType> {
    prop::sample::select(vec![
        "Limestone",
        "Sandstone",
        "Shale",
        "Granite",
        "Basalt",
        "Marble",
    ])
    .prop_map(RockType::from)
}

fn heuristics() -> impl Strategy<Value = Option<ImageHeuristics>> {
    let pct = || prop::option::of(0.0..=100.0f64);
    prop::option::of((pct(), pct(), pct(), pct(), pct()).prop_map(
        |(slope, fractures, vegetation, confidence, erosion)| ImageHeuristics {
            slope_steepness: slope,
            rock_fractures: fractures,
            vegetation_cover: vegetation,
            rock_type_confidence: confidence,
            erosion_signs: erosion,
        },
    ))
}

fn risk_input() -> impl Strategy<Value = RiskInput> {
    (
        (0.0..=100.0f64, 0.0..=50.0f64, 0.0..=100.0f64, -20.0..=40.0f64),
        (0.0..=3000.0f64, 1.0..=200.0f64, 0.0..=90.0f64, 0.0..=90.0f64),
        rock_type(),
        heuristics(),
    )
        .prop_map(
            |(
                (rainfall, snowfall, wind_speed, temperature),
                (elevation, fracture_spacing, fracture_orientation, slope_angle),
                rock_type,
                image_heuristics,
            )| RiskInput {
                rainfall,
                snowfall,
                wind_speed,
                temperature,
                elevation,
                fracture_spacing,
                fracture_orientation,
                slope_angle,
                rock_type,
                image_heuristics,
            },
        )
}

// ── Bounds and tier consistency ───────────────────────────────────────────

proptest! {
    #[test]
    fn score_is_bounded_and_tier_matches(input in risk_input()) {
        let result = score(&input);
        prop_assert!((0.0..=100.0).contains(&result.score), "score {}", result.score);
        prop_assert_eq!(result.tier, RiskTier::from_score(result.score));
    }

    #[test]
    fn scoring_is_deterministic(input in risk_input()) {
        prop_assert_eq!(score(&input), score(&input.clone()));
    }

    #[test]
    fn feasibility_follows_tier(input in risk_input()) {
        let result = score(&input);
        let verdict = classify(result.tier, result.score, result.confidence);
        match result.tier {
            RiskTier::Low => prop_assert_eq!(verdict.status, FeasibilityStatus::Fit),
            RiskTier::High | RiskTier::Critical => {
                prop_assert_eq!(verdict.status, FeasibilityStatus::NotFit)
            }
            // Moderate confidence never drops below 75
            RiskTier::Moderate => prop_assert_eq!(verdict.status, FeasibilityStatus::Fit),
        }
    }
}

// ── Monotonicity ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn more_rain_never_lowers_score(input in risk_input(), a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = score(&RiskInput { rainfall: lo, ..input.clone() });
        let high = score(&RiskInput { rainfall: hi, ..input });
        prop_assert!(low.score <= high.score);
    }

    #[test]
    fn steeper_slope_never_lowers_score(input in risk_input(), a in 0.0..=90.0f64, b in 0.0..=90.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = score(&RiskInput { slope_angle: lo, ..input.clone() });
        let high = score(&RiskInput { slope_angle: hi, ..input });
        prop_assert!(low.score <= high.score);
    }

    #[test]
    fn stronger_wind_never_lowers_score(input in risk_input(), a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = score(&RiskInput { wind_speed: lo, ..input.clone() });
        let high = score(&RiskInput { wind_speed: hi, ..input });
        prop_assert!(low.score <= high.score);
    }

    #[test]
    fn tighter_fractures_never_lower_score(input in risk_input(), a in 1.0..=200.0f64, b in 1.0..=200.0f64) {
        let (tight, wide) = if a <= b { (a, b) } else { (b, a) };
        let tight = score(&RiskInput { fracture_spacing: tight, ..input.clone() });
        let wide = score(&RiskInput { fracture_spacing: wide, ..input });
        prop_assert!(wide.score <= tight.score);
    }
}

// ── Image heuristics ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn image_adds_two_entries_and_confidence(
        input in risk_input(),
        slope in 0.0..=100.0f64,
        fractures in 0.0..=100.0f64,
    ) {
        let plain = score(&RiskInput { image_heuristics: None, ..input.clone() });
        let heuristics = ImageHeuristics {
            slope_steepness: Some(slope),
            rock_fractures: Some(fractures),
            ..Default::default()
        };
        let with_image = score(&RiskInput { image_heuristics: Some(heuristics), ..input });

        prop_assert_eq!(plain.contributions.len(), 7);
        prop_assert_eq!(with_image.contributions.len(), 9);
        prop_assert_eq!(plain.confidence, plain.tier.base_confidence());
        prop_assert_eq!(with_image.confidence, with_image.tier.base_confidence() + 4);
    }
}
