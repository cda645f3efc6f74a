//! Chart datasets for the dashboard front end.
//!
//! These are plain data; the browser does the plotting. The geographical and
//! temporal heat maps are simulated around the current score and take the
//! caller's RNG so tests can pin them.

use itertools::Itertools;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::category::categorize;
use crate::risk::{self, Contribution, RiskInput, RiskResult, RockType};
use crate::terrain::{self, TerrainField};

const SENSITIVITY_STEPS: usize = 10;
const SENSITIVITY_ORIENTATION: f64 = 45.0;

const ZONES: [&str; 5] = [
    "North Zone",
    "South Zone",
    "East Zone",
    "West Zone",
    "Central Zone",
];
const CONDITIONS: [&str; 6] = [
    "Wet Season",
    "Dry Season",
    "Winter",
    "Spring",
    "Summer",
    "Autumn",
];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    /// Closed loop: the first point is repeated at the end.
    pub theta: Vec<String>,
    pub r: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeStep {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeChart {
    pub value: f64,
    pub steps: Vec<GaugeStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatMap {
    pub title: &'static str,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<Vec<f64>>,
    pub colorscale: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainSurface {
    pub title: String,
    pub colorscale: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
    /// Axes for the flat contour view, in km.
    pub contour_km: Vec<f64>,
    pub complexity: u32,
    pub interpretation: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub radar: RadarChart,
    pub bar: BarChart,
    pub gauge: GaugeChart,
    pub sensitivity: HeatMap,
    pub correlation: HeatMap,
    pub geographical: HeatMap,
    pub temporal: HeatMap,
}

pub fn radar(contributions: &[Contribution]) -> RadarChart {
    let mut theta: Vec<String> = contributions.iter().map(|c| c.factor.to_string()).collect();
    let mut r: Vec<f64> = contributions.iter().map(|c| c.value).collect();
    if let (Some(first_label), Some(&first_value)) = (theta.first().cloned(), r.first()) {
        theta.push(first_label);
        r.push(first_value);
    }
    RadarChart { theta, r }
}

/// Contributions sorted high to low, coloured by category band.
pub fn bar(contributions: &[Contribution]) -> BarChart {
    let sorted = contributions
        .iter()
        .sorted_by(|a, b| b.value.total_cmp(&a.value))
        .collect_vec();

    BarChart {
        labels: sorted.iter().map(|c| c.factor.to_string()).collect(),
        values: sorted.iter().map(|c| c.value).collect(),
        colors: sorted.iter().map(|c| categorize(c.value).color()).collect(),
    }
}

pub fn gauge(score: f64) -> GaugeChart {
    GaugeChart {
        value: score,
        steps: vec![
            GaugeStep { from: 0.0, to: 25.0, color: "#48bb78" },
            GaugeStep { from: 25.0, to: 50.0, color: "#ed8936" },
            GaugeStep { from: 50.0, to: 75.0, color: "#f56565" },
            GaugeStep { from: 75.0, to: 100.0, color: "#e53e3e" },
        ],
    }
}

/// Re-score with one reading scaled from 0.5x to 1.5x at a time.
///
/// Rock type, orientation and image heuristics are pinned to the reference
/// profile so only the varied reading moves the score.
pub fn sensitivity(input: &RiskInput) -> HeatMap {
    let factors = terrain::linspace(0.5, 1.5, SENSITIVITY_STEPS);
    let reference = RiskInput {
        fracture_orientation: SENSITIVITY_ORIENTATION,
        rock_type: RockType::Limestone,
        image_heuristics: None,
        ..input.clone()
    };

    type Scale = fn(&mut RiskInput, f64);
    let parameters: [(&str, Scale); 7] = [
        ("Rainfall", |i: &mut RiskInput, k: f64| i.rainfall *= k),
        ("Snowfall", |i: &mut RiskInput, k: f64| i.snowfall *= k),
        ("Wind Speed", |i: &mut RiskInput, k: f64| i.wind_speed *= k),
        ("Temperature", |i: &mut RiskInput, k: f64| i.temperature *= k),
        ("Elevation", |i: &mut RiskInput, k: f64| i.elevation *= k),
        ("Fracture Spacing", |i: &mut RiskInput, k: f64| i.fracture_spacing *= k),
        ("Slope Angle", |i: &mut RiskInput, k: f64| i.slope_angle *= k),
    ];

    let z: Vec<Vec<f64>> = parameters
        .iter()
        .map(|(_, scale)| {
            factors
                .iter()
                .map(|&k| {
                    let mut varied = reference.clone();
                    scale(&mut varied, k);
                    risk::score(&varied).score
                })
                .collect()
        })
        .collect();

    HeatMap {
        title: "Parameter Sensitivity Heat Map",
        x: factors.iter().map(|k| format!("{k:.1}x")).collect(),
        y: parameters.iter().map(|(name, _)| name.to_string()).collect(),
        z,
        colorscale: "RdYlBu_r",
    }
}

/// Pairwise similarity of contributions, `1 - |a - b| / 100`.
pub fn correlation(contributions: &[Contribution]) -> HeatMap {
    let labels: Vec<String> = contributions.iter().map(|c| c.factor.to_string()).collect();
    let z: Vec<Vec<f64>> = contributions
        .iter()
        .map(|a| {
            contributions
                .iter()
                .map(|b| 1.0 - (a.value - b.value).abs() / 100.0)
                .collect()
        })
        .collect();

    HeatMap {
        title: "Risk Factor Correlation Heat Map",
        x: labels.clone(),
        y: labels,
        z,
        colorscale: "RdBu",
    }
}

fn noise<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * sigma
}

pub fn geographical<R: Rng + ?Sized>(score: f64, rng: &mut R) -> HeatMap {
    let z: Vec<Vec<f64>> = ZONES
        .iter()
        .map(|_| {
            CONDITIONS
                .iter()
                .map(|_| (score + noise(rng, 15.0)).clamp(0.0, 100.0))
                .collect()
        })
        .collect();

    HeatMap {
        title: "Geographical Risk Distribution Heat Map",
        x: CONDITIONS.iter().map(|s| s.to_string()).collect(),
        y: ZONES.iter().map(|s| s.to_string()).collect(),
        z,
        colorscale: "RdYlGn_r",
    }
}

/// Month x hour pattern: winter and early morning run hotter.
pub fn temporal<R: Rng + ?Sized>(score: f64, rng: &mut R) -> HeatMap {
    let z: Vec<Vec<f64>> = (0..MONTHS.len())
        .map(|month| {
            let seasonal = if matches!(month, 0 | 1 | 10 | 11) { 1.2 } else { 0.8 };
            (0..24)
                .map(|hour| {
                    let daily = if (4..8).contains(&hour) { 1.1 } else { 0.9 };
                    (score * seasonal * daily + noise(rng, 5.0)).clamp(0.0, 100.0)
                })
                .collect()
        })
        .collect();

    HeatMap {
        title: "Temporal Risk Pattern Heat Map (24h x Seasonal)",
        x: (0..24).map(|h| format!("{h:02}:00")).collect(),
        y: MONTHS.iter().map(|s| s.to_string()).collect(),
        z,
        colorscale: "Viridis",
    }
}

pub fn bundle<R: Rng + ?Sized>(input: &RiskInput, result: &RiskResult, rng: &mut R) -> ChartBundle {
    ChartBundle {
        radar: radar(&result.contributions),
        bar: bar(&result.contributions),
        gauge: gauge(result.score),
        sensitivity: sensitivity(input),
        correlation: correlation(&result.contributions),
        geographical: geographical(result.score, rng),
        temporal: temporal(result.score, rng),
    }
}

pub fn terrain_surface(field: &TerrainField, from_image: bool) -> TerrainSurface {
    let params = &field.params;
    let title = if from_image {
        format!(
            "3D Mine Terrain Contour Map (Slope: {}%, Fractures: {}%)",
            params.slope_steepness, params.rock_fractures
        )
    } else {
        "3D Mine Terrain Contour Map".to_string()
    };

    TerrainSurface {
        title,
        colorscale: terrain::colorscale(params),
        x: field.x.clone(),
        y: field.y.clone(),
        z: field.z.clone(),
        contour_km: terrain::linspace(0.0, 10.0, terrain::GRID_SIZE),
        complexity: params.complexity(),
        interpretation: terrain::interpret(params),
    }
}
