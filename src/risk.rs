//! Heuristic rockfall risk scoring.
//!
//! Every reading is normalised to a 0-100 contribution, then combined with a
//! fixed weight table. The weights do not sum to one, with or without the
//! image term, and are kept that way so historical scores stay reproducible.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Value assumed for a missing heuristic field when it scales another reading.
const NEUTRAL_HEURISTIC: f64 = 50.0;

/// Susceptibility used for rock types outside the catalog.
pub const DEFAULT_ROCK_SUSCEPTIBILITY: f64 = 50.0;

struct Weights {
    rainfall: f64,
    snowfall: f64,
    wind_speed: f64,
    temperature: f64,
    elevation: f64,
    fracture_density: f64,
    slope_angle: f64,
    rock_type: f64,
    image_analysis: f64,
}

const WEIGHTS: Weights = Weights {
    rainfall: 0.12,
    snowfall: 0.08,
    wind_speed: 0.05,
    temperature: 0.08,
    elevation: 0.08,
    fracture_density: 0.22,
    slope_angle: 0.18,
    rock_type: 0.05,
    image_analysis: 0.14,
};

// --- Rock types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RockType {
    Limestone,
    Sandstone,
    Shale,
    Granite,
    Basalt,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RockProfile {
    pub rock_type: RockType,
    /// Weathering susceptibility, 0-100.
    pub susceptibility: f64,
    pub description: &'static str,
}

pub static ROCK_CATALOG: [RockProfile; 5] = [
    RockProfile {
        rock_type: RockType::Limestone,
        susceptibility: 80.0,
        description: "Sedimentary rock - High weathering susceptibility",
    },
    RockProfile {
        rock_type: RockType::Sandstone,
        susceptibility: 60.0,
        description: "Sedimentary rock - Moderate weathering resistance",
    },
    RockProfile {
        rock_type: RockType::Shale,
        susceptibility: 70.0,
        description: "Sedimentary rock - High erosion potential",
    },
    RockProfile {
        rock_type: RockType::Granite,
        susceptibility: 30.0,
        description: "Igneous rock - High structural integrity",
    },
    RockProfile {
        rock_type: RockType::Basalt,
        susceptibility: 40.0,
        description: "Volcanic rock - Good structural stability",
    },
];

lazy_static! {
    // Keyed by lowercase name
    static ref ROCK_INDEX: HashMap<String, &'static RockProfile> = ROCK_CATALOG
        .iter()
        .map(|profile| (profile.rock_type.name().to_lowercase(), profile))
        .collect();
}

impl RockType {
    pub fn name(self) -> &'static str {
        match self {
            RockType::Limestone => "Limestone",
            RockType::Sandstone => "Sandstone",
            RockType::Shale => "Shale",
            RockType::Granite => "Granite",
            RockType::Basalt => "Basalt",
            RockType::Unknown => "Unknown",
        }
    }

    pub fn profile(self) -> Option<&'static RockProfile> {
        ROCK_INDEX.get(&self.name().to_lowercase()).copied()
    }

    pub fn susceptibility(self) -> f64 {
        self.profile()
            .map(|p| p.susceptibility)
            .unwrap_or(DEFAULT_ROCK_SUSCEPTIBILITY)
    }
}

impl From<&str> for RockType {
    fn from(name: &str) -> Self {
        ROCK_INDEX
            .get(&name.trim().to_lowercase())
            .map(|p| p.rock_type)
            .unwrap_or(RockType::Unknown)
    }
}

impl From<String> for RockType {
    fn from(name: String) -> Self {
        RockType::from(name.as_str())
    }
}

impl fmt::Display for RockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Image heuristics ---

/// Descriptive percentages attached to an uploaded slope photo.
///
/// Fields are individually optional. A value with no fields set counts as
/// "no image".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageHeuristics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_steepness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rock_fractures: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetation_cover: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rock_type_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erosion_signs: Option<f64>,
}

impl ImageHeuristics {
    pub const fn complete(
        slope_steepness: f64,
        rock_fractures: f64,
        vegetation_cover: f64,
        rock_type_confidence: f64,
        erosion_signs: f64,
    ) -> Self {
        Self {
            slope_steepness: Some(slope_steepness),
            rock_fractures: Some(rock_fractures),
            vegetation_cover: Some(vegetation_cover),
            rock_type_confidence: Some(rock_type_confidence),
            erosion_signs: Some(erosion_signs),
        }
    }

    fn fields(&self) -> [Option<f64>; 5] {
        [
            self.slope_steepness,
            self.rock_fractures,
            self.vegetation_cover,
            self.rock_type_confidence,
            self.erosion_signs,
        ]
    }

    pub fn field_count(&self) -> u32 {
        self.fields().iter().filter(|f| f.is_some()).count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Clamp every present field to 0-100.
    pub fn clamped(self) -> Self {
        let pct = |v: Option<f64>| v.map(|x| x.clamp(0.0, 100.0));
        Self {
            slope_steepness: pct(self.slope_steepness),
            rock_fractures: pct(self.rock_fractures),
            vegetation_cover: pct(self.vegetation_cover),
            rock_type_confidence: pct(self.rock_type_confidence),
            erosion_signs: pct(self.erosion_signs),
        }
    }
}

// --- Input ---

/// One submission's readings. Built per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    /// mm/24h
    pub rainfall: f64,
    /// cm/24h
    pub snowfall: f64,
    /// km/h
    pub wind_speed: f64,
    /// °C
    pub temperature: f64,
    /// m
    pub elevation: f64,
    /// cm, divided by during scoring
    pub fracture_spacing: f64,
    /// degrees; carried through but not scored
    #[serde(default)]
    pub fracture_orientation: f64,
    /// degrees
    pub slope_angle: f64,
    pub rock_type: RockType,
    #[serde(default)]
    pub image_heuristics: Option<ImageHeuristics>,
}

impl RiskInput {
    /// Clamp every reading to the range the dashboard accepts. Fracture
    /// spacing comes out at 1 cm or more.
    pub fn clamped(self) -> Self {
        Self {
            rainfall: self.rainfall.clamp(0.0, 100.0),
            snowfall: self.snowfall.clamp(0.0, 50.0),
            wind_speed: self.wind_speed.clamp(0.0, 100.0),
            temperature: self.temperature.clamp(-20.0, 40.0),
            elevation: self.elevation.clamp(0.0, 3000.0),
            fracture_spacing: self.fracture_spacing.clamp(1.0, 200.0),
            fracture_orientation: self.fracture_orientation.clamp(0.0, 90.0),
            slope_angle: self.slope_angle.clamp(0.0, 90.0),
            rock_type: self.rock_type,
            image_heuristics: self.image_heuristics.map(ImageHeuristics::clamped),
        }
    }
}

// --- Output ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    #[serde(rename = "Rainfall Impact")]
    Rainfall,
    #[serde(rename = "Snow/Ice Impact")]
    Snowfall,
    #[serde(rename = "Fracture Density")]
    FractureDensity,
    #[serde(rename = "Slope Geometry")]
    SlopeGeometry,
    #[serde(rename = "Elevation Effects")]
    Elevation,
    #[serde(rename = "Wind Erosion")]
    Wind,
    #[serde(rename = "Temperature Effects")]
    Temperature,
    #[serde(rename = "Image Analysis: Slope")]
    ImageSlope,
    #[serde(rename = "Image Analysis: Fractures")]
    ImageFractures,
}

impl Factor {
    pub fn label(self) -> &'static str {
        match self {
            Factor::Rainfall => "Rainfall Impact",
            Factor::Snowfall => "Snow/Ice Impact",
            Factor::FractureDensity => "Fracture Density",
            Factor::SlopeGeometry => "Slope Geometry",
            Factor::Elevation => "Elevation Effects",
            Factor::Wind => "Wind Erosion",
            Factor::Temperature => "Temperature Effects",
            Factor::ImageSlope => "Image Analysis: Slope",
            Factor::ImageFractures => "Image Analysis: Fractures",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: Factor,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => RiskTier::Critical,
            s if s >= 50.0 => RiskTier::High,
            s if s >= 25.0 => RiskTier::Moderate,
            _ => RiskTier::Low,
        }
    }

    pub fn base_confidence(self) -> u32 {
        match self {
            RiskTier::Critical => 85,
            RiskTier::High => 80,
            RiskTier::Moderate => 75,
            RiskTier::Low => 70,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Moderate => "MODERATE",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// 0-100
    pub score: f64,
    pub tier: RiskTier,
    pub confidence: u32,
    /// Display contributions in a fixed order; rock type is reported separately.
    pub contributions: Vec<Contribution>,
    pub rock_susceptibility: f64,
}

impl RiskResult {
    pub fn contribution(&self, factor: Factor) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.factor == factor)
            .map(|c| c.value)
    }
}

fn percent_of(value: f64, saturation: f64) -> f64 {
    (value / saturation * 100.0).clamp(0.0, 100.0)
}

/// Score one submission.
pub fn score(input: &RiskInput) -> RiskResult {
    let heuristics = input.image_heuristics.filter(|h| !h.is_empty());

    // Image heuristics rescale the geometric readings before normalisation
    let mut fracture_spacing = input.fracture_spacing;
    let mut slope_angle = input.slope_angle;
    let mut image_modifier = 1.0;
    if let Some(h) = heuristics {
        let steepness = h.slope_steepness.unwrap_or(NEUTRAL_HEURISTIC);
        let fractures = h.rock_fractures.unwrap_or(NEUTRAL_HEURISTIC);
        image_modifier = 1.0 + (steepness / 100.0 - 0.5) * 0.3;
        fracture_spacing *= 1.0 - fractures / 200.0;
        slope_angle *= 1.0 + steepness / 100.0;
    }

    let rainfall = percent_of(input.rainfall, 50.0);
    let snowfall = percent_of(input.snowfall, 30.0);
    let wind = percent_of(input.wind_speed, 80.0);

    // Freeze-thaw: anything at or below zero is the worst case
    let temperature = if input.temperature <= 0.0 {
        100.0
    } else {
        (100.0 - input.temperature * 2.0).clamp(0.0, 100.0)
    };

    let elevation = percent_of(input.elevation, 2000.0);

    let fracture_density = if fracture_spacing > 0.0 {
        100.0 / fracture_spacing
    } else {
        100.0
    };
    let mut fracture = (fracture_density * 2.0).clamp(0.0, 100.0);
    let mut slope = percent_of(slope_angle, 60.0);
    let mut rock = input.rock_type.susceptibility();

    if let Some(h) = heuristics {
        fracture *= image_modifier;
        slope *= image_modifier;
        let confidence = h.rock_type_confidence.unwrap_or(NEUTRAL_HEURISTIC);
        rock *= 1.0 + (confidence / 100.0 - 0.5) * 0.2;
    }

    let mut contributions = vec![
        Contribution { factor: Factor::Rainfall, value: rainfall },
        Contribution { factor: Factor::Snowfall, value: snowfall },
        Contribution { factor: Factor::FractureDensity, value: fracture },
        Contribution { factor: Factor::SlopeGeometry, value: slope },
        Contribution { factor: Factor::Elevation, value: elevation },
        Contribution { factor: Factor::Wind, value: wind },
        Contribution { factor: Factor::Temperature, value: temperature },
    ];

    let mut weighted = rainfall * WEIGHTS.rainfall
        + snowfall * WEIGHTS.snowfall
        + wind * WEIGHTS.wind_speed
        + temperature * WEIGHTS.temperature
        + elevation * WEIGHTS.elevation
        + fracture * WEIGHTS.fracture_density
        + slope * WEIGHTS.slope_angle
        + rock * WEIGHTS.rock_type;

    if let Some(h) = heuristics {
        let steepness = h.slope_steepness.unwrap_or(0.0);
        let fractures = h.rock_fractures.unwrap_or(0.0);
        contributions.push(Contribution { factor: Factor::ImageSlope, value: steepness });
        contributions.push(Contribution { factor: Factor::ImageFractures, value: fractures });
        weighted += (steepness * 0.6 + fractures * 0.4) * WEIGHTS.image_analysis;
    }

    let score = weighted.clamp(0.0, 100.0);
    let tier = RiskTier::from_score(score);
    let confidence = tier.base_confidence() + 2 * heuristics.map_or(0, |h| h.field_count());

    RiskResult {
        score,
        tier,
        confidence,
        contributions,
        rock_susceptibility: rock,
    }
}
