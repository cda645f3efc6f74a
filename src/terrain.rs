//! Synthetic mine terrain for the contour views.
//!
//! The field is decorative. It is seeded from a hash of the image heuristics
//! so the same photo analysis always draws the same surface, and nothing here
//! feeds back into scoring.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::risk::ImageHeuristics;

pub const GRID_SIZE: usize = 100;
pub const MIN_ELEVATION: f64 = 600.0;
pub const MAX_ELEVATION: f64 = 1200.0;

const BASE_ELEVATION: f64 = 800.0;
const EXTENT: f64 = 5.0;
const MISSING_FIELD: f64 = 50.0;

/// Terrain drawn when no photo has been analysed.
pub const NEUTRAL_HEURISTICS: ImageHeuristics =
    ImageHeuristics::complete(55.0, 45.0, 35.0, 60.0, 40.0);

/// The five heuristic values with gaps filled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainParams {
    pub slope_steepness: f64,
    pub rock_fractures: f64,
    pub vegetation_cover: f64,
    pub erosion_signs: f64,
    pub rock_type_confidence: f64,
}

impl From<&ImageHeuristics> for TerrainParams {
    fn from(h: &ImageHeuristics) -> Self {
        Self {
            slope_steepness: h.slope_steepness.unwrap_or(MISSING_FIELD),
            rock_fractures: h.rock_fractures.unwrap_or(MISSING_FIELD),
            vegetation_cover: h.vegetation_cover.unwrap_or(MISSING_FIELD),
            erosion_signs: h.erosion_signs.unwrap_or(MISSING_FIELD),
            rock_type_confidence: h.rock_type_confidence.unwrap_or(MISSING_FIELD),
        }
    }
}

impl TerrainParams {
    pub fn seed(&self) -> u64 {
        let key = format!(
            "{}_{}_{}_{}_{}",
            self.slope_steepness,
            self.rock_fractures,
            self.vegetation_cover,
            self.erosion_signs,
            self.rock_type_confidence
        );
        let digest = blake3::hash(key.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Average of slope and fractures, truncated.
    pub fn complexity(&self) -> u32 {
        ((self.slope_steepness + self.rock_fractures) / 2.0).floor() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainField {
    pub params: TerrainParams,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Row-major: `z[row][col]` sits at `(x[col], y[row])`.
    pub z: Vec<Vec<f64>>,
}

impl TerrainField {
    pub fn min_elevation(&self) -> f64 {
        self.cells().fold(f64::INFINITY, f64::min)
    }

    pub fn max_elevation(&self) -> f64 {
        self.cells().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean absolute elevation step between neighbouring cells.
    pub fn roughness(&self) -> f64 {
        let mut total = 0.0;
        let mut steps = 0usize;
        for (r, row) in self.z.iter().enumerate() {
            for (c, &h) in row.iter().enumerate() {
                if let Some(&right) = row.get(c + 1) {
                    total += (right - h).abs();
                    steps += 1;
                }
                if let Some(below) = self.z.get(r + 1) {
                    total += (below[c] - h).abs();
                    steps += 1;
                }
            }
        }
        if steps == 0 { 0.0 } else { total / steps as f64 }
    }

    fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.z.iter().flat_map(|row| row.iter().copied())
    }
}

pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn gaussian(rng: &mut ChaCha8Rng, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * sigma
}

/// Bilinear resize with corner alignment.
fn upsample(src: &[Vec<f64>], size: usize) -> Vec<Vec<f64>> {
    let rows = src.len();
    let cols = src.first().map_or(0, Vec::len);
    if rows == size && cols == size {
        return src.to_vec();
    }

    let coord = |k: usize, n_in: usize| -> (usize, usize, f64) {
        if n_in <= 1 || size <= 1 {
            return (0, 0, 0.0);
        }
        let pos = k as f64 * (n_in - 1) as f64 / (size - 1) as f64;
        let lo = (pos.floor() as usize).min(n_in - 1);
        let hi = (lo + 1).min(n_in - 1);
        (lo, hi, pos - lo as f64)
    };

    (0..size)
        .map(|i| {
            let (r0, r1, fr) = coord(i, rows);
            (0..size)
                .map(|j| {
                    let (c0, c1, fc) = coord(j, cols);
                    let top = src[r0][c0] * (1.0 - fc) + src[r0][c1] * fc;
                    let bottom = src[r1][c0] * (1.0 - fc) + src[r1][c1] * fc;
                    top * (1.0 - fr) + bottom * fr
                })
                .collect()
        })
        .collect()
}

/// Generate the elevation field for a set of heuristics.
pub fn generate(heuristics: &ImageHeuristics) -> TerrainField {
    let params = TerrainParams::from(heuristics);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed());

    let x = linspace(-EXTENT, EXTENT, GRID_SIZE);
    let y = linspace(-EXTENT, EXTENT, GRID_SIZE);

    let slope = params.slope_steepness;
    let fractures = params.rock_fractures;
    let vegetation = params.vegetation_cover;
    let erosion = params.erosion_signs;
    let confidence = params.rock_type_confidence;

    let steepness_factor = 0.5 + slope / 100.0 * 2.0;
    let fracture_intensity = fractures / 100.0;
    let erosion_intensity = erosion / 100.0;
    let vegetation_smoothing = vegetation / 100.0;
    let mining_intensity = (slope + fractures) / 200.0;

    let fracture_lines = if fractures > 30.0 {
        (3.0 + fracture_intensity * 5.0) as usize
    } else {
        0
    };
    let bench_spacing = 1.0 + (100.0 - slope) / 50.0;
    let ridge_angle = fracture_intensity * std::f64::consts::PI;

    let mut z: Vec<Vec<f64>> = y
        .iter()
        .map(|&py| {
            x.iter()
                .map(|&px| {
                    let r2 = px * px + py * py;

                    // Peak, ridge or plateau
                    let mut h = if slope > 70.0 {
                        BASE_ELEVATION + 300.0 * steepness_factor * (-r2 / 2.0).exp()
                    } else if slope > 40.0 {
                        let along = px * ridge_angle.cos() + py * ridge_angle.sin();
                        BASE_ELEVATION + 200.0 * (-(along * along) / 1.5).exp()
                    } else {
                        BASE_ELEVATION + 100.0 * (-r2 / 3.0).exp()
                    };

                    for i in 0..fracture_lines {
                        let angle = i as f64 / fracture_lines.max(1) as f64 * std::f64::consts::PI;
                        let along = px * angle.cos() + py * angle.sin();
                        let line = 20.0 * fracture_intensity * (5.0 * along).sin();
                        h += line * (-(along * along) / 4.0).exp();
                    }

                    // Dendritic drainage
                    if erosion > 40.0 {
                        for freq in [2.0, 3.0, 4.0] {
                            let valley = -50.0
                                * erosion_intensity
                                * ((freq * px).sin() * (freq * py / 2.0).cos()
                                    + (freq * py).sin() * (freq * px / 2.0).cos());
                            h += valley * (-r2 / 6.0).exp();
                        }
                    }

                    // Benches
                    if confidence > 60.0 {
                        let bench = 30.0
                            * (confidence / 100.0)
                            * ((px * bench_spacing).sin() * (py * bench_spacing).sin());
                        h += bench * (-r2 / 8.0).exp();
                    }

                    if vegetation > 60.0 {
                        let micro = 8.0
                            * vegetation_smoothing
                            * ((8.0 * px).sin() * (8.0 * py).cos()
                                + (6.0 * py).sin() * (6.0 * px).cos());
                        h += micro * (-r2 / 10.0).exp();
                    }

                    // Open pit
                    if slope > 60.0 && fractures > 50.0 {
                        h += -80.0 * mining_intensity * (-r2 / 1.2).exp();
                    }

                    // Spoil tip
                    if erosion > 70.0 {
                        let d2 = (px - 2.0).powi(2) + (py - 2.0).powi(2);
                        h += 40.0 * mining_intensity * (-d2 / 1.5).exp();
                    }

                    h
                })
                .collect()
        })
        .collect();

    if vegetation > 30.0 {
        let sigma = 5.0 * (1.0 - vegetation_smoothing);
        for row in z.iter_mut() {
            for h in row.iter_mut() {
                *h += gaussian(&mut rng, sigma);
            }
        }
    }

    let mut fractal = vec![vec![0.0; GRID_SIZE]; GRID_SIZE];
    for octave in 0..4u32 {
        let base = (GRID_SIZE / 2usize.pow(octave)).max(1);
        let sigma = 3.0 / (octave + 1) as f64;
        let noise: Vec<Vec<f64>> = (0..base)
            .map(|_| (0..base).map(|_| gaussian(&mut rng, sigma)).collect())
            .collect();
        let resized = upsample(&noise, GRID_SIZE);
        for (acc_row, row) in fractal.iter_mut().zip(resized) {
            for (acc, v) in acc_row.iter_mut().zip(row) {
                *acc += v;
            }
        }
    }

    let fractal_weight = 1.0 - vegetation_smoothing * 0.5;
    for (row, noise_row) in z.iter_mut().zip(&fractal) {
        for (h, n) in row.iter_mut().zip(noise_row) {
            *h = (*h + n * fractal_weight).clamp(MIN_ELEVATION, MAX_ELEVATION);
        }
    }

    TerrainField { params, x, y, z }
}

/// Colour scale for the 3D surface.
pub fn colorscale(params: &TerrainParams) -> &'static str {
    if params.vegetation_cover > 60.0 {
        "Earth"
    } else if params.slope_steepness > 70.0 {
        "RdBu_r"
    } else {
        "Viridis"
    }
}

/// Plain-language reading of the terrain drivers.
pub fn interpret(params: &TerrainParams) -> Vec<&'static str> {
    let mut notes = Vec::with_capacity(4);

    notes.push(match params.slope_steepness {
        s if s > 80.0 => "Extremely steep terrain - Sharp peak morphology with rapid elevation changes",
        s if s > 60.0 => "Steep mountainous terrain - Pronounced ridges and significant slopes",
        s if s > 40.0 => "Moderate slopes - Rolling hills with gradual elevation changes",
        _ => "Gentle terrain - Plateau-like features with minimal slope",
    });

    notes.push(match params.rock_fractures {
        f if f > 70.0 => "Highly fractured bedrock - Complex terrain with multiple fault lines and discontinuities",
        f if f > 50.0 => "Moderate fracturing - Visible joint patterns influencing terrain shape",
        _ => "Competent rock mass - Relatively uniform terrain with few fractures",
    });

    if params.erosion_signs > 60.0 {
        notes.push("Active erosion processes - Well-developed drainage patterns and valleys");
    } else if params.erosion_signs > 40.0 {
        notes.push("Moderate erosion signs - Some gully formation and surface weathering");
    }

    notes.push(match params.vegetation_cover {
        v if v > 70.0 => "Dense vegetation cover - Smoothed terrain morphology with organic matter accumulation",
        v if v > 40.0 => "Moderate vegetation - Partial terrain stabilization with some surface roughness",
        _ => "Sparse vegetation - Exposed bedrock with sharp topographic features",
    });

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_bounded() {
        for h in [
            NEUTRAL_HEURISTICS,
            ImageHeuristics::complete(95.0, 90.0, 10.0, 90.0, 80.0),
            ImageHeuristics::complete(10.0, 5.0, 95.0, 20.0, 5.0),
        ] {
            let field = generate(&h);
            assert_eq!(field.z.len(), GRID_SIZE);
            assert!(field.z.iter().all(|row| row.len() == GRID_SIZE));
            assert!(field.min_elevation() >= MIN_ELEVATION);
            assert!(field.max_elevation() <= MAX_ELEVATION);
        }
    }

    #[test]
    fn test_same_heuristics_same_field() {
        let h = ImageHeuristics::complete(64.0, 71.0, 45.0, 82.0, 33.0);
        assert_eq!(generate(&h), generate(&h));
    }

    #[test]
    fn test_different_heuristics_different_seed() {
        let a = TerrainParams::from(&ImageHeuristics::complete(64.0, 71.0, 45.0, 82.0, 33.0));
        let b = TerrainParams::from(&ImageHeuristics::complete(64.0, 71.0, 45.0, 82.0, 34.0));
        assert_ne!(a.seed(), b.seed());
    }

    #[test]
    fn test_missing_fields_use_midpoint() {
        let params = TerrainParams::from(&ImageHeuristics::default());
        assert_eq!(params.slope_steepness, 50.0);
        assert_eq!(params.rock_type_confidence, 50.0);
    }

    #[test]
    fn test_steep_fractured_terrain_is_rougher() {
        let gentle = generate(&ImageHeuristics::complete(30.0, 20.0, 20.0, 50.0, 20.0));
        let rugged = generate(&ImageHeuristics::complete(80.0, 90.0, 20.0, 50.0, 20.0));
        assert!(
            rugged.roughness() > gentle.roughness(),
            "rugged {} vs gentle {}",
            rugged.roughness(),
            gentle.roughness()
        );
        let relief = |f: &TerrainField| f.max_elevation() - f.min_elevation();
        assert!(relief(&rugged) > relief(&gentle));
    }

    #[test]
    fn test_upsample_preserves_corners() {
        let src = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        let out = upsample(&src, 5);
        assert_eq!(out[0][0], 0.0);
        assert_eq!(out[0][4], 1.0);
        assert_eq!(out[4][0], 2.0);
        assert_eq!(out[4][4], 3.0);
        assert!((out[2][2] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-5.0, 5.0, GRID_SIZE);
        assert_eq!(xs.len(), GRID_SIZE);
        assert_eq!(xs[0], -5.0);
        assert!((xs[GRID_SIZE - 1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_colorscale_and_interpretation() {
        let lush = TerrainParams::from(&ImageHeuristics::complete(80.0, 20.0, 75.0, 60.0, 10.0));
        assert_eq!(colorscale(&lush), "Earth");
        let steep = TerrainParams::from(&ImageHeuristics::complete(80.0, 20.0, 20.0, 60.0, 10.0));
        assert_eq!(colorscale(&steep), "RdBu_r");
        assert_eq!(colorscale(&TerrainParams::from(&NEUTRAL_HEURISTICS)), "Viridis");

        let notes = interpret(&steep);
        assert_eq!(notes.len(), 3);
        assert!(notes[0].starts_with("Steep mountainous"));

        let eroded = TerrainParams::from(&ImageHeuristics::complete(30.0, 60.0, 50.0, 60.0, 65.0));
        assert_eq!(interpret(&eroded).len(), 4);
    }

    #[test]
    fn test_complexity() {
        let params = TerrainParams::from(&ImageHeuristics::complete(55.0, 46.0, 0.0, 0.0, 0.0));
        assert_eq!(params.complexity(), 50);
    }
}
