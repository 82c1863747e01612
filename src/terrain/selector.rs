//! Mapping world positions to biomes
//!
//! Two strategies are provided. [`NoiseBiomeSelector`] walks the biome
//! weights with a low-frequency noise value. [`RegionBiomeSelector`] scatters
//! biome centers on a coarse grid and picks the nearest one, which produces
//! larger contiguous regions.
//!
//! All coordinates here are grid cells, i.e. world units divided by the
//! world scale.

use serde::{Deserialize, Serialize};

use super::biome::{Biome, BiomeTable};
use super::noise::NoiseField;
use crate::core::rng::{hash_seed, SimpleRng};
use crate::world::CHUNK_SIZE;

/// Offset between the terrain seed and the biome-noise seed
pub const BIOME_SEED_OFFSET: i64 = 12345;

/// Frequency at which chunk centers sample the biome noise
const SELECT_FREQUENCY: f64 = 0.002;
/// Frequency used for blend weights
const BLEND_FREQUENCY: f64 = 0.001;

/// Region grid spacing, in chunks
pub const REGION_SIZE: i32 = 10;
const REGION_SEED_MASK: i64 = 0xCAFE_BABE;

/// Which selector a streamer uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeStrategy {
    #[default]
    Noise,
    Region,
}

/// Chooses a biome for a position. Always returns a biome from `table`.
pub trait BiomeSelector: Send + Sync {
    fn select_biome(&self, table: &BiomeTable, x: f64, z: f64) -> Biome;

    /// Biome for a whole chunk, decided at its center cell
    fn select_for_chunk(&self, table: &BiomeTable, cx: i32, cz: i32) -> Biome {
        let size = CHUNK_SIZE as f64;
        self.select_biome(table, cx as f64 * size + size / 2.0, cz as f64 * size + size / 2.0)
    }
}

/// Build the selector for a strategy. `seed` is the world seed.
pub fn selector_for(strategy: BiomeStrategy, seed: i64) -> Box<dyn BiomeSelector> {
    match strategy {
        BiomeStrategy::Noise => Box::new(NoiseBiomeSelector::new(seed)),
        BiomeStrategy::Region => Box::new(RegionBiomeSelector::new(seed)),
    }
}

/// Weighted walk over biome spawn chances driven by low-frequency noise
#[derive(Clone, Debug)]
pub struct NoiseBiomeSelector {
    noise: NoiseField,
}

impl NoiseBiomeSelector {
    pub fn new(seed: i64) -> Self {
        Self {
            noise: NoiseField::new(seed.wrapping_add(BIOME_SEED_OFFSET)),
        }
    }

    /// Raw noise remapped to [0, 1]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        (self.noise.eval(x * SELECT_FREQUENCY, z * SELECT_FREQUENCY) + 1.0) * 0.5
    }
}

impl BiomeSelector for NoiseBiomeSelector {
    fn select_biome(&self, table: &BiomeTable, x: f64, z: f64) -> Biome {
        let threshold = self.sample(x, z) * table.total_spawn_chance();
        table.walk_weights(threshold)
    }
}

/// One scattered biome center
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionCenter {
    pub biome: Biome,
    /// Offset from the region midpoint, in chunks
    pub offset_x: i32,
    pub offset_z: i32,
    /// Distances are divided by this before comparing centers
    pub influence: f32,
}

/// Nearest-center selection over a jittered grid of biome centers.
///
/// Centers are derived on demand from the grid cell and seed, so the grid
/// has no edge.
#[derive(Clone, Debug)]
pub struct RegionBiomeSelector {
    seed: i64,
}

impl RegionBiomeSelector {
    pub fn new(seed: i64) -> Self {
        Self {
            seed: seed ^ REGION_SEED_MASK,
        }
    }

    pub fn center(&self, table: &BiomeTable, gx: i32, gz: i32) -> RegionCenter {
        let mut rng = SimpleRng::from_seed(hash_seed(gx as f32, 0.0, gz as f32, self.seed));
        let biome = table.walk_weights(rng.next_f64() * table.total_spawn_chance());
        let offset_x = rng.next_below(REGION_SIZE as u32) as i32 - REGION_SIZE / 2;
        let offset_z = rng.next_below(REGION_SIZE as u32) as i32 - REGION_SIZE / 2;
        let influence = REGION_SIZE as f32 * (0.8 + rng.next_float() * 0.6);
        RegionCenter {
            biome,
            offset_x,
            offset_z,
            influence,
        }
    }

    /// Nearest center among the 3x3 neighborhood. Ties keep the first center
    /// visited, scanning dx then dz from -1 to 1.
    pub fn biome_at_chunk(&self, table: &BiomeTable, cx: i32, cz: i32) -> Biome {
        let gx = cx.div_euclid(REGION_SIZE);
        let gz = cz.div_euclid(REGION_SIZE);

        let mut best = Biome::Plains;
        let mut best_distance = f64::MAX;
        for dx in -1..=1 {
            for dz in -1..=1 {
                let center = self.center(table, gx + dx, gz + dz);
                let center_x = (gx + dx) * REGION_SIZE + REGION_SIZE / 2 + center.offset_x;
                let center_z = (gz + dz) * REGION_SIZE + REGION_SIZE / 2 + center.offset_z;
                let ddx = (cx - center_x) as f64;
                let ddz = (cz - center_z) as f64;
                let distance = (ddx * ddx + ddz * ddz).sqrt() / center.influence as f64;
                if distance < best_distance {
                    best_distance = distance;
                    best = center.biome;
                }
            }
        }
        best
    }
}

impl BiomeSelector for RegionBiomeSelector {
    fn select_biome(&self, table: &BiomeTable, x: f64, z: f64) -> Biome {
        let size = CHUNK_SIZE as f64;
        let cx = (x / size).floor() as i32;
        let cz = (z / size).floor() as i32;
        table.entry(self.biome_at_chunk(table, cx, cz)).biome
    }
}

/// Per-biome blend weights at a world position, normalized to sum to 1.
///
/// Each biome's influence falls off linearly with the distance between the
/// remapped noise value and the biome's center. When no biome has influence
/// every weight is 0.
pub fn biome_weights(
    noise: &NoiseField,
    table: &BiomeTable,
    wx: f64,
    wz: f64,
) -> Vec<(Biome, f32)> {
    let v = (noise.eval(wx * BLEND_FREQUENCY, wz * BLEND_FREQUENCY) + 1.0) / 2.0;

    let mut weights: Vec<(Biome, f32)> = table
        .entries()
        .iter()
        .map(|e| {
            let distance = (v - e.shape.center as f64).abs() as f32;
            (e.biome, (1.0 - distance / e.shape.blend_radius).max(0.0))
        })
        .collect();

    let total: f32 = weights.iter().map(|&(_, w)| w).sum();
    if total > 0.0 {
        for (_, w) in &mut weights {
            *w /= total;
        }
    }
    weights
}

/// Highest-weight biome, first in table order on ties, PLAINS if none
pub fn dominant_biome(noise: &NoiseField, table: &BiomeTable, wx: f64, wz: f64) -> Biome {
    let mut best = Biome::Plains;
    let mut best_weight = 0.0;
    for (biome, weight) in biome_weights(noise, table, wx, wz) {
        if weight > best_weight {
            best_weight = weight;
            best = biome;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::biome::DEFAULT_FEATURE_MULTIPLIER;

    fn table() -> BiomeTable {
        BiomeTable::standard(DEFAULT_FEATURE_MULTIPLIER).unwrap()
    }

    #[test]
    fn test_noise_selection_is_deterministic() {
        let table = table();
        let a = NoiseBiomeSelector::new(1234);
        let b = NoiseBiomeSelector::new(1234);
        for i in -20..20 {
            for j in -20..20 {
                assert_eq!(a.select_for_chunk(&table, i, j), b.select_for_chunk(&table, i, j));
            }
        }
    }

    #[test]
    fn test_selection_covers_all_inputs() {
        let table = table();
        let noise = NoiseBiomeSelector::new(99);
        let region = RegionBiomeSelector::new(99);
        let coords = [0.0, -1.0e9, 1.0e9, 123.456, -0.0001, 3.0e7];
        for &x in &coords {
            for &z in &coords {
                let b = noise.select_biome(&table, x, z);
                assert!(table.entries().iter().any(|e| e.biome == b));
                let r = region.select_biome(&table, x, z);
                assert!(table.entries().iter().any(|e| e.biome == r));
            }
        }
    }

    #[test]
    fn test_noise_selection_varies() {
        let table = table();
        let selector = NoiseBiomeSelector::new(1234);
        let mut seen = std::collections::HashSet::new();
        for i in -40..40 {
            for j in -40..40 {
                seen.insert(selector.select_for_chunk(&table, i * 3, j * 3));
            }
        }
        assert!(seen.len() >= 3, "found only {:?}", seen);
    }

    #[test]
    fn test_region_centers_in_range() {
        let table = table();
        let selector = RegionBiomeSelector::new(5);
        for g in -30..30 {
            let c = selector.center(&table, g, -g);
            assert!((-5..5).contains(&c.offset_x));
            assert!((-5..5).contains(&c.offset_z));
            assert!(c.influence >= 8.0 && c.influence <= 14.0);
            assert_eq!(c, selector.center(&table, g, -g));
        }
    }

    #[test]
    fn test_region_neighbors_cluster() {
        // Adjacent chunks usually share a region
        let table = table();
        let selector = RegionBiomeSelector::new(42);
        let mut same = 0;
        for i in 0..100 {
            if selector.biome_at_chunk(&table, i, 0) == selector.biome_at_chunk(&table, i + 1, 0) {
                same += 1;
            }
        }
        assert!(same > 50);
    }

    #[test]
    fn test_weights_normalized() {
        let table = table();
        let noise = NoiseField::new(1234 + BIOME_SEED_OFFSET);
        for i in 0..50 {
            let weights = biome_weights(&noise, &table, i as f64 * 97.0, i as f64 * -53.0);
            assert_eq!(weights.len(), table.len());
            let total: f32 = weights.iter().map(|&(_, w)| w).sum();
            assert!(total == 0.0 || (total - 1.0).abs() < 1e-4);
            assert!(weights.iter().all(|&(_, w)| w >= 0.0));
        }
    }

    #[test]
    fn test_dominant_has_max_weight() {
        let table = table();
        let noise = NoiseField::new(7);
        let (wx, wz) = (1500.0, -800.0);
        let dominant = dominant_biome(&noise, &table, wx, wz);
        let weights = biome_weights(&noise, &table, wx, wz);
        let max = weights.iter().map(|&(_, w)| w).fold(0.0, f32::max);
        if max > 0.0 {
            let w = weights.iter().find(|(b, _)| *b == dominant).unwrap().1;
            assert_eq!(w, max);
        } else {
            assert_eq!(dominant, Biome::Plains);
        }
    }

    #[test]
    fn test_strategy_factory() {
        let table = table();
        let selector = selector_for(BiomeStrategy::Region, 3);
        let direct = RegionBiomeSelector::new(3);
        assert_eq!(
            selector.select_for_chunk(&table, 4, -9),
            direct.select_for_chunk(&table, 4, -9)
        );
    }
}
