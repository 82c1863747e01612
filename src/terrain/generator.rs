//! Noise-based heightfield sampling

use super::biome::BiomeShape;
use super::noise::NoiseField;
use crate::world::{HeightGrid, CHUNK_SIZE};

/// Default number of fbm octaves
pub const DEFAULT_OCTAVES: u32 = 4;

/// Parameters controlling terrain generation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub seed: i64,
    /// World units per grid cell
    pub scale: f32,
    pub octaves: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 1234,
            scale: 1.0,
            octaves: DEFAULT_OCTAVES,
        }
    }
}

/// Procedural height generator using fractal Brownian motion over [`NoiseField`]
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: NoiseField,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        Self {
            noise: NoiseField::new(params.seed),
            params,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Terrain height at world position (x, z) for a biome shape.
    ///
    /// Always inside `shape.height_envelope()`.
    pub fn height_at(&self, shape: &BiomeShape, x: f32, z: f32) -> f32 {
        let frequency = shape.frequency as f64;
        let n = self.noise.fbm(x as f64 * frequency, z as f64 * frequency, self.params.octaves);
        shape.base_height + shape.amplitude * n as f32
    }

    /// Sample a chunk's height grid, vertex (x, z) at world
    /// `((cx * CHUNK_SIZE + x) * scale, (cz * CHUNK_SIZE + z) * scale)`
    pub fn generate_chunk_heights(&self, shape: &BiomeShape, cx: i32, cz: i32) -> HeightGrid {
        let scale = self.params.scale;
        let origin_x = cx as i64 * CHUNK_SIZE as i64;
        let origin_z = cz as i64 * CHUNK_SIZE as i64;

        HeightGrid::from_fn(|x, z| {
            let wx = (origin_x + x as i64) as f32 * scale;
            let wz = (origin_z + z as i64) as f32 * scale;
            self.height_at(shape, wx, wz)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::biome::Biome;

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 1234);
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.octaves, 4);
    }

    #[test]
    fn test_height_at_consistency() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let shape = Biome::Hills.shape();
        let positions = [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (-50.0, -50.0)];

        for (x, z) in positions {
            let h1 = generator.height_at(&shape, x, z);
            let h2 = generator.height_at(&shape, x, z);
            assert_eq!(h1, h2, "Height should be consistent at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_different_seeds() {
        let gen1 = TerrainGenerator::new(TerrainParams { seed: 1, ..Default::default() });
        let gen2 = TerrainGenerator::new(TerrainParams { seed: 2, ..Default::default() });
        let shape = Biome::Mountains.shape();

        let differs = (0..20).any(|i| {
            let p = 37.0 + i as f32 * 13.0;
            gen1.height_at(&shape, p, p * 0.5) != gen2.height_at(&shape, p, p * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_plains_chunk_within_envelope() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let shape = Biome::Plains.shape();
        assert_eq!(shape.height_envelope(), (-70.0, 130.0));

        let heights = generator.generate_chunk_heights(&shape, 0, 0);
        let (low, high) = shape.height_envelope();
        for &h in heights.as_slice() {
            assert!(h >= low && h <= high, "height {} outside envelope", h);
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let generator = TerrainGenerator::new(TerrainParams {
            seed: 77,
            scale: 2.0,
            ..Default::default()
        });
        let shape = Biome::Swamp.shape();
        let heights = generator.generate_chunk_heights(&shape, -3, 5);
        for x in [0, 1, 31, CHUNK_SIZE] {
            for z in [0, 7, CHUNK_SIZE] {
                let wx = (-3 * CHUNK_SIZE as i32 + x as i32) as f32 * 2.0;
                let wz = (5 * CHUNK_SIZE as i32 + z as i32) as f32 * 2.0;
                assert_eq!(heights.get(x, z), generator.height_at(&shape, wx, wz));
            }
        }
    }

    #[test]
    fn test_adjacent_chunks_share_edge() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let shape = Biome::Hills.shape();
        let a = generator.generate_chunk_heights(&shape, 0, 0);
        let b = generator.generate_chunk_heights(&shape, 1, 0);
        assert_eq!(a.east_edge(), (0..=CHUNK_SIZE).map(|z| b.get(0, z)).collect::<Vec<_>>());
    }
}
