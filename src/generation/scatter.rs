//! Per-cell feature scattering
//!
//! Each free cell inside the height band and under the slope limit tries the
//! biome's spawners in declared order. The first successful trial places its
//! feature and ends the cell, so earlier spawners are favored.

use super::config::PlacementLimits;
use crate::core::rng::{hash_seed, SimpleRng};
use crate::terrain::biome::BiomeEntry;
use crate::world::{Chunk, CHUNK_SIZE};

/// Features sink into slopes by this much per unit of gradient
const SLOPE_SINK: f32 = 2.0;

pub struct FeatureScatter {
    limits: PlacementLimits,
    seed: i64,
}

impl FeatureScatter {
    pub fn new(limits: &PlacementLimits, seed: i64) -> Self {
        Self { limits: *limits, seed }
    }

    /// Whether a cell at `height` with `slope` may hold any feature
    pub fn is_eligible(&self, height: f32, slope: f32) -> bool {
        height >= self.limits.feature_min_height
            && height <= self.limits.feature_max_height
            && slope <= self.limits.feature_slope_threshold
    }

    /// Scatter features over every free cell. Returns the number placed.
    ///
    /// Uses the same chunk-seeded stream every time, so scattering a chunk
    /// again after an unload regrows identical features.
    pub fn scatter(&self, chunk: &mut Chunk, entry: &BiomeEntry) -> usize {
        if !entry.has_features() {
            return 0;
        }

        let coord = chunk.coord;
        let scale = chunk.scale();
        let chunk_seed = hash_seed(coord.x as f32, 0.0, coord.z as f32, self.seed);
        let mut rng = SimpleRng::from_seed(chunk_seed);
        let mut placed = 0;

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                if chunk.is_cell_masked(x, z) {
                    continue;
                }

                let height = chunk.heights().get(x, z);
                let slope = chunk.slope(x, z);
                if !self.is_eligible(height, slope) {
                    continue;
                }

                let (wx, wz) = coord.cell_to_world(x as f32 + 0.5, z as f32 + 0.5, scale);
                let wy = height - slope * SLOPE_SINK;

                for &(spawner, probability) in entry.features() {
                    if spawner.is_lake() {
                        continue;
                    }
                    if spawner.is_tree() && height > self.limits.tree_max_height {
                        continue;
                    }
                    if !rng.chance(probability) {
                        continue;
                    }

                    let ix = coord.x * CHUNK_SIZE as i32 + x as i32;
                    let iz = coord.z * CHUNK_SIZE as i32 + z as i32;
                    let seed =
                        hash_seed(ix as f32, (height * 1000.0).round(), iz as f32, self.seed);

                    chunk.place_feature(x, z, spawner.spawn(wx, wy, wz, seed));
                    placed += 1;
                    break;
                }
            }
        }

        log::trace!("Chunk ({}, {}) scattered {} features", coord.x, coord.z, placed);
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureKind, FeatureSpawner, FlowerSpecies, TreeSpecies};
    use crate::terrain::biome::Biome;
    use crate::terrain::surface::SurfaceBands;
    use crate::world::{ChunkCoord, HeightGrid, GRID_SIZE};

    fn flat_chunk(height: f32) -> Chunk {
        let mut chunk = Chunk::new(
            ChunkCoord::new(0, 3),
            Biome::Plains,
            Biome::Plains.shape(),
            0,
            1.0,
            SurfaceBands::default(),
        );
        chunk.set_heights(HeightGrid::filled(height));
        chunk
    }

    fn entry(features: Vec<(FeatureSpawner, f32)>) -> BiomeEntry {
        BiomeEntry::new(Biome::Plains, Biome::Plains.shape(), features, 1.0).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 5);
        let entry = entry(vec![
            (FeatureSpawner::Cactus, 1.0),
            (FeatureSpawner::Flower(FlowerSpecies::Rose), 1.0),
        ]);
        let mut chunk = flat_chunk(10.0);
        let placed = scatter.scatter(&mut chunk, &entry);
        assert_eq!(placed, CHUNK_SIZE * CHUNK_SIZE);
        assert!(chunk.features().iter().all(|f| matches!(f.kind, FeatureKind::Cactus(_))));
        assert_eq!(chunk.feature_mask().count(), CHUNK_SIZE * CHUNK_SIZE);
    }

    #[test]
    fn test_height_band() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 5);
        let entry = entry(vec![(FeatureSpawner::Cactus, 1.0)]);
        for height in [0.0, 80.5, -3.0] {
            let mut chunk = flat_chunk(height);
            assert_eq!(scatter.scatter(&mut chunk, &entry), 0);
        }
    }

    #[test]
    fn test_trees_skip_above_ceiling() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 5);
        let entry = entry(vec![
            (FeatureSpawner::Tree(TreeSpecies::Bush), 1.0),
            (FeatureSpawner::DeadGrass, 1.0),
        ]);
        let mut chunk = flat_chunk(60.0);
        scatter.scatter(&mut chunk, &entry);
        assert!(chunk.features().iter().all(|f| matches!(f.kind, FeatureKind::Grass(_))));
    }

    #[test]
    fn test_lakes_and_masked_cells_skipped() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 5);
        let entry = entry(vec![(FeatureSpawner::Lake, 1.0), (FeatureSpawner::Cactus, 1.0)]);
        let mut chunk = flat_chunk(10.0);
        chunk.mark_lake_cell(4, 4);
        let placed = scatter.scatter(&mut chunk, &entry);
        assert_eq!(placed, CHUNK_SIZE * CHUNK_SIZE - 1);
        assert!(chunk.features().iter().all(|f| !f.is_lake()));
    }

    #[test]
    fn test_steep_cells_skipped() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 5);
        let entry = entry(vec![(FeatureSpawner::Cactus, 1.0)]);
        let mut chunk = flat_chunk(0.0);
        let mut heights = HeightGrid::new();
        for x in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                heights.set(x, z, 10.0 + x as f32 * 2.0);
            }
        }
        chunk.set_heights(heights);
        assert_eq!(scatter.scatter(&mut chunk, &entry), 0);
    }

    #[test]
    fn test_sparse_scatter_is_deterministic() {
        let scatter = FeatureScatter::new(&PlacementLimits::default(), 99);
        let entry = entry(Biome::Plains.feature_list());
        let mut a = flat_chunk(12.0);
        let mut b = flat_chunk(12.0);
        let count = scatter.scatter(&mut a, &entry);
        assert_eq!(count, scatter.scatter(&mut b, &entry));
        assert!(count > 0);
        assert_eq!(a.features(), b.features());
        // Feature base sits on the flat cell center
        let f = &a.features()[0];
        assert_eq!(f.position.y, 12.0);
        assert_eq!(f.position.x.fract(), 0.5);
    }
}
