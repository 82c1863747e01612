//! Chunk generation pipeline
//!
//! The pipeline orchestrates, per chunk:
//! 1. Biome selection for the chunk center
//! 2. Height sampling with the biome's shape (`HeightsGenerated`)
//! 3. Lake carving (`LakesCarved`)
//! 4. Edge stitching against loaded neighbors, mesh and bounds (`EdgesStitched`)
//! 5. Deferred feature scattering near the viewer (`FeaturesGenerated`)

pub mod config;
pub mod lake_carver;
pub mod scatter;

pub use config::{PlacementLimits, TerrainConfig, MIN_RENDER_DISTANCE};
pub use lake_carver::LakeCarver;
pub use scatter::FeatureScatter;

use crate::core::types::Result;
use crate::terrain::biome::{Biome, BiomeEntry, BiomeTable};
use crate::terrain::generator::{TerrainGenerator, TerrainParams, DEFAULT_OCTAVES};
use crate::terrain::noise::NoiseField;
use crate::terrain::selector::{self, BiomeSelector, BIOME_SEED_OFFSET};
use crate::terrain::surface::SurfaceBands;
use crate::world::{Chunk, ChunkCoord, ChunkState, EdgeNeighbors};

/// Everything needed to turn a chunk coordinate into a finished chunk
pub struct GenerationPipeline {
    terrain: TerrainGenerator,
    table: BiomeTable,
    selector: Box<dyn BiomeSelector>,
    biome_noise: NoiseField,
    surface: SurfaceBands,
    lake_carver: LakeCarver,
    scatter: FeatureScatter,
}

impl GenerationPipeline {
    /// Build a pipeline with the standard biome catalog
    pub fn new(config: &TerrainConfig) -> Result<Self> {
        let table = BiomeTable::standard(config.feature_multiplier)?;
        Self::with_table(config, table)
    }

    /// Build a pipeline around a custom biome catalog
    pub fn with_table(config: &TerrainConfig, table: BiomeTable) -> Result<Self> {
        config.validate()?;

        let terrain = TerrainGenerator::new(TerrainParams {
            seed: config.seed,
            scale: config.scale,
            octaves: DEFAULT_OCTAVES,
        });

        Ok(Self {
            terrain,
            table,
            selector: selector::selector_for(config.biome_strategy, config.seed),
            biome_noise: NoiseField::new(config.seed.wrapping_add(BIOME_SEED_OFFSET)),
            surface: config.surface,
            lake_carver: LakeCarver::new(&config.placement, config.seed),
            scatter: FeatureScatter::new(&config.placement, config.seed),
        })
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn table(&self) -> &BiomeTable {
        &self.table
    }

    /// Noise the blend weights are sampled from
    pub fn biome_noise(&self) -> &NoiseField {
        &self.biome_noise
    }

    pub fn biome_for_chunk(&self, coord: ChunkCoord) -> Biome {
        self.selector.select_for_chunk(&self.table, coord.x, coord.z)
    }

    fn entry(&self, biome: Biome) -> &BiomeEntry {
        self.table.entry(biome)
    }

    /// Run the pipeline through edge stitching. Features are left for
    /// [`GenerationPipeline::generate_features`].
    pub fn generate_chunk(&self, coord: ChunkCoord, lod: u32, edges: &EdgeNeighbors) -> Chunk {
        let entry = self.entry(self.biome_for_chunk(coord));
        let scale = self.terrain.params().scale;
        let mut chunk = Chunk::new(coord, entry.biome, entry.shape, lod, scale, self.surface);

        chunk.set_heights(self.terrain.generate_chunk_heights(&entry.shape, coord.x, coord.z));

        let lakes = self.lake_carver.carve(&mut chunk, entry);
        chunk.finish_lakes();

        chunk.stitch_edges(edges);

        log::debug!(
            "Generated chunk ({}, {}) biome={} lod={} lakes={}",
            coord.x,
            coord.z,
            entry.biome.name(),
            lod,
            lakes
        );
        chunk
    }

    /// Scatter features if the chunk is stitched and has none yet.
    ///
    /// Returns the number of features placed.
    pub fn generate_features(&self, chunk: &mut Chunk) -> usize {
        if chunk.features_generated() || chunk.state() != ChunkState::EdgesStitched {
            return 0;
        }
        let placed = self.scatter.scatter(chunk, self.entry(chunk.biome));
        chunk.finish_features();
        placed
    }
}
