//! Procedural terrain: noise, biomes, heights and surfacing

pub mod noise;
pub use noise::NoiseField;

pub mod generator;
pub use generator::{TerrainGenerator, TerrainParams};

pub mod biome;
pub use biome::{Biome, BiomeEntry, BiomeShape, BiomeTable, DEFAULT_FEATURE_MULTIPLIER};

pub mod selector;
pub use selector::{
    biome_weights, dominant_biome, selector_for, BiomeSelector, BiomeStrategy, NoiseBiomeSelector,
    RegionBiomeSelector,
};

pub mod surface;
pub use surface::{pick_texture, SurfaceBands, SurfaceTexture};
