//! Chunk streaming and LOD management

pub mod lod;
pub mod streamer;

pub use lod::{lod_from_distance, stride_for_lod, LodConfig, LOD_DISTANCES, MAX_LOD};
pub use streamer::{TerrainStreamer, UpdateStats, VISIBILITY_MAX_Y, VISIBILITY_MIN_Y};
