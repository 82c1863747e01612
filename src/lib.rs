//! Terrastream - procedural, biome-driven infinite terrain
//!
//! Heights come from fractal noise shaped per biome. Each chunk carves its
//! lakes, stitches its edges to loaded neighbors and scatters vegetation once
//! the viewer is close enough. [`streaming::TerrainStreamer`] keeps the loaded
//! set centered on a moving viewer.

pub mod core;
pub mod math;
pub mod terrain;
pub mod feature;
pub mod world;
pub mod generation;
pub mod streaming;

pub use core::error::Error;
pub use generation::TerrainConfig;
pub use streaming::TerrainStreamer;
