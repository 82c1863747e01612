//! Terrain configuration: seed, streaming distances and generation thresholds

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::streaming::lod::LodConfig;
use crate::terrain::biome::DEFAULT_FEATURE_MULTIPLIER;
use crate::terrain::selector::BiomeStrategy;
use crate::terrain::surface::SurfaceBands;

/// Smallest render distance in chunks. The viewer's own chunk ring is always loaded.
pub const MIN_RENDER_DISTANCE: i32 = 1;

/// Where features and lakes may be placed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementLimits {
    pub feature_min_height: f32,
    pub feature_max_height: f32,
    /// Trees are not placed above this height
    pub tree_max_height: f32,
    pub feature_slope_threshold: f32,
    /// Lakes are not sited where the averaged slope exceeds this
    pub lake_slope_threshold: f32,
    /// Extra clearance around a lake footprint, in cells
    pub lake_buffer: f32,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            feature_min_height: 0.5,
            feature_max_height: 80.0,
            tree_max_height: 55.0,
            feature_slope_threshold: 0.8,
            lake_slope_threshold: 0.7,
            lake_buffer: 4.0,
        }
    }
}

/// Full configuration for a terrain streamer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: i64,
    /// World units per grid cell
    pub scale: f32,
    /// Chebyshev radius of loaded chunks around the viewer
    pub render_distance: i32,
    /// Chebyshev radius inside which chunks carry features
    pub feature_render_distance: i32,
    pub biome_strategy: BiomeStrategy,
    /// Uniform scale applied to every biome's spawn probabilities
    pub feature_multiplier: f32,
    pub surface: SurfaceBands,
    pub placement: PlacementLimits,
    pub lod: LodConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 1234,
            scale: 1.0,
            render_distance: 6,
            feature_render_distance: 3,
            biome_strategy: BiomeStrategy::Noise,
            feature_multiplier: DEFAULT_FEATURE_MULTIPLIER,
            surface: SurfaceBands::default(),
            placement: PlacementLimits::default(),
            lod: LodConfig::default(),
        }
    }
}

impl TerrainConfig {
    pub fn new(seed: i64, scale: f32) -> Self {
        Self {
            seed,
            scale,
            ..Default::default()
        }
    }

    /// Set the render distance, with features one ring closer
    pub fn with_render_distance(mut self, render_distance: i32) -> Self {
        self.render_distance = render_distance;
        self.feature_render_distance = (render_distance - 1).max(0);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(Error::Config(format!("scale must be positive, got {}", self.scale)));
        }
        if self.render_distance < MIN_RENDER_DISTANCE {
            return Err(Error::Config(format!(
                "render distance must be at least {}, got {}",
                MIN_RENDER_DISTANCE,
                self.render_distance
            )));
        }
        if self.feature_render_distance < 0 {
            return Err(Error::Config(format!(
                "feature render distance must not be negative, got {}",
                self.feature_render_distance
            )));
        }
        if !(self.feature_multiplier >= 0.0 && self.feature_multiplier.is_finite()) {
            return Err(Error::Config(format!(
                "feature multiplier must be a non-negative number, got {}",
                self.feature_multiplier
            )));
        }
        if self.surface.snow_full <= self.surface.snow_start {
            return Err(Error::Config("snow band must end above where it starts".to_string()));
        }
        if self.lod.distances.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::Config("LOD distances must be ascending".to_string()));
        }
        Ok(())
    }

    /// Load and validate a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}
