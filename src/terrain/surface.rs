//! Surface texture selection by height and slope

use serde::{Deserialize, Serialize};

use super::biome::BiomeShape;
use crate::core::rng::SimpleRng;

/// Elevation and slope thresholds for texture bands
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceBands {
    pub water_level: f32,
    /// At or below this the deep lake-bed texture is used
    pub absolute_water_bottom: f32,
    /// At or below this the shoreline texture is used
    pub water_surrounding: f32,
    pub snow_start: f32,
    pub snow_full: f32,
    pub rock_slope: f32,
    pub dirt_slope: f32,
}

impl Default for SurfaceBands {
    fn default() -> Self {
        Self {
            water_level: 0.0,
            absolute_water_bottom: -4.0,
            water_surrounding: 1.5,
            snow_start: 60.0,
            snow_full: 90.0,
            rock_slope: 1.2,
            dirt_slope: 0.6,
        }
    }
}

/// Texture a terrain triangle is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceTexture {
    WaterBottomAbsolute,
    WaterBottom,
    Snow,
    Rock(&'static str),
    Dirt(&'static str),
    Grass(&'static str),
}

impl SurfaceTexture {
    /// Texture identifier an external renderer resolves
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceTexture::WaterBottomAbsolute => "water_bottom_abs",
            SurfaceTexture::WaterBottom => "water_bottom",
            SurfaceTexture::Snow => "snow",
            SurfaceTexture::Rock(name)
            | SurfaceTexture::Dirt(name)
            | SurfaceTexture::Grass(name) => name,
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pick the texture for a surface at `height` with local gradient `slope`.
///
/// Deterministic in (height, slope). Submerged cells steeper than the rock
/// threshold are rock; otherwise the water bands come first, then a seeded
/// snow draw, then slope bands.
pub fn pick_texture(
    shape: &BiomeShape,
    bands: &SurfaceBands,
    height: f32,
    slope: f32,
) -> SurfaceTexture {
    if height < bands.water_level && slope > bands.rock_slope {
        return SurfaceTexture::Rock(shape.rock_texture);
    }

    if height <= bands.absolute_water_bottom {
        return SurfaceTexture::WaterBottomAbsolute;
    }
    if height <= bands.water_surrounding {
        return SurfaceTexture::WaterBottom;
    }

    if height >= bands.snow_start {
        let mut rng = SimpleRng::from_seed((height * 1000.0 + slope * 1000.0) as i32 as i64);
        let snow_chance = smoothstep(bands.snow_start, bands.snow_full, height);
        if rng.next_float() < snow_chance {
            return SurfaceTexture::Snow;
        }
    }

    if slope > bands.rock_slope {
        return SurfaceTexture::Rock(shape.rock_texture);
    }
    if slope > bands.dirt_slope {
        return SurfaceTexture::Dirt(shape.dirt_texture);
    }
    SurfaceTexture::Grass(shape.grass_texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::biome::Biome;

    #[test]
    fn test_submerged_steep_is_rock() {
        let shape = Biome::Plains.shape();
        let bands = SurfaceBands::default();
        for height in [-0.5, -3.0, -10.0] {
            let a = pick_texture(&shape, &bands, height, 2.0);
            let b = pick_texture(&shape, &bands, height, 2.0);
            assert_eq!(a, SurfaceTexture::Rock("rock"));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_water_bands() {
        let shape = Biome::Hills.shape();
        let bands = SurfaceBands::default();
        assert_eq!(pick_texture(&shape, &bands, -4.0, 0.1), SurfaceTexture::WaterBottomAbsolute);
        assert_eq!(pick_texture(&shape, &bands, -1.0, 0.1), SurfaceTexture::WaterBottom);
        assert_eq!(pick_texture(&shape, &bands, 1.5, 0.9), SurfaceTexture::WaterBottom);
    }

    #[test]
    fn test_slope_bands() {
        let shape = Biome::Sand.shape();
        let bands = SurfaceBands::default();
        assert_eq!(pick_texture(&shape, &bands, 10.0, 0.1), SurfaceTexture::Grass("sand"));
        assert_eq!(pick_texture(&shape, &bands, 10.0, 0.8), SurfaceTexture::Dirt("sand"));
        assert_eq!(pick_texture(&shape, &bands, 10.0, 1.5), SurfaceTexture::Rock("sand_rock"));
    }

    #[test]
    fn test_snow_band() {
        let shape = Biome::HighMountains.shape();
        let bands = SurfaceBands::default();
        // Fully inside the snow band every draw succeeds
        assert_eq!(pick_texture(&shape, &bands, 120.0, 0.1), SurfaceTexture::Snow);
        // Below the band never snows
        assert_eq!(pick_texture(&shape, &bands, 59.0, 0.1), SurfaceTexture::Grass("grass"));

        let snowy = (0..200)
            .filter(|i| {
                pick_texture(&shape, &bands, 75.0 + *i as f32 * 0.01, 0.1) == SurfaceTexture::Snow
            })
            .count();
        assert!(snowy > 0 && snowy < 200);
    }

    #[test]
    fn test_texture_names() {
        assert_eq!(SurfaceTexture::Snow.name(), "snow");
        assert_eq!(SurfaceTexture::Dirt("dark_dirt").name(), "dark_dirt");
    }
}
