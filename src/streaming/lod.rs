//! Level of Detail (LOD) for terrain meshes
//!
//! A chunk's LOD decides the grid stride its mesh is built with. Each level
//! doubles the stride, so LOD 3 samples every 8th height. The height grid
//! itself is always generated at full resolution.

use serde::{Deserialize, Serialize};

use crate::world::CHUNK_SIZE;

/// Maximum LOD level
pub const MAX_LOD: u32 = 3;

/// Default chunk-distance thresholds for LOD 1, 2 and 3
pub const LOD_DISTANCES: [i32; MAX_LOD as usize] = [5, 10, 15];

/// Configuration for LOD behavior
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// When false every chunk is built at LOD 0
    pub enabled: bool,
    /// Chebyshev chunk distance at which each coarser level starts
    pub distances: [i32; MAX_LOD as usize],
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            distances: LOD_DISTANCES,
        }
    }
}

impl LodConfig {
    /// LOD level for a chunk `distance` chunks away from the viewer
    pub fn lod_for_distance(&self, distance: i32) -> u32 {
        if !self.enabled {
            return 0;
        }
        lod_from_distance(&self.distances, distance)
    }
}

/// Calculate LOD level from a chunk distance and ascending thresholds
///
/// # Examples
/// ```
/// use terrastream::streaming::lod::{lod_from_distance, LOD_DISTANCES};
///
/// assert_eq!(lod_from_distance(&LOD_DISTANCES, 0), 0);
/// assert_eq!(lod_from_distance(&LOD_DISTANCES, 5), 1);
/// assert_eq!(lod_from_distance(&LOD_DISTANCES, 12), 2);
/// assert_eq!(lod_from_distance(&LOD_DISTANCES, 400), 3);
/// ```
pub fn lod_from_distance(distances: &[i32], distance: i32) -> u32 {
    distances.iter().take_while(|&&d| distance >= d).count() as u32
}

/// Grid stride of a mesh built at `lod`
///
/// # Examples
/// ```
/// use terrastream::streaming::lod::stride_for_lod;
///
/// assert_eq!(stride_for_lod(0), 1);
/// assert_eq!(stride_for_lod(2), 4);
/// assert_eq!(stride_for_lod(30), 64); // Never coarser than one cell per chunk
/// ```
pub fn stride_for_lod(lod: u32) -> usize {
    1usize.checked_shl(lod).unwrap_or(CHUNK_SIZE).min(CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_always_full_detail() {
        let config = LodConfig::default();
        assert!(!config.enabled);
        for d in [0, 5, 100] {
            assert_eq!(config.lod_for_distance(d), 0);
        }
    }

    #[test]
    fn test_enabled_thresholds() {
        let config = LodConfig { enabled: true, ..Default::default() };
        assert_eq!(config.lod_for_distance(4), 0);
        assert_eq!(config.lod_for_distance(5), 1);
        assert_eq!(config.lod_for_distance(9), 1);
        assert_eq!(config.lod_for_distance(10), 2);
        assert_eq!(config.lod_for_distance(15), MAX_LOD);
    }

    #[test]
    fn test_stride_divides_chunk() {
        for lod in 0..=MAX_LOD {
            assert_eq!(CHUNK_SIZE % stride_for_lod(lod), 0);
        }
    }

    #[test]
    fn test_lod_config_serde() {
        let config = LodConfig { enabled: true, distances: [2, 4, 8] };
        let json = serde_json::to_string(&config).unwrap();
        let back: LodConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
