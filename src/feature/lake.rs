//! Lakes: wobbly elliptical basins
//!
//! A lake only carries its shape. The water surface height is decided by the
//! carver once it knows the terrain under the whole footprint.

use std::f32::consts::TAU;

use crate::core::rng::{hash_seed, SimpleRng};

pub const SHAPE_SLICES: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct Lake {
    pub radius_x: f32,
    pub radius_z: f32,
    pub depth: f32,
    /// Spawn height minus depth
    pub base_height: f32,
    /// Radius multiplier per angular slice
    pub shape_offsets: [f32; SHAPE_SLICES],
}

impl Lake {
    pub fn new(x: f32, y: f32, z: f32, seed: i64) -> Self {
        let mut rng = SimpleRng::from_seed(hash_seed(x, y, z, seed));

        let radius_x = 5.0 + rng.next_float() * 35.0;
        let radius_z = 5.0 + rng.next_float() * 35.0;
        let depth = 1.5 + rng.next_float() * 3.5;

        let mut shape_offsets = [0.0; SHAPE_SLICES];
        for offset in shape_offsets.iter_mut() {
            *offset = 0.9 + rng.next_float() * 0.2;
        }

        Self {
            radius_x,
            radius_z,
            depth,
            base_height: y - depth,
            shape_offsets,
        }
    }

    /// Radius multiplier for a direction given in radians (any range)
    pub fn shape_offset(&self, angle: f32) -> f32 {
        let normalized = angle.rem_euclid(TAU);
        let slice = TAU / SHAPE_SLICES as f32;
        let index = (normalized / slice) as usize % SHAPE_SLICES;
        self.shape_offsets[index]
    }

    /// Normalized elliptical distance of an offset from the center, with the
    /// per-direction wobble applied. Values below 1 are inside the basin.
    pub fn wobbled_distance(&self, dx: f32, dz: f32) -> f32 {
        let offset = self.shape_offset(dz.atan2(dx));
        let rx = self.radius_x * offset;
        let rz = self.radius_z * offset;
        (dx * dx) / (rx * rx) + (dz * dz) / (rz * rz)
    }

    /// How far the bed sits below the surface at a given normalized distance
    pub fn drop_at(&self, distance: f32) -> f32 {
        let falloff = 1.0 - distance.sqrt();
        self.depth * falloff.max(0.0).powf(1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lake_dimensions() {
        for i in 0..50 {
            let lake = Lake::new(i as f32 * 3.0, 10.0, 0.0, 1234);
            assert!((5.0..=40.0).contains(&lake.radius_x));
            assert!((5.0..=40.0).contains(&lake.radius_z));
            assert!((1.5..=5.0).contains(&lake.depth));
            assert!((lake.base_height - (10.0 - lake.depth)).abs() < 1e-5);
            assert!(lake.shape_offsets.iter().all(|o| (0.9..=1.1).contains(o)));
        }
    }

    #[test]
    fn test_shape_offset_wraps() {
        let lake = Lake::new(0.0, 0.0, 0.0, 1);
        assert_eq!(lake.shape_offset(0.0), lake.shape_offsets[0]);
        assert_eq!(lake.shape_offset(TAU + 0.01), lake.shape_offsets[0]);
        assert_eq!(lake.shape_offset(-0.01), lake.shape_offsets[SHAPE_SLICES - 1]);
        let mid_slice = TAU / SHAPE_SLICES as f32 * 10.5;
        assert_eq!(lake.shape_offset(mid_slice), lake.shape_offsets[10]);
    }

    #[test]
    fn test_drop_profile() {
        let lake = Lake::new(0.0, 0.0, 0.0, 2);
        assert!((lake.drop_at(0.0) - lake.depth).abs() < 1e-6);
        assert_eq!(lake.drop_at(1.0), 0.0);
        assert!(lake.drop_at(0.25) > lake.drop_at(0.5));
    }

    #[test]
    fn test_center_is_inside() {
        let lake = Lake::new(0.0, 0.0, 0.0, 3);
        assert!(lake.wobbled_distance(0.0, 0.0) < 1.0);
        assert!(lake.wobbled_distance(lake.radius_x * 1.2, 0.0) > 1.0);
    }
}
