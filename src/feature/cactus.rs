//! Desert cacti: a trunk with a few arms, some of which fork

use crate::core::rng::{hash_seed, SimpleRng};

/// One cylinder of a cactus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CactusSegment {
    pub height: f32,
    pub radius: f32,
    /// Height of the segment base above the cactus root
    pub offset_y: f32,
    /// Heading around the trunk in degrees. Zero means upright.
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cactus {
    /// Trunk first, then arms each followed by their optional split
    pub segments: Vec<CactusSegment>,
    pub max_height: f32,
}

impl Cactus {
    pub fn new(x: f32, y: f32, z: f32, seed: i64) -> Self {
        let mut rng = SimpleRng::from_seed(hash_seed(x, y, z, seed));

        let height = 2.5 + rng.next_float() * 2.5;
        let mut segments = vec![CactusSegment {
            height,
            radius: 0.3,
            offset_y: 0.0,
            angle: 0.0,
        }];

        let arms = 1 + rng.next_below(3);
        for _ in 0..arms {
            let arm_height = 1.0 + rng.next_float() * 0.8;
            let offset_y = 0.7 + rng.next_float() * (height - 1.5);
            let angle = rng.next_float() * 360.0;
            segments.push(CactusSegment {
                height: arm_height,
                radius: 0.15,
                offset_y,
                angle,
            });

            if rng.chance(0.5) {
                segments.push(CactusSegment {
                    height: 0.5 + rng.next_float() * 0.5,
                    radius: 0.1,
                    offset_y: offset_y + arm_height * 0.5,
                    angle: angle + rng.next_float() * 60.0 - 30.0,
                });
            }
        }

        let max_height = segments
            .iter()
            .map(|s| s.offset_y + s.height)
            .fold(0.0, f32::max);

        Self { segments, max_height }
    }

    pub fn arm_count(&self) -> usize {
        self.segments.iter().filter(|s| s.radius == 0.15).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunk_first() {
        let cactus = Cactus::new(10.0, 2.0, 10.0, 5);
        let trunk = cactus.segments[0];
        assert_eq!(trunk.radius, 0.3);
        assert_eq!(trunk.offset_y, 0.0);
        assert!((2.5..=5.0).contains(&trunk.height));
    }

    #[test]
    fn test_arm_count_and_max_height() {
        for i in 0..50 {
            let cactus = Cactus::new(i as f32, 0.0, 0.0, 9);
            let arms = cactus.arm_count();
            assert!((1..=3).contains(&arms));
            assert!(cactus.segments.len() <= 1 + arms * 2);
            let tallest = cactus
                .segments
                .iter()
                .map(|s| s.offset_y + s.height)
                .fold(0.0, f32::max);
            assert_eq!(cactus.max_height, tallest);
            assert!(cactus.max_height >= cactus.segments[0].height);
        }
    }
}
