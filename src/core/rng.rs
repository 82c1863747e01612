//! Deterministic hashing and random streams for procedural placement
//!
//! Every feature, lake and chunk scatter pass derives its own generator from
//! [`hash_seed`], so regenerating the same cell always yields the same result.

/// Fold a world position and the global seed into a 64-bit feature seed.
///
/// Coordinates are quantized to thousandths and truncated to `i32`
/// (saturating for very large inputs) before hashing.
pub fn hash_seed(x: f32, y: f32, z: f32, global_seed: i64) -> i64 {
    let ix = (x * 1000.0) as i32;
    let iy = (y * 1000.0) as i32;
    let iz = (z * 1000.0) as i32;

    let mut hash: i64 = 1_125_899_906_842_597;
    hash = hash.wrapping_mul(31).wrapping_add(ix as i64);
    hash = hash.wrapping_mul(31).wrapping_add(iy as i64);
    hash = hash.wrapping_mul(31).wrapping_add(iz as i64);

    hash ^ global_seed
}

/// Small PCG-style generator used for all seeded scattering
#[derive(Clone, Debug)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// Seed from a signed hash as produced by [`hash_seed`]
    pub fn from_seed(seed: i64) -> Self {
        Self::new(seed as u64)
    }

    /// Advance state and return next u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let mut h = (self.state >> 32) as u32;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h
    }

    /// Uniform f32 in [0, 1)
    pub fn next_float(&mut self) -> f32 {
        // 24 mantissa bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform f32 in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }

    /// Uniform integer in [0, bound). Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }

    /// Bernoulli trial with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_float() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_seed_is_pure() {
        let a = hash_seed(12.5, 3.25, -7.0, 1234);
        let b = hash_seed(12.5, 3.25, -7.0, 1234);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_seed_depends_on_every_input() {
        let base = hash_seed(1.0, 2.0, 3.0, 99);
        assert_ne!(base, hash_seed(1.5, 2.0, 3.0, 99));
        assert_ne!(base, hash_seed(1.0, 2.5, 3.0, 99));
        assert_ne!(base, hash_seed(1.0, 2.0, 3.5, 99));
        assert_ne!(base, hash_seed(1.0, 2.0, 3.0, 100));
    }

    #[test]
    fn test_hash_seed_known_value() {
        // ((p*31 + 0)*31 + 0)*31 + 0 with p the starting prime, seed 0
        let expected = 1_125_899_906_842_597i64
            .wrapping_mul(31)
            .wrapping_mul(31)
            .wrapping_mul(31);
        assert_eq!(hash_seed(0.0, 0.0, 0.0, 0), expected);
    }

    #[test]
    fn test_hash_seed_saturates_large_coordinates() {
        // Both quantize to i32::MAX
        assert_eq!(hash_seed(3.0e7, 0.0, 0.0, 1), hash_seed(4.0e7, 0.0, 0.0, 1));
    }

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::from_seed(-42);
        let mut b = SimpleRng::from_seed(-42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_next_float_range() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_float();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_below_bounds() {
        let mut rng = SimpleRng::new(3);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = rng.next_below(5);
            assert!(v < 5);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.next_below(0), 0);
    }
}
