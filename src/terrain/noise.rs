//! Seeded 2D simplex noise
//!
//! The permutation table is shuffled once from the seed, so every value this
//! field produces is reproducible bit-for-bit across runs. Everything that is
//! deterministic upstream (heights, biomes, lake sites) rests on that.

use noise::NoiseFn;

use crate::core::rng::SimpleRng;

const PERM_SIZE: usize = 256;

const SQRT3: f64 = 1.732_050_807_568_877_2;
const F2: f64 = 0.5 * (SQRT3 - 1.0);
const G2: f64 = (3.0 - SQRT3) / 6.0;

/// Scales the summed corner contributions to roughly [-1, 1]
const OUTPUT_SCALE: f64 = 70.0;

const GRAD2: [[f64; 2]; 12] = [
    [1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0],
    [1.0, 0.0], [-1.0, 0.0], [1.0, 0.0], [-1.0, 0.0],
    [0.0, 1.0], [0.0, -1.0], [0.0, 1.0], [0.0, -1.0],
];

/// Deterministic 2D coherent noise
#[derive(Clone)]
pub struct NoiseField {
    seed: i64,
    perm: [u8; PERM_SIZE * 2],
}

impl NoiseField {
    pub fn new(seed: i64) -> Self {
        let mut source = [0u8; PERM_SIZE];
        for (i, slot) in source.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates from the top down
        let mut rng = SimpleRng::from_seed(seed);
        for i in (1..PERM_SIZE).rev() {
            let r = rng.next_below(i as u32 + 1) as usize;
            source.swap(i, r);
        }

        let mut perm = [0u8; PERM_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = source[i & (PERM_SIZE - 1)];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Sample the field. Output lies in approximately [-1, 1].
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        // Skew into the triangular lattice
        let s = (x + y) * F2;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;

        let t = (i + j) as f64 * G2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        // Lower or upper triangle of the cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i & (PERM_SIZE as i64 - 1)) as usize;
        let jj = (j & (PERM_SIZE as i64 - 1)) as usize;

        let n0 = self.corner(ii, jj, x0, y0);
        let n1 = self.corner(ii + i1, jj + j1, x1, y1);
        let n2 = self.corner(ii + 1, jj + 1, x2, y2);

        OUTPUT_SCALE * (n0 + n1 + n2)
    }

    /// Octave sum normalized by total amplitude, clamped to [-1, 1]
    pub fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        for _ in 0..octaves.max(1) {
            sum += self.eval(x * frequency, y * frequency) * amplitude;
            total += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        (sum / total).clamp(-1.0, 1.0)
    }

    fn corner(&self, i: usize, j: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let gi = self.perm[i + self.perm[j] as usize] as usize % 12;
        let grad = GRAD2[gi][0] * x + GRAD2[gi][1] * y;
        let t2 = t * t;
        t2 * t2 * grad
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.eval(point[0], point[1])
    }
}
