//! Small flowers: stem, two leaves and a ring of petals

use crate::core::rng::{hash_seed, SimpleRng};

pub const PETAL_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowerSpecies {
    Rose,
    Tulip,
    Daisy,
}

impl FlowerSpecies {
    /// Petal color as RGB
    pub fn color(self) -> [f32; 3] {
        match self {
            FlowerSpecies::Rose => [0.4, 0.1, 1.0],
            FlowerSpecies::Tulip => [0.5, 1.0, 0.5],
            FlowerSpecies::Daisy => [0.5, 1.0, 1.0],
        }
    }

    /// Stem height in world units
    pub fn height(self) -> f32 {
        match self {
            FlowerSpecies::Rose => 0.3,
            FlowerSpecies::Tulip => 0.25,
            FlowerSpecies::Daisy => 0.2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlowerSpecies::Rose => "rose",
            FlowerSpecies::Tulip => "tulip",
            FlowerSpecies::Daisy => "daisy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    pub species: FlowerSpecies,
    /// Per-petal jitter in degrees, added to the even 60 degree spacing
    pub petal_angles: [f32; PETAL_COUNT],
    pub petal_scales: [f32; PETAL_COUNT],
    /// Degrees around the stem
    pub leaf_angles: [f32; 2],
    pub leaf_sizes: [f32; 2],
}

impl Flower {
    pub fn new(x: f32, y: f32, z: f32, species: FlowerSpecies, seed: i64) -> Self {
        let mut rng = SimpleRng::from_seed(hash_seed(x, y, z, seed));

        let mut petal_angles = [0.0; PETAL_COUNT];
        let mut petal_scales = [0.0; PETAL_COUNT];
        for i in 0..PETAL_COUNT {
            petal_angles[i] = rng.next_float() * 15.0 - 7.5;
            petal_scales[i] = 0.9 + rng.next_float() * 0.2;
        }

        let leaf_angles = [rng.next_float() * 360.0, rng.next_float() * 360.0];
        let leaf_sizes = [0.1 + rng.next_float() * 0.05, 0.1 + rng.next_float() * 0.05];

        Self {
            species,
            petal_angles,
            petal_scales,
            leaf_angles,
            leaf_sizes,
        }
    }
}
