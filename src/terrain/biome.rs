//! Biome catalog: terrain shape, surface textures and decoration lists

use std::collections::HashSet;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::feature::{FeatureSpawner, FlowerSpecies, TreeSpecies};

/// Default scale applied to every per-cell spawn probability
pub const DEFAULT_FEATURE_MULTIPLIER: f32 = 0.25;

/// Biome types, in catalog order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Plains,
    Hills,
    Sand,
    Mountains,
    HighMountains,
    DeadForest,
    Bloom,
    BigTrees,
    Prehistoric,
    Swamp,
    SpruceForest,
}

/// Terrain shape and surfacing for one biome
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeShape {
    /// Position on the [0, 1] biome-noise axis this biome is centered on
    pub center: f32,
    /// Horizontal frequency of the height noise
    pub frequency: f32,
    /// Height swing above and below `base_height`
    pub amplitude: f32,
    pub base_height: f32,
    pub grass_texture: &'static str,
    pub dirt_texture: &'static str,
    pub rock_texture: &'static str,
    /// Relative weight during biome selection
    pub spawn_chance: f32,
    /// Width of the blend falloff around `center`
    pub blend_radius: f32,
}

impl BiomeShape {
    /// Lowest and highest heights the height formula can produce
    pub fn height_envelope(&self) -> (f32, f32) {
        (self.base_height - self.amplitude, self.base_height + self.amplitude)
    }
}

#[allow(clippy::too_many_arguments)]
const fn biome_shape(
    center: f32,
    frequency: f32,
    amplitude: f32,
    base_height: f32,
    grass_texture: &'static str,
    dirt_texture: &'static str,
    rock_texture: &'static str,
    spawn_chance: f32,
) -> BiomeShape {
    BiomeShape {
        center,
        frequency,
        amplitude,
        base_height,
        grass_texture,
        dirt_texture,
        rock_texture,
        spawn_chance,
        blend_radius: 0.25,
    }
}

impl Biome {
    pub const ALL: [Biome; 11] = [
        Biome::Plains,
        Biome::Hills,
        Biome::Sand,
        Biome::Mountains,
        Biome::HighMountains,
        Biome::DeadForest,
        Biome::Bloom,
        Biome::BigTrees,
        Biome::Prehistoric,
        Biome::Swamp,
        Biome::SpruceForest,
    ];

    pub const fn shape(self) -> BiomeShape {
        match self {
            Biome::Plains => biome_shape(0.20, 0.005, 100.0, 30.0, "grass", "dirt", "rock", 0.15),
            Biome::Hills => biome_shape(0.50, 0.01, 25.0, 15.0, "grass", "dirt", "rock", 0.25),
            Biome::Sand => biome_shape(0.40, 0.03, 10.0, 5.0, "sand", "sand", "sand_rock", 0.12),
            Biome::Mountains => biome_shape(0.75, 0.02, 35.0, 40.0, "grass", "dirt", "rock", 0.2),
            Biome::HighMountains => {
                biome_shape(0.90, 0.03, 70.0, 70.0, "grass", "dirt", "rock", 0.035)
            }
            Biome::DeadForest => {
                biome_shape(0.1, 0.01, 1.0, 7.0, "dead_grass", "dark_dirt", "dark_rock", 0.05)
            }
            Biome::Bloom => {
                biome_shape(0.2, 0.01, 7.0, 5.0, "bloom_grass", "bloom_dirt", "gold_ore_rock", 0.2)
            }
            Biome::BigTrees => biome_shape(0.35, 0.01, 4.0, 2.0, "dark_grass", "dirt", "rock", 0.1),
            Biome::Prehistoric => {
                biome_shape(0.37, 0.005, 150.0, 5.0, "prehistoric_grass", "dark_dirt", "rock", 0.15)
            }
            Biome::Swamp => biome_shape(0.01, 0.01, 3.0, 2.0, "swamp_grass", "dirt", "rock", 0.15),
            Biome::SpruceForest => {
                biome_shape(0.6, 0.008, 18.0, 10.0, "dark_grass", "dirt", "rock", 0.2)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Plains => "plains",
            Biome::Hills => "hills",
            Biome::Sand => "sand",
            Biome::Mountains => "mountains",
            Biome::HighMountains => "high_mountains",
            Biome::DeadForest => "dead_forest",
            Biome::Bloom => "bloom",
            Biome::BigTrees => "big_trees",
            Biome::Prehistoric => "prehistoric",
            Biome::Swamp => "swamp",
            Biome::SpruceForest => "spruce_forest",
        }
    }

    /// Declared decoration list with unscaled per-cell probabilities.
    ///
    /// Order matters: scattering stops at the first spawner whose trial
    /// succeeds, so earlier entries win ties.
    pub fn feature_list(self) -> Vec<(FeatureSpawner, f32)> {
        use FeatureSpawner as S;
        use FlowerSpecies as F;
        use TreeSpecies as T;

        let grass = S::Grass(self.shape().grass_texture);
        match self {
            Biome::Plains => vec![
                (S::Tree(T::Birch), 0.006),
                (S::Tree(T::Oak), 0.001),
                (S::Tree(T::GiantOak), 0.0001),
                (S::Tree(T::Bush), 0.003),
                (S::Tree(T::RedBerryBush), 0.001),
                (grass, 0.4),
                (S::Flower(F::Rose), 0.01),
                (S::Flower(F::Tulip), 0.008),
                (S::Lake, 0.001),
            ],
            Biome::Hills => vec![
                (S::Tree(T::Oak), 0.008),
                (S::Tree(T::Birch), 0.001),
                (S::Tree(T::Bush), 0.0015),
                (S::Tree(T::RedBerryBush), 0.0005),
                (grass, 0.4),
                (S::Flower(F::Daisy), 0.007),
            ],
            Biome::Sand => vec![(S::Cactus, 0.02)],
            Biome::Mountains => vec![
                (grass, 0.4),
                (S::Tree(T::Oak), 0.004),
                (S::Tree(T::Bush), 0.0015),
                (S::Flower(F::Tulip), 0.008),
            ],
            Biome::HighMountains => vec![
                (grass, 0.4),
                (S::Tree(T::Bush), 0.003),
                (S::Tree(T::RedBerryBush), 0.001),
                (S::Flower(F::Tulip), 0.008),
            ],
            Biome::DeadForest => vec![(S::DeadTree, 0.007), (grass, 0.4)],
            Biome::Bloom => vec![
                (S::Tree(T::Blossom), 0.008),
                (S::Tree(T::GoliathBlossom), 0.00001),
                (S::Tree(T::BloomingBush), 0.01),
                (S::Flower(F::Tulip), 0.2),
                (S::Flower(F::Daisy), 0.2),
                (S::Flower(F::Rose), 0.2),
                (grass, 0.4),
                (S::Lake, 0.0005),
            ],
            Biome::BigTrees => vec![
                (S::Tree(T::GiantOak), 0.005),
                (S::Flower(F::Tulip), 0.1),
                (S::Flower(F::Daisy), 0.1),
                (S::Flower(F::Rose), 0.1),
                (grass, 0.4),
                (S::Lake, 0.0005),
            ],
            Biome::Prehistoric => vec![
                (S::Tree(T::GiantOak), 0.005),
                (grass, 0.4),
                (S::Lake, 0.01),
                (S::Flower(F::Tulip), 0.008),
            ],
            Biome::Swamp => vec![
                (S::Tree(T::SwampTree), 0.08),
                (grass, 0.4),
                (S::Lake, 0.2),
            ],
            Biome::SpruceForest => vec![
                (S::Tree(T::Spruce), 0.01),
                (S::Tree(T::Bush), 0.002),
                (grass, 0.1),
                (S::Flower(F::Daisy), 0.01),
                (S::Lake, 0.001),
            ],
        }
    }
}

/// A biome together with its scaled decoration list
#[derive(Clone, Debug)]
pub struct BiomeEntry {
    pub biome: Biome,
    pub shape: BiomeShape,
    features: Vec<(FeatureSpawner, f32)>,
}

impl BiomeEntry {
    /// Build an entry, scaling each probability by `multiplier`.
    /// Fails if a spawner appears twice.
    pub fn new(
        biome: Biome,
        shape: BiomeShape,
        features: Vec<(FeatureSpawner, f32)>,
        multiplier: f32,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for (spawner, _) in &features {
            if !seen.insert(*spawner) {
                return Err(Error::DuplicateSpawner {
                    biome: biome.name().to_string(),
                    spawner: spawner.to_string(),
                });
            }
        }

        let features = features.into_iter().map(|(s, p)| (s, p * multiplier)).collect();
        Ok(Self { biome, shape, features })
    }

    /// Spawners with their scaled per-cell probability, in declared order
    pub fn features(&self) -> &[(FeatureSpawner, f32)] {
        &self.features
    }

    pub fn probability(&self, spawner: &FeatureSpawner) -> Option<f32> {
        self.features.iter().find(|(s, _)| s == spawner).map(|&(_, p)| p)
    }

    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }
}

/// Immutable catalog of biomes, built once before any chunk is generated
#[derive(Clone, Debug)]
pub struct BiomeTable {
    entries: Vec<BiomeEntry>,
    total_spawn_chance: f64,
}

impl BiomeTable {
    pub fn new(entries: Vec<BiomeEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyBiomeTable);
        }
        let total_spawn_chance = entries.iter().map(|e| e.shape.spawn_chance as f64).sum();
        Ok(Self {
            entries,
            total_spawn_chance,
        })
    }

    /// The full built-in catalog with every probability scaled by `multiplier`
    pub fn standard(multiplier: f32) -> Result<Self> {
        let entries = Biome::ALL
            .iter()
            .map(|&b| BiomeEntry::new(b, b.shape(), b.feature_list(), multiplier))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[BiomeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_spawn_chance(&self) -> f64 {
        self.total_spawn_chance
    }

    /// Entry for `biome`, or the last entry if the table does not contain it
    pub fn entry(&self, biome: Biome) -> &BiomeEntry {
        self.entries
            .iter()
            .find(|e| e.biome == biome)
            .unwrap_or_else(|| self.last())
    }

    /// Fallback used when a weighted walk runs off the end
    pub fn last(&self) -> &BiomeEntry {
        // Construction rejects empty tables
        &self.entries[self.entries.len() - 1]
    }

    /// Walk entries accumulating spawn chance; first entry whose running sum
    /// reaches `threshold` wins, the last entry otherwise.
    pub fn walk_weights(&self, threshold: f64) -> Biome {
        let mut sum = 0.0;
        for entry in &self.entries {
            sum += entry.shape.spawn_chance as f64;
            if threshold <= sum {
                return entry.biome;
            }
        }
        self.last().biome
    }
}
