//! Feature spawners: stateless descriptors that turn a cell into a feature

use std::fmt;

use glam::Vec3;

use super::cactus::Cactus;
use super::flower::{Flower, FlowerSpecies};
use super::grass::{Grass, GrassTint, DEAD_GRASS};
use super::lake::Lake;
use super::tree::{Tree, TreeSpecies};
use super::{Feature, FeatureKind};

/// One kind of decoration a biome can scatter.
///
/// Equality is by variant and sub-parameters, which is what makes a biome's
/// spawner list a keyed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSpawner {
    Tree(TreeSpecies),
    /// Leafless oak
    DeadTree,
    /// Textured grass using the named texture
    Grass(&'static str),
    DeadGrass,
    Flower(FlowerSpecies),
    Cactus,
    Lake,
}

impl FeatureSpawner {
    /// Build the feature for a world position. Pure in all four inputs.
    pub fn spawn(&self, x: f32, y: f32, z: f32, seed: i64) -> Feature {
        let kind = match *self {
            FeatureSpawner::Tree(species) => {
                FeatureKind::Tree(Tree::new(x, y, z, species, true, seed))
            }
            FeatureSpawner::DeadTree => {
                FeatureKind::Tree(Tree::new(x, y, z, TreeSpecies::Oak, false, seed))
            }
            FeatureSpawner::Grass(texture) => {
                FeatureKind::Grass(Grass::new(x, y, z, GrassTint::Textured(texture), seed))
            }
            FeatureSpawner::DeadGrass => FeatureKind::Grass(Grass::new(x, y, z, DEAD_GRASS, seed)),
            FeatureSpawner::Flower(species) => {
                FeatureKind::Flower(Flower::new(x, y, z, species, seed))
            }
            FeatureSpawner::Cactus => FeatureKind::Cactus(Cactus::new(x, y, z, seed)),
            FeatureSpawner::Lake => FeatureKind::Lake(Lake::new(x, y, z, seed)),
        };
        Feature::new(Vec3::new(x, y, z), kind)
    }

    pub fn is_lake(&self) -> bool {
        matches!(self, FeatureSpawner::Lake)
    }

    /// Trees obey the tree elevation ceiling during scattering
    pub fn is_tree(&self) -> bool {
        matches!(self, FeatureSpawner::Tree(_) | FeatureSpawner::DeadTree)
    }
}

impl fmt::Display for FeatureSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSpawner::Tree(species) => write!(f, "tree:{}", species.name()),
            FeatureSpawner::DeadTree => write!(f, "dead_tree"),
            FeatureSpawner::Grass(texture) => write!(f, "grass:{}", texture),
            FeatureSpawner::DeadGrass => write!(f, "dead_grass"),
            FeatureSpawner::Flower(species) => write!(f, "flower:{}", species.name()),
            FeatureSpawner::Cactus => write!(f, "cactus"),
            FeatureSpawner::Lake => write!(f, "lake"),
        }
    }
}
