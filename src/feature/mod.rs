//! Decorative features placed on chunk cells
//!
//! [`Feature`] is a closed set of variants so the chunk pipeline and any
//! renderer can match on the kind exhaustively.

pub mod cactus;
pub mod flower;
pub mod grass;
pub mod lake;
pub mod spawner;
pub mod tree;

pub use cactus::{Cactus, CactusSegment};
pub use flower::{Flower, FlowerSpecies};
pub use grass::{Grass, GrassTint, GrassVertex};
pub use lake::Lake;
pub use spawner::FeatureSpawner;
pub use tree::{Branch, BranchArena, BranchId, BranchKind, Tree, TreeParams, TreeSpecies, TreeStyle};

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureKind {
    Tree(Tree),
    Grass(Grass),
    Flower(Flower),
    Cactus(Cactus),
    Lake(Lake),
}

/// Blob shadow a renderer may project for a feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowHint {
    pub radius: f32,
    pub height: f32,
}

/// A placed decoration. `position` is the base in world space; for lakes
/// the y component is the water surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub position: Vec3,
    pub kind: FeatureKind,
}

impl Feature {
    pub fn new(position: Vec3, kind: FeatureKind) -> Self {
        Self { position, kind }
    }

    pub fn is_lake(&self) -> bool {
        matches!(self.kind, FeatureKind::Lake(_))
    }

    pub fn as_lake(&self) -> Option<&Lake> {
        match &self.kind {
            FeatureKind::Lake(lake) => Some(lake),
            _ => None,
        }
    }

    pub fn as_grass(&self) -> Option<&Grass> {
        match &self.kind {
            FeatureKind::Grass(grass) => Some(grass),
            _ => None,
        }
    }

    pub fn shadow(&self) -> Option<ShadowHint> {
        let (radius, height) = match &self.kind {
            FeatureKind::Cactus(cactus) => (0.6, cactus.max_height),
            FeatureKind::Flower(flower) => (0.25, flower.species.height()),
            FeatureKind::Grass(_) => {
                (0.5, grass::BLADE_BASE_HEIGHT + grass::BLADE_HEIGHT_VARIATION)
            }
            FeatureKind::Tree(_) | FeatureKind::Lake(_) => return None,
        };
        Some(ShadowHint { radius, height })
    }

    /// Whether a world point is inside this feature's solid volume.
    /// Only tree trunks block movement.
    pub fn collides_with(&self, point: Vec3) -> bool {
        match &self.kind {
            FeatureKind::Tree(tree) => {
                let d = point - self.position;
                tree.collides_with_offset(d.x, d.y, d.z)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_hints() {
        let cactus = FeatureSpawner::Cactus.spawn(0.0, 0.0, 0.0, 1);
        let hint = cactus.shadow().unwrap();
        assert_eq!(hint.radius, 0.6);

        let grass = FeatureSpawner::DeadGrass.spawn(0.0, 0.0, 0.0, 1);
        assert!((grass.shadow().unwrap().height - 1.8).abs() < 1e-5);

        assert!(FeatureSpawner::Lake.spawn(0.0, 0.0, 0.0, 1).shadow().is_none());
        assert!(FeatureSpawner::DeadTree.spawn(0.0, 0.0, 0.0, 1).shadow().is_none());
    }

    #[test]
    fn test_tree_collision_uses_position() {
        let tree = FeatureSpawner::Tree(TreeSpecies::GiantOak).spawn(100.0, 5.0, 100.0, 9);
        assert!(tree.collides_with(Vec3::new(101.0, 6.0, 100.0)));
        assert!(!tree.collides_with(Vec3::new(110.0, 6.0, 100.0)));

        let flower = FeatureSpawner::Flower(FlowerSpecies::Rose).spawn(0.0, 0.0, 0.0, 9);
        assert!(!flower.collides_with(Vec3::ZERO));
    }

    #[test]
    fn test_lake_accessors() {
        let lake = FeatureSpawner::Lake.spawn(0.0, 0.0, 0.0, 1);
        assert!(lake.is_lake());
        assert!(lake.as_lake().is_some());
        assert!(lake.as_grass().is_none());
    }
}
