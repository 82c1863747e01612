//! Procedural trees and bushes
//!
//! Trees are stored as a flat branch arena: each branch lists its children by
//! index, so an instance can be cloned and edited without touching the shared
//! spruce templates it may have been copied from.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::rng::{hash_seed, SimpleRng};

/// Tree visual style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeStyle {
    /// Randomized recursive branching
    #[default]
    Branching,
    /// Fixed conifer topology shared by every instance of a species
    Spruce,
}

/// Shape parameters for one tree species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub trunk_texture: &'static str,
    pub leaf_texture: &'static str,
    pub min_height: f32,
    pub max_height: f32,
    /// Trunk thickness at the base
    pub base_thickness: f32,
    /// Leaf blob size; for spruces, the length of the lowest side branches
    pub leaf_size: f32,
    pub min_branch_count: u32,
    pub max_branch_count: u32,
    pub max_branch_depth: u32,
    /// Scales the random lean applied to trunk segments
    pub trunk_curve: f32,
    pub leaf_cluster_size: u32,
    /// Zero means a trunkless bush
    pub trunk_segments: u32,
    pub style: TreeStyle,
}

/// Tree species catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    Oak,
    Birch,
    Jungle,
    Blossom,
    GoliathBlossom,
    GiantOak,
    RedBerryBush,
    Bush,
    BloomingBush,
    SwampTree,
    Spruce,
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 11] = [
        TreeSpecies::Oak,
        TreeSpecies::Birch,
        TreeSpecies::Jungle,
        TreeSpecies::Blossom,
        TreeSpecies::GoliathBlossom,
        TreeSpecies::GiantOak,
        TreeSpecies::RedBerryBush,
        TreeSpecies::Bush,
        TreeSpecies::BloomingBush,
        TreeSpecies::SwampTree,
        TreeSpecies::Spruce,
    ];

    pub const fn params(self) -> TreeParams {
        match self {
            TreeSpecies::Oak => {
                species("bark_oak", "leaves_oak", 3.0, 7.0, 0.75, 2.5, 2, 4, 4, 30.0, 1, 1)
            }
            TreeSpecies::Birch => {
                species("bark_birch", "leaves_birch", 4.0, 6.0, 0.4, 2.0, 2, 3, 4, 25.0, 1, 1)
            }
            TreeSpecies::Jungle => {
                species("bark_jungle", "leaves_jungle", 6.0, 10.0, 0.8, 3.5, 3, 5, 5, 15.0, 2, 1)
            }
            TreeSpecies::Blossom => {
                species("bark_blossom", "leaves_blossom", 3.0, 6.0, 0.5, 2.8, 2, 4, 4, 20.0, 2, 1)
            }
            TreeSpecies::GoliathBlossom => {
                species(
                    "bark_blossom",
                    "leaves_blossom",
                    30.0,
                    70.0,
                    9.0,
                    20.0,
                    2,
                    2,
                    4,
                    20.0,
                    2,
                    3,
                )
            }
            TreeSpecies::GiantOak => {
                species("dark_bark", "leaves_oak", 15.0, 35.0, 4.0, 8.0, 2, 3, 4, 10.0, 2, 3)
            }
            TreeSpecies::RedBerryBush => {
                species("bark_oak", "leaves_red_berry", 0.5, 1.3, 0.2, 1.0, 3, 5, 4, 25.0, 1, 0)
            }
            TreeSpecies::Bush => {
                species("bark_oak", "leaves_bush", 0.5, 1.3, 0.2, 1.0, 3, 5, 4, 25.0, 1, 0)
            }
            TreeSpecies::BloomingBush => {
                species("bark_oak", "leaves_blooming_bush", 0.5, 0.7, 0.2, 1.0, 3, 5, 4, 25.0, 1, 0)
            }
            TreeSpecies::SwampTree => {
                species("dark_bark", "leaves_bush", 2.0, 5.0, 0.2, 1.0, 4, 4, 4, 25.0, 1, 1)
            }
            TreeSpecies::Spruce => TreeParams {
                style: TreeStyle::Spruce,
                ..species("bark_spruce", "leaves_spruce", 6.0, 12.0, 0.5, 2.5, 0, 0, 0, 0.0, 1, 6)
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TreeSpecies::Oak => "oak",
            TreeSpecies::Birch => "birch",
            TreeSpecies::Jungle => "jungle",
            TreeSpecies::Blossom => "blossom",
            TreeSpecies::GoliathBlossom => "goliath_blossom",
            TreeSpecies::GiantOak => "giant_oak",
            TreeSpecies::RedBerryBush => "red_berry_bush",
            TreeSpecies::Bush => "bush",
            TreeSpecies::BloomingBush => "blooming_bush",
            TreeSpecies::SwampTree => "swamp_tree",
            TreeSpecies::Spruce => "spruce",
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn species(
    trunk_texture: &'static str,
    leaf_texture: &'static str,
    min_height: f32,
    max_height: f32,
    base_thickness: f32,
    leaf_size: f32,
    min_branch_count: u32,
    max_branch_count: u32,
    max_branch_depth: u32,
    trunk_curve: f32,
    leaf_cluster_size: u32,
    trunk_segments: u32,
) -> TreeParams {
    TreeParams {
        trunk_texture,
        leaf_texture,
        min_height,
        max_height,
        base_thickness,
        leaf_size,
        min_branch_count,
        max_branch_count,
        max_branch_depth,
        trunk_curve,
        leaf_cluster_size,
        trunk_segments,
        style: TreeStyle::Branching,
    }
}

/// Index of a branch inside its [`BranchArena`]
pub type BranchId = usize;

/// What a node in the branch arena draws as
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchKind {
    Wood,
    /// Grouping node for a spruce crown
    LeafCluster,
    LeafRing { radius: f32 },
    /// Single leaf card rotated by the node's `rot_z`
    LeafPlane,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub kind: BranchKind,
    pub length: f32,
    pub thickness: f32,
    /// Degrees
    pub rot_x: f32,
    /// Degrees
    pub rot_z: f32,
    /// Lean away from the parent's axis when drawn
    pub outward_tilt: bool,
    pub children: Vec<BranchId>,
}

impl Branch {
    pub fn wood(length: f32, thickness: f32, rot_x: f32, rot_z: f32) -> Self {
        Self {
            kind: BranchKind::Wood,
            length,
            thickness,
            rot_x,
            rot_z,
            outward_tilt: false,
            children: Vec::new(),
        }
    }

    fn leaf(kind: BranchKind, rot_z: f32) -> Self {
        Self {
            kind,
            length: 0.0,
            thickness: 0.0,
            rot_x: 0.0,
            rot_z,
            outward_tilt: false,
            children: Vec::new(),
        }
    }

    fn tilted(mut self) -> Self {
        self.outward_tilt = true;
        self
    }
}

/// Flat storage for a branch hierarchy. The first branch pushed is the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchArena {
    branches: Vec<Branch>,
}

impl BranchArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, branch: Branch) -> BranchId {
        self.branches.push(branch);
        self.branches.len() - 1
    }

    /// Push `branch` and link it under `parent`
    pub fn attach(&mut self, parent: BranchId, branch: Branch) -> BranchId {
        let id = self.push(branch);
        self.branches[parent].children.push(id);
        id
    }

    pub fn root(&self) -> Option<&Branch> {
        self.branches.first()
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub fn get_mut(&mut self, id: BranchId) -> Option<&mut Branch> {
        self.branches.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }

    /// Deepest root-to-leaf chain, counting the root as depth 1
    pub fn depth(&self) -> usize {
        fn walk(arena: &BranchArena, id: BranchId) -> usize {
            1 + arena.branches[id]
                .children
                .iter()
                .map(|&c| walk(arena, c))
                .max()
                .unwrap_or(0)
        }
        if self.branches.is_empty() { 0 } else { walk(self, 0) }
    }
}

/// A generated tree instance
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub species: TreeSpecies,
    pub height: f32,
    pub has_leaves: bool,
    pub branches: BranchArena,
}

impl Tree {
    /// Generate a tree rooted at world position (x, y, z).
    pub fn new(x: f32, y: f32, z: f32, species: TreeSpecies, has_leaves: bool, seed: i64) -> Self {
        let params = species.params();
        let mut rng = SimpleRng::from_seed(hash_seed(x, y, z, seed));
        let height = params.min_height + rng.next_float() * (params.max_height - params.min_height);

        let branches = match params.style {
            TreeStyle::Spruce => spruce_instance(species, height),
            TreeStyle::Branching => grow_branching(&params, height, &mut rng),
        };

        Self {
            species,
            height,
            has_leaves,
            branches,
        }
    }

    pub fn params(&self) -> TreeParams {
        self.species.params()
    }

    /// Trunk collision against a point given relative to the tree base
    pub fn collides_with_offset(&self, dx: f32, dy: f32, dz: f32) -> bool {
        let params = self.params();
        let radius = params.base_thickness * 1.1;
        dx * dx + dz * dz < radius * radius && dy.abs() < params.max_height
    }
}

fn branch_count(params: &TreeParams, rng: &mut SimpleRng) -> u32 {
    let spread = params.max_branch_count.saturating_sub(params.min_branch_count);
    params.min_branch_count + rng.next_below(spread + 1)
}

fn grow_branching(params: &TreeParams, height: f32, rng: &mut SimpleRng) -> BranchArena {
    let mut arena = BranchArena::new();
    let thickness = params.base_thickness;

    if params.trunk_segments == 0 {
        let root = arena.push(Branch::wood(0.0, thickness, 0.0, 0.0));
        for _ in 0..branch_count(params, rng) {
            let length = height * (0.6 + rng.next_float() * 0.4);
            grow_branch(&mut arena, root, params, 1, length, thickness * 0.6, rng);
        }
        return arena;
    }

    let segments = params.trunk_segments;
    let segment_height = height / segments as f32;
    let tilt_x = (rng.next_float() * 2.0 - 1.0) * params.trunk_curve * 0.4;
    let tilt_z = (rng.next_float() * 2.0 - 1.0) * params.trunk_curve * 0.4;

    let mut current = arena.push(Branch::wood(segment_height, thickness, tilt_x, tilt_z));
    for i in 1..segments {
        let taper = 1.0 - (i as f32 / segments as f32) * 0.4;
        current = arena.attach(
            current,
            Branch::wood(segment_height, thickness * taper, tilt_x, tilt_z),
        );
    }

    for _ in 0..branch_count(params, rng) {
        let length = segment_height * (0.6 + rng.next_float() * 0.4);
        grow_branch(&mut arena, current, params, 1, length, thickness * 0.6, rng);
    }
    arena
}

fn grow_branch(
    arena: &mut BranchArena,
    parent: BranchId,
    params: &TreeParams,
    depth: u32,
    length: f32,
    thickness: f32,
    rng: &mut SimpleRng,
) {
    const MAX_SPREAD: f32 = 90.0;
    let rot_x = rng.next_float() * MAX_SPREAD - MAX_SPREAD / 2.0;
    let rot_z = rng.next_float() * MAX_SPREAD - MAX_SPREAD / 2.0;
    let id = arena.attach(parent, Branch::wood(length, thickness, rot_x, rot_z).tilted());

    if depth < params.max_branch_depth && thickness > 0.05 {
        for _ in 0..branch_count(params, rng) {
            let child_length = length * (0.6 + rng.next_float() * 0.3);
            grow_branch(arena, id, params, depth + 1, child_length, thickness * 0.6, rng);
        }
    }
}

/// Shared conifer topology, built once per species at its mean height
#[derive(Debug)]
struct SpruceTemplate {
    height: f32,
    arena: BranchArena,
    trunk: Vec<BranchId>,
}

fn spruce_templates() -> &'static HashMap<TreeSpecies, SpruceTemplate> {
    static TEMPLATES: OnceLock<HashMap<TreeSpecies, SpruceTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        TreeSpecies::ALL
            .iter()
            .filter(|s| s.params().style == TreeStyle::Spruce)
            .map(|&s| {
                let params = s.params();
                let height = (params.min_height + params.max_height) * 0.5;
                (s, build_spruce_template(&params, height))
            })
            .collect()
    })
}

/// Copy the species template and stretch its trunk to this instance's height
fn spruce_instance(species: TreeSpecies, height: f32) -> BranchArena {
    let Some(template) = spruce_templates().get(&species) else {
        return BranchArena::new();
    };
    let mut arena = template.arena.clone();
    let stretch = height / template.height;
    for &id in &template.trunk {
        if let Some(segment) = arena.get_mut(id) {
            segment.length *= stretch;
        }
    }
    arena
}

fn build_spruce_template(params: &TreeParams, height: f32) -> SpruceTemplate {
    let segments = if params.trunk_segments > 0 { params.trunk_segments } else { 20 };
    let segment_height = height / segments as f32;
    let base = params.base_thickness;

    let mut arena = BranchArena::new();
    let mut current = arena.push(Branch::wood(segment_height, base, 0.0, 0.0));
    let mut trunk = vec![current];

    for i in 1..=segments {
        let progress = i as f32 / segments as f32;
        let thickness = base * (1.0 - progress * 0.5);
        current = arena.attach(current, Branch::wood(segment_height, thickness, 0.0, 0.0));
        trunk.push(current);

        if i == segments {
            break;
        }

        // Four whorls of paired side branches, each forking once
        let length = params.leaf_size * (1.0 - progress);
        for b in 0..4 {
            let heading = 90.0 * b as f32;
            for j in 0..2 {
                let rot_z = heading + (j as f32 - 1.0) * 15.0;
                let branch = Branch::wood(length, base * 0.15, -120.0, rot_z).tilted();
                let side = arena.attach(current, branch);
                for fork in [-15.0, 15.0] {
                    let split = Branch::wood(length * 0.5, base * 0.1, -30.0, fork).tilted();
                    arena.attach(side, split);
                }
            }
        }
    }

    let crown_size = params.leaf_size * 0.7;
    let cluster = arena.attach(current, Branch::leaf(BranchKind::LeafCluster, 0.0));
    for layer in 0..3 {
        let radius = crown_size * (1.0 - layer as f32 * 0.4);
        let ring = arena.attach(cluster, Branch::leaf(BranchKind::LeafRing { radius }, 0.0));
        for plane in 0..6 {
            arena.attach(ring, Branch::leaf(BranchKind::LeafPlane, 60.0 * plane as f32));
        }
    }

    SpruceTemplate { height, arena, trunk }
}
