//! Terrain chunks: one square tile of heights, masks and features

use glam::Vec3;

use super::grid::{CellMask, HeightGrid, GRID_SIZE};
use super::mesh::{build_grass_batches, GrassBatch, TerrainMesh};
use crate::feature::{Feature, Lake};
use crate::math::Aabb;
use crate::terrain::biome::{Biome, BiomeShape};
use crate::terrain::surface::SurfaceBands;

/// Cells per chunk side
pub const CHUNK_SIZE: usize = 64;

/// Integer coordinate identifying a chunk in the world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position
    pub fn from_world(wx: f32, wz: f32, scale: f32) -> Self {
        let span = CHUNK_SIZE as f32 * scale;
        Self {
            x: (wx / span).floor() as i32,
            z: (wz / span).floor() as i32,
        }
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Chebyshev distance in chunks
    pub fn distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// World (x, z) of a chunk-local grid position
    pub fn cell_to_world(&self, lx: f32, lz: f32, scale: f32) -> (f32, f32) {
        (
            (self.x as f32 * CHUNK_SIZE as f32 + lx) * scale,
            (self.z as f32 * CHUNK_SIZE as f32 + lz) * scale,
        )
    }

    /// Chunk-local grid position of a world (x, z)
    pub fn world_to_cell(&self, wx: f32, wz: f32, scale: f32) -> (f32, f32) {
        (
            wx / scale - self.x as f32 * CHUNK_SIZE as f32,
            wz / scale - self.z as f32 * CHUNK_SIZE as f32,
        )
    }

    /// World-space box spanning the chunk between two heights
    pub fn world_bounds(&self, scale: f32, min_y: f32, max_y: f32) -> Aabb {
        let (x0, z0) = self.cell_to_world(0.0, 0.0, scale);
        let (x1, z1) = self.cell_to_world(CHUNK_SIZE as f32, CHUNK_SIZE as f32, scale);
        Aabb::from_bounds(x0, min_y, z0, x1, max_y, z1)
    }
}

/// Generation progress of a chunk. Steps only move forward, except that
/// unloading features returns a chunk to `EdgesStitched`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChunkState {
    Empty,
    HeightsGenerated,
    LakesCarved,
    EdgesStitched,
    FeaturesGenerated,
    Disposed,
}

/// Heights copied from already-loaded neighbors so shared edges match.
///
/// Every shared vertex has one owner. For the vertex at a chunk-grid corner
/// the owner is the first loaded of its north-west, north-east, south-west and
/// south-east chunks, and the others copy from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeNeighbors {
    /// East edge of the chunk at x - 1
    pub west: Option<Vec<f32>>,
    /// South edge of the chunk at z - 1
    pub north: Option<Vec<f32>>,
    /// Far corner of the chunk at (x - 1, z - 1)
    pub north_west: Option<f32>,
    /// South-west corner of the chunk at (x + 1, z - 1)
    pub north_east: Option<f32>,
}

impl EdgeNeighbors {
    pub fn from_chunks(
        west: Option<&Chunk>,
        north: Option<&Chunk>,
        north_west: Option<&Chunk>,
        north_east: Option<&Chunk>,
    ) -> Self {
        Self {
            west: west.map(|c| c.heights.east_edge()),
            north: north.map(|c| c.heights.south_edge()),
            north_west: north_west.map(|c| c.heights.far_corner()),
            north_east: north_east.map(|c| c.heights.south_west_corner()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.west.is_none()
            && self.north.is_none()
            && self.north_west.is_none()
            && self.north_east.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub biome: Biome,
    pub shape: BiomeShape,
    pub lod: u32,
    scale: f32,
    surface: SurfaceBands,
    state: ChunkState,
    heights: HeightGrid,
    feature_mask: CellMask,
    lake_mask: CellMask,
    features: Vec<Feature>,
    bounds: Aabb,
    mesh: TerrainMesh,
    mesh_revision: u64,
    grass: Vec<GrassBatch>,
}

impl Chunk {
    /// Create an empty chunk. Heights are all zero until generated.
    pub fn new(
        coord: ChunkCoord,
        biome: Biome,
        shape: BiomeShape,
        lod: u32,
        scale: f32,
        surface: SurfaceBands,
    ) -> Self {
        Self {
            coord,
            biome,
            shape,
            lod,
            scale,
            surface,
            state: ChunkState::Empty,
            heights: HeightGrid::new(),
            feature_mask: CellMask::new(),
            lake_mask: CellMask::new(),
            features: Vec::new(),
            bounds: coord.world_bounds(scale, 0.0, 0.0),
            mesh: TerrainMesh::default(),
            mesh_revision: 0,
            grass: Vec::new(),
        }
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    pub(crate) fn heights_mut(&mut self) -> &mut HeightGrid {
        &mut self.heights
    }

    pub fn feature_mask(&self) -> &CellMask {
        &self.feature_mask
    }

    pub fn lake_mask(&self) -> &CellMask {
        &self.lake_mask
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn lakes(&self) -> impl Iterator<Item = (&Feature, &Lake)> {
        self.features.iter().filter_map(|f| f.as_lake().map(|lake| (f, lake)))
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Bumped every time the mesh is rebuilt
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn grass_batches(&self) -> &[GrassBatch] {
        &self.grass
    }

    pub fn features_generated(&self) -> bool {
        self.state == ChunkState::FeaturesGenerated
    }

    /// Cell already holds something or sits in a lake
    pub fn is_cell_masked(&self, x: usize, z: usize) -> bool {
        self.feature_mask.get(x, z) || self.lake_mask.get(x, z)
    }

    pub fn slope(&self, x: usize, z: usize) -> f32 {
        self.heights.slope(x, z)
    }

    /// Interpolated height at a world position, 0 outside this chunk
    pub fn get_height(&self, wx: f32, wz: f32) -> f32 {
        let (lx, lz) = self.coord.world_to_cell(wx, wz, self.scale);
        self.heights.sample(lx, lz).unwrap_or(0.0)
    }

    pub(crate) fn set_heights(&mut self, heights: HeightGrid) {
        self.heights = heights;
        self.state = ChunkState::HeightsGenerated;
    }

    pub(crate) fn add_lake(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub(crate) fn mark_lake_cell(&mut self, x: usize, z: usize) {
        self.lake_mask.set(x, z);
        self.feature_mask.set(x, z);
    }

    pub(crate) fn finish_lakes(&mut self) {
        self.state = ChunkState::LakesCarved;
    }

    pub(crate) fn place_feature(&mut self, x: usize, z: usize, feature: Feature) {
        self.features.push(feature);
        self.feature_mask.set(x, z);
    }

    pub(crate) fn finish_features(&mut self) {
        self.grass = build_grass_batches(&self.features);
        self.state = ChunkState::FeaturesGenerated;
    }

    /// Copy shared edges from neighbors, then rebuild the mesh and bounds.
    ///
    /// The west column, then the north row, then the north-west corner are
    /// taken, so the corner value wins at (0, 0). The north-east corner only
    /// fills (`CHUNK_SIZE`, 0) when there is no north neighbor.
    pub fn stitch_edges(&mut self, edges: &EdgeNeighbors) {
        if let Some(west) = &edges.west {
            for (z, &h) in west.iter().enumerate().take(GRID_SIZE) {
                self.heights.set(0, z, h);
            }
        }
        if let Some(north) = &edges.north {
            for (x, &h) in north.iter().enumerate().take(GRID_SIZE) {
                self.heights.set(x, 0, h);
            }
        }
        if let Some(corner) = edges.north_west {
            self.heights.set(0, 0, corner);
        }
        if edges.north.is_none() {
            if let Some(corner) = edges.north_east {
                self.heights.set(CHUNK_SIZE, 0, corner);
            }
        }

        if self.state < ChunkState::EdgesStitched {
            self.state = ChunkState::EdgesStitched;
        }
        self.rebuild_mesh();
    }

    pub fn rebuild_mesh(&mut self) {
        self.mesh = TerrainMesh::build(
            &self.heights,
            self.coord,
            self.scale,
            self.lod,
            &self.shape,
            &self.surface,
        );
        self.mesh_revision += 1;

        let (min_y, max_y) = self.heights.min_max();
        self.bounds = self.coord.world_bounds(self.scale, min_y, max_y);
    }

    /// Drop every non-lake feature. Lake cells stay masked so the next
    /// scatter pass sees the same free cells and regrows the same features.
    ///
    /// Returns the number of features removed.
    pub fn unload_features(&mut self) -> usize {
        if self.state != ChunkState::FeaturesGenerated {
            return 0;
        }
        let before = self.features.len();
        self.features.retain(Feature::is_lake);
        self.feature_mask = self.lake_mask.clone();
        self.grass.clear();
        self.state = ChunkState::EdgesStitched;
        before - self.features.len()
    }

    /// Release everything the chunk owns
    pub fn dispose(&mut self) {
        self.features = Vec::new();
        self.grass = Vec::new();
        self.mesh = TerrainMesh::default();
        self.state = ChunkState::Disposed;
    }

    /// Features whose base lies within `radius` of a world point, measured in XZ
    pub fn features_near(&self, point: Vec3, radius: f32) -> impl Iterator<Item = &Feature> {
        let r2 = radius * radius;
        self.features.iter().filter(move |f| {
            let d = f.position - point;
            d.x * d.x + d.z * d.z <= r2
        })
    }
}
