//! Chunk lifecycle around a moving viewer
//!
//! [`TerrainStreamer`] owns every loaded chunk. Each `update` makes sure the
//! visible chunks within render distance exist at the right LOD, grows or
//! drops features by feature distance, and disposes chunks that are no longer
//! needed.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use super::lod::stride_for_lod;
use crate::core::types::Result;
use crate::feature::Feature;
use crate::generation::{GenerationPipeline, TerrainConfig, MIN_RENDER_DISTANCE};
use crate::math::Visibility;
use crate::terrain::biome::{Biome, BiomeTable};
use crate::terrain::selector;
use crate::world::{Chunk, ChunkCoord, EdgeNeighbors};

/// Vertical extent assumed for chunks that are not loaded yet
pub const VISIBILITY_MIN_Y: f32 = -20.0;
pub const VISIBILITY_MAX_Y: f32 = 100.0;

/// What one `update` call changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub created: usize,
    /// Chunks rebuilt at a finer LOD
    pub replaced: usize,
    pub disposed: usize,
    /// Chunks that scattered features this update
    pub features_generated: usize,
    /// Chunks that dropped their features this update
    pub features_unloaded: usize,
}

impl UpdateStats {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

pub struct TerrainStreamer {
    config: TerrainConfig,
    pipeline: GenerationPipeline,
    chunks: HashMap<ChunkCoord, Chunk>,
    viewer: Option<ChunkCoord>,
}

impl TerrainStreamer {
    /// Create a streamer with the standard biome catalog.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: TerrainConfig) -> Result<Self> {
        let pipeline = GenerationPipeline::new(&config)?;
        Ok(Self::from_pipeline(config, pipeline))
    }

    /// Create a streamer around a custom biome catalog
    pub fn with_table(config: TerrainConfig, table: BiomeTable) -> Result<Self> {
        let pipeline = GenerationPipeline::with_table(&config, table)?;
        Ok(Self::from_pipeline(config, pipeline))
    }

    fn from_pipeline(config: TerrainConfig, pipeline: GenerationPipeline) -> Self {
        log::info!(
            "Terrain streamer: seed={} scale={} distances={}/{} biomes={} strategy={:?}",
            config.seed,
            config.scale,
            config.render_distance,
            config.feature_render_distance,
            pipeline.table().len(),
            config.biome_strategy
        );
        Self {
            config,
            pipeline,
            chunks: HashMap::new(),
            viewer: None,
        }
    }

    /// Bring the loaded set in line with a viewer at world (x, z)
    pub fn update(
        &mut self,
        viewer_x: f32,
        viewer_z: f32,
        visibility: &impl Visibility,
    ) -> UpdateStats {
        let mut stats = UpdateStats::default();
        let scale = self.config.scale;
        let center = ChunkCoord::from_world(viewer_x, viewer_z, scale);
        let radius = self.config.render_distance;
        self.viewer = Some(center);

        let mut needed = HashSet::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = center.offset(dx, dz);
                let bounds = coord.world_bounds(scale, VISIBILITY_MIN_Y, VISIBILITY_MAX_Y);
                if !visibility.is_box_visible(&bounds) {
                    continue;
                }
                needed.insert(coord);

                let lod = self.config.lod.lod_for_distance(coord.distance(center));
                match self.chunks.get(&coord).map(|c| c.lod) {
                    None => {
                        self.create_chunk(coord, lod);
                        stats.created += 1;
                    }
                    Some(existing) if lod < existing => {
                        self.create_chunk(coord, lod);
                        stats.replaced += 1;
                    }
                    Some(_) => {}
                }
            }
        }

        let feature_distance = self.config.feature_render_distance;
        for chunk in self.chunks.values_mut() {
            let distance = chunk.coord.distance(center);
            if distance > feature_distance {
                if chunk.features_generated() {
                    let removed = chunk.unload_features();
                    let coord = chunk.coord;
                    log::trace!("Chunk ({}, {}) unloaded {} features", coord.x, coord.z, removed);
                    stats.features_unloaded += 1;
                }
            } else if !chunk.features_generated() && visibility.is_box_visible(chunk.bounds()) {
                self.pipeline.generate_features(chunk);
                stats.features_generated += 1;
            }
        }

        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| !needed.contains(*c))
            .copied()
            .collect();
        for coord in stale {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.dispose();
                log::debug!("Disposed chunk ({}, {})", coord.x, coord.z);
                stats.disposed += 1;
            }
        }

        if !stats.is_idle() {
            log::debug!(
                "Streamer update at ({}, {}): {:?}, {} chunks loaded",
                center.x,
                center.z,
                stats,
                self.chunks.len()
            );
        }
        stats
    }

    fn edges_for(&self, coord: ChunkCoord) -> EdgeNeighbors {
        EdgeNeighbors::from_chunks(
            self.chunks.get(&coord.offset(-1, 0)),
            self.chunks.get(&coord.offset(0, -1)),
            self.chunks.get(&coord.offset(-1, -1)),
            self.chunks.get(&coord.offset(1, -1)),
        )
    }

    fn create_chunk(&mut self, coord: ChunkCoord, lod: u32) {
        let edges = self.edges_for(coord);
        let chunk = self.pipeline.generate_chunk(coord, lod, &edges);
        log::debug!(
            "Created chunk ({}, {}) lod={} stride={}",
            coord.x,
            coord.z,
            lod,
            stride_for_lod(lod)
        );
        if let Some(mut old) = self.chunks.insert(coord, chunk) {
            old.dispose();
        }

        // Neighbors generated earlier take their shared edges from the new chunk
        for (dx, dz) in [(1, 0), (0, 1), (1, 1), (-1, 1)] {
            let neighbor = coord.offset(dx, dz);
            if self.chunks.contains_key(&neighbor) {
                let edges = self.edges_for(neighbor);
                if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                    chunk.stitch_edges(&edges);
                }
            }
        }
    }

    /// Interpolated terrain height, 0 where no chunk is loaded
    pub fn get_height(&self, wx: f32, wz: f32) -> f32 {
        let coord = ChunkCoord::from_world(wx, wz, self.config.scale);
        self.chunks.get(&coord).map_or(0.0, |c| c.get_height(wx, wz))
    }

    /// Features of every loaded chunk within `chunk_radius` (Chebyshev) of
    /// the chunk containing (x, z)
    pub fn get_nearby_features(&self, wx: f32, wz: f32, chunk_radius: i32) -> Vec<&Feature> {
        let center = ChunkCoord::from_world(wx, wz, self.config.scale);
        let mut features = Vec::new();
        for dx in -chunk_radius..=chunk_radius {
            for dz in -chunk_radius..=chunk_radius {
                if let Some(chunk) = self.chunks.get(&center.offset(dx, dz)) {
                    features.extend(chunk.features());
                }
            }
        }
        features
    }

    /// Whether a world point is inside any nearby feature's solid volume
    pub fn collides(&self, point: Vec3) -> bool {
        self.get_nearby_features(point.x, point.z, 1)
            .into_iter()
            .any(|f| f.collides_with(point))
    }

    pub fn get_chunk(&self, cx: i32, cz: i32) -> Option<&Chunk> {
        self.chunks.get(&ChunkCoord::new(cx, cz))
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Biome of a chunk, from the loaded chunk if present
    pub fn biome_at_chunk(&self, cx: i32, cz: i32) -> Biome {
        match self.get_chunk(cx, cz) {
            Some(chunk) => chunk.biome,
            None => self.pipeline.biome_for_chunk(ChunkCoord::new(cx, cz)),
        }
    }

    /// Normalized blend weights of every biome at a world position
    pub fn biome_weights(&self, wx: f32, wz: f32) -> Vec<(Biome, f32)> {
        let (noise, table) = (self.pipeline.biome_noise(), self.pipeline.table());
        selector::biome_weights(noise, table, wx as f64, wz as f64)
    }

    pub fn dominant_biome(&self, wx: f32, wz: f32) -> Biome {
        let (noise, table) = (self.pipeline.biome_noise(), self.pipeline.table());
        selector::dominant_biome(noise, table, wx as f64, wz as f64)
    }

    pub fn render_distance(&self) -> i32 {
        self.config.render_distance
    }

    /// Takes effect on the next update. Clamped to at least [`MIN_RENDER_DISTANCE`].
    pub fn set_render_distance(&mut self, distance: i32) {
        self.config.render_distance = distance.max(MIN_RENDER_DISTANCE);
        log::info!("Render distance set to {}", self.config.render_distance);
    }

    pub fn feature_render_distance(&self) -> i32 {
        self.config.feature_render_distance
    }

    /// Takes effect on the next update. Clamped to at least 0.
    pub fn set_feature_render_distance(&mut self, distance: i32) {
        self.config.feature_render_distance = distance.max(0);
        log::info!("Feature render distance set to {}", self.config.feature_render_distance);
    }

    pub fn seed(&self) -> i64 {
        self.config.seed
    }

    pub fn scale(&self) -> f32 {
        self.config.scale
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Chunk the viewer was in at the last update
    pub fn viewer_chunk(&self) -> Option<ChunkCoord> {
        self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Aabb, AlwaysVisible, Frustum};
    use crate::streaming::lod::LodConfig;
    use crate::world::CHUNK_SIZE;

    fn streamer(render: i32, features: i32) -> TerrainStreamer {
        let mut config = TerrainConfig::default();
        config.render_distance = render;
        config.feature_render_distance = features;
        TerrainStreamer::new(config).unwrap()
    }

    #[test]
    fn test_loads_square_around_viewer() {
        let mut s = streamer(2, 1);
        let stats = s.update(10.0, 10.0, &AlwaysVisible);
        assert_eq!(stats.created, 25);
        assert_eq!(s.chunk_count(), 25);
        assert_eq!(stats.features_generated, 9);
        assert!(s.get_chunk(2, -2).is_some());
        assert!(s.get_chunk(3, 0).is_none());
        assert_eq!(s.viewer_chunk(), Some(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut s = streamer(2, 1);
        s.update(100.0, -40.0, &AlwaysVisible);
        let again = s.update(100.0, -40.0, &AlwaysVisible);
        assert!(again.is_idle(), "second update changed {:?}", again);
    }

    fn assert_seamless(s: &TerrainStreamer) {
        for chunk in s.chunks() {
            let (x, z) = (chunk.coord.x, chunk.coord.z);
            if let Some(east) = s.get_chunk(x + 1, z) {
                for gz in 0..=CHUNK_SIZE {
                    let (a, b) = (chunk.heights().get(CHUNK_SIZE, gz), east.heights().get(0, gz));
                    assert_eq!(a, b, "({}, {}) east edge at z={}", x, z, gz);
                }
            }
            if let Some(south) = s.get_chunk(x, z + 1) {
                for gx in 0..=CHUNK_SIZE {
                    let (a, b) = (chunk.heights().get(gx, CHUNK_SIZE), south.heights().get(gx, 0));
                    assert_eq!(a, b, "({}, {}) south edge at x={}", x, z, gx);
                }
            }
        }
    }

    /// Visibility test admitting only the listed chunks (scale 1)
    fn only(coords: &[(i32, i32)]) -> impl Fn(&Aabb) -> bool + '_ {
        move |aabb: &Aabb| {
            let coord = ChunkCoord::from_world(aabb.min.x + 1.0, aabb.min.z + 1.0, 1.0);
            coords.contains(&(coord.x, coord.z))
        }
    }

    #[test]
    fn test_shared_edges_match() {
        let mut s = streamer(2, 0);
        s.update(0.0, 0.0, &AlwaysVisible);
        // Move so a new column appears east of existing chunks
        s.update(CHUNK_SIZE as f32 * 1.5, 0.0, &AlwaysVisible);
        assert_seamless(&s);
    }

    #[test]
    fn test_corner_owned_by_late_north_east_chunk() {
        let mut s = streamer(2, 0);
        s.update(1.0, 1.0, &only(&[(-1, 1), (0, 1)]));
        assert_seamless(&s);

        // (0, 0) arrives after the chunks south-west and south of it
        s.update(1.0, 1.0, &only(&[(-1, 1), (0, 1), (0, 0)]));
        assert_eq!(s.chunk_count(), 3);
        let owner = s.get_chunk(0, 0).unwrap().heights().get(0, CHUNK_SIZE);
        assert_eq!(s.get_chunk(-1, 1).unwrap().heights().get(CHUNK_SIZE, 0), owner);
        assert_eq!(s.get_chunk(0, 1).unwrap().heights().get(0, 0), owner);
        assert_seamless(&s);
    }

    #[test]
    fn test_seamless_as_chunks_trickle_in() {
        let order = [(0, 1), (-1, 1), (1, -1), (0, 0), (-1, -1), (1, 1), (-1, 0), (1, 0), (0, -1)];
        let mut s = streamer(2, 0);
        for n in 1..=order.len() {
            s.update(1.0, 1.0, &only(&order[..n]));
            assert_eq!(s.chunk_count(), n);
            assert_seamless(&s);
        }
    }

    #[test]
    fn test_visibility_culls_chunks() {
        let mut s = streamer(2, 1);
        let east_only = |aabb: &Aabb| aabb.min.x >= 0.0;
        s.update(1.0, 1.0, &east_only);
        assert_eq!(s.chunk_count(), 15);
        assert!(s.chunks().all(|c| c.coord.x >= 0));
    }

    #[test]
    fn test_frustum_drives_loading() {
        // Top-down camera seeing world x and z in [-100, 100]
        let proj = glam::Mat4::orthographic_rh(-100.0, 100.0, -100.0, 100.0, 0.1, 1000.0);
        let view = glam::Mat4::look_at_rh(Vec3::new(0.0, 200.0, 0.0), Vec3::ZERO, Vec3::Z);
        let frustum = Frustum::from_view_projection(&(proj * view));

        let mut s = streamer(3, 1);
        s.update(0.0, 0.0, &frustum);
        assert_eq!(s.chunk_count(), 16);
        assert!(s.chunks().all(|c| (-2..=1).contains(&c.coord.x) && (-2..=1).contains(&c.coord.z)));
    }

    #[test]
    fn test_moving_away_disposes_and_unloads() {
        let mut s = streamer(2, 1);
        s.update(0.0, 0.0, &AlwaysVisible);
        assert!(s.get_chunk(1, 0).unwrap().features_generated());

        let span = CHUNK_SIZE as f32;
        let stats = s.update(span * 3.0 + 1.0, 1.0, &AlwaysVisible);
        assert_eq!(stats.disposed, 15);
        assert!(s.get_chunk(-1, 0).is_none());

        // (1, 0) is now two chunks from the viewer and past the feature distance
        let chunk = s.get_chunk(1, 0).unwrap();
        assert!(!chunk.features_generated());
        assert!(chunk.features().iter().all(Feature::is_lake));
        for chunk in s.chunks() {
            assert!(chunk.lake_mask().is_subset_of(chunk.feature_mask()));
        }
    }

    #[test]
    fn test_features_regrow_identically() {
        let mut s = streamer(3, 0);
        s.update(10.0, 10.0, &AlwaysVisible);
        let before = s.get_chunk(0, 0).unwrap().features().to_vec();

        s.update(CHUNK_SIZE as f32 * 2.0 + 10.0, 10.0, &AlwaysVisible);
        assert!(!s.get_chunk(0, 0).unwrap().features_generated());

        s.update(10.0, 10.0, &AlwaysVisible);
        assert_eq!(s.get_chunk(0, 0).unwrap().features(), before.as_slice());
    }

    #[test]
    fn test_get_height() {
        let mut s = streamer(1, 0);
        s.update(0.0, 0.0, &AlwaysVisible);
        let chunk = s.get_chunk(0, 0).unwrap();
        assert_eq!(s.get_height(12.25, 40.5), chunk.get_height(12.25, 40.5));
        assert_eq!(s.get_height(10_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_nearby_features() {
        let mut s = streamer(2, 2);
        s.update(0.0, 0.0, &AlwaysVisible);
        let near = s.get_nearby_features(0.0, 0.0, 0).len();
        assert_eq!(near, s.get_chunk(0, 0).unwrap().features().len());
        let total: usize = s.chunks().map(|c| c.features().len()).sum();
        assert_eq!(s.get_nearby_features(0.0, 0.0, 2).len(), total);
        assert!(!s.collides(Vec3::new(0.0, 1000.0, 0.0)));
    }

    #[test]
    fn test_lod_replacement() {
        let mut config = TerrainConfig::default().with_render_distance(3);
        config.lod = LodConfig { enabled: true, distances: [1, 2, 3] };
        let mut s = TerrainStreamer::new(config).unwrap();

        s.update(0.0, 0.0, &AlwaysVisible);
        assert_eq!(s.get_chunk(2, 0).unwrap().lod, 2);
        assert_eq!(s.get_chunk(0, 0).unwrap().lod, 0);

        let span = CHUNK_SIZE as f32;
        let stats = s.update(span * 2.0 + 1.0, 1.0, &AlwaysVisible);
        assert!(stats.replaced > 0);
        assert_eq!(s.get_chunk(2, 0).unwrap().lod, 0);
        // Coarser targets keep the finer mesh already built
        assert_eq!(s.get_chunk(0, 0).unwrap().lod, 0);
    }

    #[test]
    fn test_render_distance_setters() {
        let mut s = streamer(2, 1);
        s.set_render_distance(0);
        assert_eq!(s.render_distance(), MIN_RENDER_DISTANCE);
        // The clamped value is one a config file could hold
        assert!(s.config().validate().is_ok());
        assert!(TerrainStreamer::new(TerrainConfig::default().with_render_distance(0)).is_err());
        s.set_feature_render_distance(-4);
        assert_eq!(s.feature_render_distance(), 0);
        assert_eq!(s.seed(), 1234);
        assert_eq!(s.scale(), 1.0);
    }

    #[test]
    fn test_biome_queries() {
        let mut s = streamer(1, 0);
        s.update(0.0, 0.0, &AlwaysVisible);
        assert_eq!(s.biome_at_chunk(0, 0), s.get_chunk(0, 0).unwrap().biome);
        // Unloaded chunks still resolve
        let far = s.biome_at_chunk(500, 500);
        assert!(Biome::ALL.contains(&far));

        let weights = s.biome_weights(300.0, -200.0);
        assert_eq!(weights.len(), Biome::ALL.len());
        let dominant = s.dominant_biome(300.0, -200.0);
        assert!(Biome::ALL.contains(&dominant));
    }
}
