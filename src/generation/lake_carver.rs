//! Lake siting and basin carving
//!
//! Lakes are placed before any other feature and never cross a chunk edge.
//! Carving lowers the heightfield so the water surface is flat and never
//! floats above the shoreline.

use glam::Vec3;

use super::config::PlacementLimits;
use crate::core::rng::{hash_seed, SimpleRng};
use crate::feature::Lake;
use crate::terrain::biome::BiomeEntry;
use crate::world::{Chunk, CHUNK_SIZE};

/// Cells averaged around a candidate when testing slope
const SLOPE_RADIUS: usize = 2;

pub struct LakeCarver {
    slope_threshold: f32,
    buffer: f32,
    seed: i64,
}

impl LakeCarver {
    pub fn new(limits: &PlacementLimits, seed: i64) -> Self {
        Self {
            slope_threshold: limits.lake_slope_threshold,
            buffer: limits.lake_buffer,
            seed,
        }
    }

    pub fn buffer(&self) -> f32 {
        self.buffer
    }

    /// Try every lake spawner of `entry` on every free, flat enough cell.
    ///
    /// Returns the number of lakes carved.
    pub fn carve(&self, chunk: &mut Chunk, entry: &BiomeEntry) -> usize {
        let lake_spawners: Vec<_> = entry
            .features()
            .iter()
            .filter(|(s, _)| s.is_lake())
            .copied()
            .collect();
        if lake_spawners.is_empty() {
            return 0;
        }

        let coord = chunk.coord;
        let scale = chunk.scale();
        let chunk_seed = hash_seed(coord.x as f32, 0.0, coord.z as f32, self.seed);
        let mut rng = SimpleRng::from_seed(chunk_seed);
        let mut carved = 0;

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                if chunk.is_cell_masked(x, z) {
                    continue;
                }
                if chunk.heights().average_slope(x, z, SLOPE_RADIUS) > self.slope_threshold {
                    continue;
                }

                for &(spawner, probability) in &lake_spawners {
                    if !rng.chance(probability) {
                        continue;
                    }

                    let center = (x as f32 + 0.5, z as f32 + 0.5);
                    let (wx, wz) = coord.cell_to_world(center.0, center.1, scale);
                    let wy = chunk.heights().get(x, z);
                    let ix = coord.x * CHUNK_SIZE as i32 + x as i32;
                    let iz = coord.z * CHUNK_SIZE as i32 + z as i32;
                    let seed = hash_seed(ix as f32, (wy * 1000.0).round(), iz as f32, self.seed);

                    let mut feature = spawner.spawn(wx, wy, wz, seed);
                    let Some(lake) = feature.as_lake().cloned() else {
                        continue;
                    };
                    if !self.fits_in_chunk(&lake, center) || !self.can_place(chunk, &lake, center) {
                        continue;
                    }

                    let Some(surface) = carve_basin(chunk, &lake, center) else {
                        continue;
                    };
                    feature.position = Vec3::new(wx, surface, wz);
                    self.mark_area(chunk, &lake, center);
                    chunk.add_lake(feature);
                    carved += 1;

                    log::debug!(
                        "Lake at ({:.1}, {:.1}) in ({}, {}): radii {:.1}x{:.1}, surface {:.2}",
                        wx,
                        wz,
                        coord.x,
                        coord.z,
                        lake.radius_x,
                        lake.radius_z,
                        surface
                    );
                }
            }
        }

        carved
    }

    /// The buffered footprint lies inside [0, CHUNK_SIZE] on both axes
    pub fn fits_in_chunk(&self, lake: &Lake, center: (f32, f32)) -> bool {
        let rx = lake.radius_x + self.buffer;
        let rz = lake.radius_z + self.buffer;
        let size = CHUNK_SIZE as f32;
        center.0 - rx >= 0.0
            && center.0 + rx <= size
            && center.1 - rz >= 0.0
            && center.1 + rz <= size
    }

    /// No masked cell inside the buffered ellipse
    pub fn can_place(&self, chunk: &Chunk, lake: &Lake, center: (f32, f32)) -> bool {
        buffered_cells(lake, center, self.buffer).all(|(x, z)| !chunk.is_cell_masked(x, z))
    }

    fn mark_area(&self, chunk: &mut Chunk, lake: &Lake, center: (f32, f32)) {
        let cells: Vec<_> = buffered_cells(lake, center, self.buffer).collect();
        for (x, z) in cells {
            chunk.mark_lake_cell(x, z);
        }
    }
}

/// Cells whose centers fall in the plain ellipse grown by `buffer`
fn buffered_cells(
    lake: &Lake,
    center: (f32, f32),
    buffer: f32,
) -> impl Iterator<Item = (usize, usize)> {
    let rx = lake.radius_x + buffer;
    let rz = lake.radius_z + buffer;
    let (x0, x1) = cell_span(center.0, rx);
    let (z0, z1) = cell_span(center.1, rz);

    (x0..=x1).flat_map(move |x| (z0..=z1).map(move |z| (x, z))).filter(move |&(x, z)| {
        let dx = x as f32 + 0.5 - center.0;
        let dz = z as f32 + 0.5 - center.1;
        (dx * dx) / (rx * rx) + (dz * dz) / (rz * rz) <= 1.0
    })
}

fn cell_span(center: f32, radius: f32) -> (usize, usize) {
    let start = (center - radius).floor().max(0.0) as usize;
    let end = ((center + radius).floor().max(0.0) as usize).min(CHUNK_SIZE - 1);
    (start, end)
}

/// Lower the wobbled footprint into a basin and return the water surface.
///
/// The surface is the lowest `height + drop` over the footprint, so every
/// carved cell ends at or below `surface - drop`.
fn carve_basin(chunk: &mut Chunk, lake: &Lake, center: (f32, f32)) -> Option<f32> {
    let (x0, x1) = cell_span(center.0, lake.radius_x * 1.1);
    let (z0, z1) = cell_span(center.1, lake.radius_z * 1.1);

    let mut footprint = Vec::new();
    for x in x0..=x1 {
        for z in z0..=z1 {
            let dx = x as f32 + 0.5 - center.0;
            let dz = z as f32 + 0.5 - center.1;
            let distance = lake.wobbled_distance(dx, dz);
            if distance < 1.0 {
                footprint.push((x, z, lake.drop_at(distance)));
            }
        }
    }

    let heights = chunk.heights_mut();
    let surface = footprint
        .iter()
        .map(|&(x, z, drop)| heights.get(x, z) + drop)
        .fold(f32::INFINITY, f32::min);
    if !surface.is_finite() {
        return None;
    }

    for &(x, z, drop) in &footprint {
        let target = surface - drop;
        if heights.get(x, z) > target {
            heights.set(x, z, target);
        }
    }
    for &(x, z, _) in &footprint {
        chunk.mark_lake_cell(x, z);
    }

    Some(surface)
}
