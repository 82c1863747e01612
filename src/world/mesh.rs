//! Renderer-facing vertex batches for a chunk
//!
//! Nothing here talks to a graphics API. Batches are plain `Pod` vertex
//! arrays an external renderer can upload as they are.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::chunk::{ChunkCoord, CHUNK_SIZE};
use super::grid::HeightGrid;
use crate::feature::{Feature, GrassTint, GrassVertex};
use crate::streaming::lod::stride_for_lod;
use crate::terrain::biome::BiomeShape;
use crate::terrain::surface::{pick_texture, SurfaceBands, SurfaceTexture};

/// Texture coordinates repeat every five grid cells
const UV_SCALE: f32 = 0.2;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangles sharing one surface texture
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBatch {
    pub texture: SurfaceTexture,
    /// Triangle list, three vertices per triangle
    pub vertices: Vec<TerrainVertex>,
}

/// Triangulated terrain for one chunk at one LOD
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub lod: u32,
    /// In order of first use while walking the grid
    pub batches: Vec<MeshBatch>,
    /// Flat quads at water level over cells with any corner below it
    pub water: Vec<TerrainVertex>,
}

impl TerrainMesh {
    pub fn build(
        heights: &HeightGrid,
        coord: ChunkCoord,
        scale: f32,
        lod: u32,
        shape: &BiomeShape,
        bands: &SurfaceBands,
    ) -> Self {
        let stride = stride_for_lod(lod);
        let mut mesh = Self {
            lod,
            batches: Vec::new(),
            water: Vec::new(),
        };

        let vertex = |x: usize, z: usize| {
            let (wx, wz) = coord.cell_to_world(x as f32, z as f32, scale);
            Vec3::new(wx, heights.get(x, z), wz)
        };

        for x in (0..CHUNK_SIZE).step_by(stride) {
            for z in (0..CHUNK_SIZE).step_by(stride) {
                let (x1, z1) = (x + stride, z + stride);
                let triangles = [[(x, z), (x, z1), (x1, z)], [(x1, z), (x, z1), (x1, z1)]];

                for corners in triangles {
                    let p = corners.map(|(cx, cz)| vertex(cx, cz));
                    let normal =
                        (p[1] - p[0]).cross(p[2] - p[0]).try_normalize().unwrap_or(Vec3::Y);

                    let slope =
                        corners.iter().map(|&(cx, cz)| heights.slope(cx, cz)).sum::<f32>() / 3.0;
                    let height = p.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max);
                    let texture = pick_texture(shape, bands, height, slope);

                    let vertices = corners.iter().zip(p).map(|(&(cx, cz), position)| TerrainVertex {
                        position: position.to_array(),
                        normal: normal.to_array(),
                        uv: [cx as f32 * UV_SCALE, cz as f32 * UV_SCALE],
                    });
                    mesh.batch_mut(texture).extend(vertices);
                }

                let below = [(x, z), (x1, z), (x, z1), (x1, z1)]
                    .iter()
                    .any(|&(cx, cz)| heights.get(cx, cz) < bands.water_level);
                if below {
                    mesh.push_water_quad(coord, scale, x, z, stride, bands.water_level);
                }
            }
        }

        mesh
    }

    fn batch_mut(&mut self, texture: SurfaceTexture) -> &mut Vec<TerrainVertex> {
        let index = match self.batches.iter().position(|b| b.texture == texture) {
            Some(i) => i,
            None => {
                self.batches.push(MeshBatch {
                    texture,
                    vertices: Vec::new(),
                });
                self.batches.len() - 1
            }
        };
        &mut self.batches[index].vertices
    }

    fn push_water_quad(
        &mut self,
        coord: ChunkCoord,
        scale: f32,
        x: usize,
        z: usize,
        stride: usize,
        level: f32,
    ) {
        let corner = |cx: usize, cz: usize| {
            let (wx, wz) = coord.cell_to_world(cx as f32, cz as f32, scale);
            TerrainVertex {
                position: [wx, level, wz],
                normal: [0.0, 1.0, 0.0],
                uv: [cx as f32 * UV_SCALE, cz as f32 * UV_SCALE],
            }
        };
        let (x1, z1) = (x + stride, z + stride);
        self.water.extend([
            corner(x, z),
            corner(x, z1),
            corner(x1, z),
            corner(x1, z),
            corner(x, z1),
            corner(x1, z1),
        ]);
    }

    pub fn triangle_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum::<usize>() / 3
    }

    pub fn batch(&self, texture: SurfaceTexture) -> Option<&MeshBatch> {
        self.batches.iter().find(|b| b.texture == texture)
    }
}

/// Grass blades of one tint, offset into world space
#[derive(Clone, Debug, PartialEq)]
pub struct GrassBatch {
    pub tint: GrassTint,
    /// Quads, four vertices each
    pub vertices: Vec<GrassVertex>,
}

/// Merge every grass feature into per-tint batches
pub fn build_grass_batches(features: &[Feature]) -> Vec<GrassBatch> {
    let mut batches: Vec<GrassBatch> = Vec::new();
    for feature in features {
        let Some(grass) = feature.as_grass() else {
            continue;
        };
        let offset = feature.position;
        let placed = grass.vertices.iter().map(|v| GrassVertex {
            position: [
                v.position[0] + offset.x,
                v.position[1] + offset.y,
                v.position[2] + offset.z,
            ],
            uv: v.uv,
        });
        match batches.iter_mut().find(|b| b.tint == grass.tint) {
            Some(batch) => batch.vertices.extend(placed),
            None => batches.push(GrassBatch {
                tint: grass.tint,
                vertices: placed.collect(),
            }),
        }
    }
    batches
}
