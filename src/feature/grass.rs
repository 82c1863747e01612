//! Grass clumps built from crossed blade quads

use bytemuck::{Pod, Zeroable};

use crate::core::rng::{hash_seed, SimpleRng};

pub const BLADE_COUNT: usize = 32;
/// Two crossed quads of four corners per blade
pub const VERTICES_PER_BLADE: usize = 8;

const BLADE_HALF_BASE: f32 = 0.04;
const BLADE_HALF_TOP: f32 = 0.015;
pub const BLADE_BASE_HEIGHT: f32 = 1.2;
pub const BLADE_HEIGHT_VARIATION: f32 = 0.6;
const SPREAD: f32 = 1.0;

/// Blade vertex, laid out as five packed floats
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// How a clump is shaded
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrassTint {
    Textured(&'static str),
    /// Untextured, solid RGB
    Flat([f32; 3]),
}

/// Near-black blades used in dead biomes
pub const DEAD_GRASS: GrassTint = GrassTint::Flat([0.05, 0.05, 0.05]);

#[derive(Clone, Debug, PartialEq)]
pub struct Grass {
    pub tint: GrassTint,
    /// Quads in clump-local space, four vertices each
    pub vertices: Vec<GrassVertex>,
}

impl Grass {
    pub fn new(x: f32, y: f32, z: f32, tint: GrassTint, seed: i64) -> Self {
        let mut rng = SimpleRng::from_seed(hash_seed(x, y, z, seed));
        let mut vertices = Vec::with_capacity(BLADE_COUNT * VERTICES_PER_BLADE);

        for _ in 0..BLADE_COUNT {
            let offset_x = (rng.next_float() - 0.5) * SPREAD;
            let offset_z = (rng.next_float() - 0.5) * SPREAD;
            let height = BLADE_BASE_HEIGHT + rng.next_float() * BLADE_HEIGHT_VARIATION;
            let angle = rng.next_float() * 360.0;
            let lean = (rng.next_float() - 0.5) * 0.4;

            for quad in 0..2 {
                let (sin, cos) = (angle + quad as f32 * 90.0).to_radians().sin_cos();
                let corner = |local_x: f32, local_y: f32, u: f32, v: f32| GrassVertex {
                    position: [offset_x + local_x * cos, local_y, offset_z + local_x * sin],
                    uv: [u, v],
                };
                vertices.push(corner(-BLADE_HALF_BASE, 0.0, 0.0, 0.0));
                vertices.push(corner(BLADE_HALF_BASE, 0.0, 1.0, 0.0));
                vertices.push(corner(BLADE_HALF_TOP + lean, height, 1.0, 1.0));
                vertices.push(corner(-BLADE_HALF_TOP + lean, height, 0.0, 1.0));
            }
        }

        Self { tint, vertices }
    }

    pub fn max_blade_height(&self) -> f32 {
        self.vertices.iter().map(|v| v.position[1]).fold(0.0, f32::max)
    }
}
