//! Dense per-chunk grids: heights on vertices, masks on cells

use rayon::prelude::*;

use super::chunk::CHUNK_SIZE;

/// Height samples per side, including the edge shared with the next chunk
pub const GRID_SIZE: usize = CHUNK_SIZE + 1;

/// `GRID_SIZE`² heights stored x-major
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    data: Vec<f32>,
}

impl HeightGrid {
    pub fn new() -> Self {
        Self {
            data: vec![0.0; GRID_SIZE * GRID_SIZE],
        }
    }

    /// Every vertex at the same height
    pub fn filled(height: f32) -> Self {
        Self {
            data: vec![height; GRID_SIZE * GRID_SIZE],
        }
    }

    /// Sample `f(x, z)` at every vertex. Samples run in parallel and the
    /// result does not depend on scheduling.
    pub fn from_fn(f: impl Fn(usize, usize) -> f32 + Sync) -> Self {
        let data = (0..GRID_SIZE * GRID_SIZE)
            .into_par_iter()
            .map(|i| f(i / GRID_SIZE, i % GRID_SIZE))
            .collect();
        Self { data }
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[x * GRID_SIZE + z]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, height: f32) {
        self.data[x * GRID_SIZE + z] = height;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Local gradient magnitude by central differences, clamped at the grid edge
    pub fn slope(&self, x: usize, z: usize) -> f32 {
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(CHUNK_SIZE);
        let z0 = z.saturating_sub(1);
        let z1 = (z + 1).min(CHUNK_SIZE);

        let dx = (self.get(x1, z) - self.get(x0, z)) * 0.5;
        let dz = (self.get(x, z1) - self.get(x, z0)) * 0.5;
        (dx * dx + dz * dz).sqrt()
    }

    /// Mean slope over the cells within `radius` of (x, z). Cells outside the
    /// chunk are skipped.
    pub fn average_slope(&self, x: usize, z: usize, radius: usize) -> f32 {
        let mut total = 0.0;
        let mut count = 0;
        for sx in x.saturating_sub(radius)..=(x + radius).min(CHUNK_SIZE - 1) {
            for sz in z.saturating_sub(radius)..=(z + radius).min(CHUNK_SIZE - 1) {
                total += self.slope(sx, sz);
                count += 1;
            }
        }
        if count > 0 { total / count as f32 } else { 1.0 }
    }

    /// Bilinear sample at fractional grid coordinates. `None` outside the grid.
    pub fn sample(&self, lx: f32, lz: f32) -> Option<f32> {
        let size = CHUNK_SIZE as f32;
        if !(0.0..=size).contains(&lx) || !(0.0..=size).contains(&lz) {
            return None;
        }
        let ix = (lx.floor() as usize).min(CHUNK_SIZE - 1);
        let iz = (lz.floor() as usize).min(CHUNK_SIZE - 1);
        let fx = lx - ix as f32;
        let fz = lz - iz as f32;

        let h00 = self.get(ix, iz);
        let h10 = self.get(ix + 1, iz);
        let h01 = self.get(ix, iz + 1);
        let h11 = self.get(ix + 1, iz + 1);

        let h0 = h00 + (h10 - h00) * fx;
        let h1 = h01 + (h11 - h01) * fx;
        Some(h0 + (h1 - h0) * fz)
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Heights along x = `CHUNK_SIZE`, shared with the east neighbor
    pub fn east_edge(&self) -> Vec<f32> {
        (0..GRID_SIZE).map(|z| self.get(CHUNK_SIZE, z)).collect()
    }

    /// Heights along z = `CHUNK_SIZE`, shared with the south neighbor
    pub fn south_edge(&self) -> Vec<f32> {
        (0..GRID_SIZE).map(|x| self.get(x, CHUNK_SIZE)).collect()
    }

    pub fn far_corner(&self) -> f32 {
        self.get(CHUNK_SIZE, CHUNK_SIZE)
    }

    /// Height at (0, `CHUNK_SIZE`), shared with the south-west neighbor
    pub fn south_west_corner(&self) -> f32 {
        self.get(0, CHUNK_SIZE)
    }
}

impl Default for HeightGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// `CHUNK_SIZE`² occupancy flags stored x-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMask {
    cells: Vec<bool>,
}

impl CellMask {
    pub fn new() -> Self {
        Self {
            cells: vec![false; CHUNK_SIZE * CHUNK_SIZE],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> bool {
        self.cells[x * CHUNK_SIZE + z]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize) {
        self.cells[x * CHUNK_SIZE + z] = true;
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// True where every cell set in `self` is also set in `other`
    pub fn is_subset_of(&self, other: &CellMask) -> bool {
        self.cells.iter().zip(&other.cells).all(|(&a, &b)| !a || b)
    }
}

impl Default for CellMask {
    fn default() -> Self {
        Self::new()
    }
}
