//! World storage: chunks, their grids and renderer-facing meshes

pub mod chunk;
pub mod grid;
pub mod mesh;

pub use chunk::{Chunk, ChunkCoord, ChunkState, EdgeNeighbors, CHUNK_SIZE};
pub use grid::{CellMask, HeightGrid, GRID_SIZE};
pub use mesh::{build_grass_batches, GrassBatch, MeshBatch, TerrainMesh, TerrainVertex};
