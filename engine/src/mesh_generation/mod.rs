pub mod chunk_mesh;
pub mod culled_mesher;
pub mod mesh_extractor;
