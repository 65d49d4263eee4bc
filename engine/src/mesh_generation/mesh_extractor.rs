use crate::{
    math::aabb::VoxelRegion, mesh_generation::chunk_mesh::ChunkMesh, voxels::volume::Volume,
};

/// Turns the solid/air boundary inside a region of the volume into a mesh.
///
/// Voxels just outside the region are read to decide whether faces on the region's
/// border are exposed, but no geometry is produced for them.
pub trait MeshExtractor: Send + Sync + 'static {
    fn extract(&self, volume: &dyn Volume, region: VoxelRegion) -> ChunkMesh;
}
