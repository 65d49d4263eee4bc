use crate::{
    math::aabb::VoxelRegion,
    mesh_generation::{chunk_mesh::ChunkMesh, mesh_extractor::MeshExtractor},
    voxels::{coord::WorldPos, face::Face, volume::Volume},
};

/// Emits one quad per exposed voxel face. No face merging.
#[derive(Debug, Default, Clone, Copy)]
pub struct CulledMesher;

impl CulledMesher {
    pub fn new() -> Self {
        CulledMesher
    }
}

impl MeshExtractor for CulledMesher {
    #[profiling::function]
    fn extract(&self, volume: &dyn Volume, region: VoxelRegion) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(region.min);

        for pos in region.iter() {
            let block = volume.get_voxel(WorldPos(pos));
            if block.is_air() {
                continue;
            }

            let local = (pos - region.min).as_vec3();

            for face in Face::ALL {
                let neighbor = volume.get_voxel(WorldPos(pos + face.to_ivec3()));
                if neighbor.is_solid() {
                    continue;
                }

                let start_index = mesh.positions.len() as u32;
                for corner in face.vertices() {
                    mesh.positions.push(local + corner.as_vec3());
                    mesh.normals.push(face.normal());
                    mesh.materials.push(block.block_type());
                }
                mesh.indices.extend_from_slice(&Face::indices(start_index));
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::voxels::{block::Block, volume::SparseVolume};

    fn region_16(min: IVec3) -> VoxelRegion {
        VoxelRegion::new(min, min + IVec3::splat(16))
    }

    #[test]
    fn test_empty_region_has_no_geometry() {
        let volume = SparseVolume::new();
        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_single_voxel() {
        let mut volume = SparseVolume::new();
        volume.set_voxel(WorldPos::new(8, 8, 8), Block::STONE);

        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));

        // 6 quads, 4 vertices and 6 indices each
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.materials.iter().all(|&m| m == Block::STONE.block_type()));
        assert!(mesh.touches_voxel(IVec3::new(8, 8, 8)));
        assert!(!mesh.touches_voxel(IVec3::new(10, 8, 8)));
    }

    #[test]
    fn test_shared_faces_are_culled() {
        let mut volume = SparseVolume::new();
        volume.set_voxel(WorldPos::new(8, 8, 8), Block::STONE);
        volume.set_voxel(WorldPos::new(9, 8, 8), Block::DIRT);

        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_region_border_reads_neighbor_voxels() {
        let mut volume = SparseVolume::new();
        // Voxel on the X+ border of the region
        volume.set_voxel(WorldPos::new(15, 8, 8), Block::STONE);

        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));
        let has_right_face = mesh.normals.iter().any(|n| *n == Face::Right.normal());
        assert!(has_right_face, "Exposed border face should be emitted");

        // Solid voxel in the neighboring region hides it
        volume.set_voxel(WorldPos::new(16, 8, 8), Block::STONE);
        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));
        let has_right_face = mesh.normals.iter().any(|n| *n == Face::Right.normal());
        assert!(!has_right_face, "Face against a solid neighbor should be culled");
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn test_voxels_outside_region_produce_no_geometry() {
        let mut volume = SparseVolume::new();
        volume.set_voxel(WorldPos::new(16, 8, 8), Block::STONE);
        let mesh = CulledMesher.extract(&volume, region_16(IVec3::ZERO));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_positions_are_relative_to_region() {
        let mut volume = SparseVolume::new();
        volume.set_voxel(WorldPos::new(-16, -4, 32), Block::STONE);
        let region = VoxelRegion::new(IVec3::new(-16, -8, 32), IVec3::new(0, 8, 48));

        let mesh = CulledMesher.extract(&volume, region);
        assert_eq!(mesh.origin, IVec3::new(-16, -8, 32));
        assert!(mesh.touches_voxel(IVec3::new(-16, -4, 32)));
        assert!(
            mesh.positions
                .iter()
                .all(|p| p.cmpge(glam::Vec3::ZERO).all() && p.cmple(glam::Vec3::splat(16.0)).all())
        );
    }
}
