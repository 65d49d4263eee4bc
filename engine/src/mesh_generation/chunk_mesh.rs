use glam::{IVec3, Vec3};

/// Surface mesh of a voxel region. Positions are relative to `origin`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub origin: IVec3,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Block type of the voxel each vertex belongs to
    pub materials: Vec<u16>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn new(origin: IVec3) -> Self {
        ChunkMesh {
            origin,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn approximate_size(&self) -> usize {
        self.positions.len() * std::mem::size_of::<Vec3>() * 2
            + self.materials.len() * std::mem::size_of::<u16>()
            + self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Whether any face of this mesh lies on the given world-space voxel
    pub fn touches_voxel(&self, voxel: IVec3) -> bool {
        let min = (voxel - self.origin).as_vec3();
        let max = min + Vec3::ONE;
        self.indices.chunks_exact(6).any(|quad| {
            quad.iter().all(|&index| {
                let p = self.positions[index as usize];
                p.cmpge(min).all() && p.cmple(max).all()
            })
        })
    }
}
