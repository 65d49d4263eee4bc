use std::sync::Arc;

use glam::{IVec2, IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    math::aabb::{Aabb, VoxelRegion},
    mesh_generation::chunk_mesh::ChunkMesh,
    voxels::coord::ChunkPos,
};

/// Width and depth of a chunk column, in voxels
pub const CHUNK_SIZE: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkState {
    /// Waiting in the streaming queue for its first generation
    Pending,
    /// Terrain fill and first meshing in progress on the worker
    Generating,
    /// Has a published mesh
    Meshed,
    /// Invalidated by an edit, waiting in the batch queue
    PendingRegeneration,
    /// Remeshing in progress on the worker
    Regenerating,
}

impl ChunkState {
    pub const TOTAL_STATES: usize = 5;

    pub const ALL: [ChunkState; Self::TOTAL_STATES] = [
        ChunkState::Pending,
        ChunkState::Generating,
        ChunkState::Meshed,
        ChunkState::PendingRegeneration,
        ChunkState::Regenerating,
    ];
}

/// Handle to the material every chunk renderable shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkMaterial(pub u32);

/// What the scene graph draws for a chunk. The world only ever assigns mesh,
/// material and visibility, it never owns graphics resources.
#[derive(Debug, Clone, Default)]
pub struct Renderable {
    mesh: Option<Arc<ChunkMesh>>,
    material: Option<ChunkMaterial>,
    visible: bool,
    revision: u32,
    published_frame: Option<u64>,
}

impl Renderable {
    pub fn mesh(&self) -> Option<&Arc<ChunkMesh>> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<ChunkMaterial> {
        self.material
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of meshes assigned so far
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// World frame in which the current mesh was published
    pub fn published_frame(&self) -> Option<u64> {
        self.published_frame
    }

    pub(crate) fn assign(&mut self, mesh: Arc<ChunkMesh>, material: ChunkMaterial, frame: u64) {
        self.mesh = Some(mesh);
        self.material = Some(material);
        self.revision += 1;
        self.published_frame = Some(frame);
    }
}

/// XZ extent of a chunk column plus the vertical range terrain may be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkFootprint {
    pub pos: ChunkPos,
    /// World-space XZ of the minimum corner
    pub origin: IVec2,
    pub min_y: i32,
    /// Exclusive
    pub max_y: i32,
}

impl ChunkFootprint {
    pub fn iter_columns(&self) -> impl Iterator<Item = IVec2> + use<> {
        let origin = self.origin;
        (0..CHUNK_SIZE).flat_map(move |z| (0..CHUNK_SIZE).map(move |x| origin + IVec2::new(x, z)))
    }
}

pub struct Chunk {
    pos: ChunkPos,
    half_height: i32,
    state: ChunkState,
    active: bool,
    terrain_filled: bool,
    renderable: Renderable,
}

impl Chunk {
    pub fn new(pos: ChunkPos, half_height: i32) -> Self {
        Chunk {
            pos,
            half_height,
            state: ChunkState::Pending,
            active: false,
            terrain_filled: false,
            renderable: Renderable::default(),
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ChunkState) {
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggles visibility. Voxel and mesh data are left alone.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.renderable.visible = active;
    }

    pub fn is_terrain_filled(&self) -> bool {
        self.terrain_filled
    }

    pub(crate) fn mark_terrain_filled(&mut self) {
        assert!(
            !self.terrain_filled,
            "Terrain for chunk {:?} was filled twice",
            self.pos
        );
        self.terrain_filled = true;
    }

    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    pub(crate) fn renderable_mut(&mut self) -> &mut Renderable {
        &mut self.renderable
    }

    pub fn world_bounds(&self) -> Aabb {
        let origin = self.pos.origin().0;
        let height = self.half_height as f32;
        Aabb::new(
            Vec3::new(origin.x as f32, -height, origin.z as f32),
            Vec3::new(
                (origin.x + CHUNK_SIZE) as f32,
                height,
                (origin.z + CHUNK_SIZE) as f32,
            ),
        )
    }

    /// The voxels the mesh of this chunk is extracted from
    pub fn region(&self) -> VoxelRegion {
        let origin = self.pos.origin().0;
        VoxelRegion::new(
            IVec3::new(origin.x, -self.half_height, origin.z),
            IVec3::new(
                origin.x + CHUNK_SIZE,
                self.half_height,
                origin.z + CHUNK_SIZE,
            ),
        )
    }

    pub fn footprint(&self) -> ChunkFootprint {
        let origin = self.pos.origin().0;
        ChunkFootprint {
            pos: self.pos,
            origin: IVec2::new(origin.x, origin.z),
            min_y: -self.half_height,
            max_y: self.half_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_chunk_position() {
        let chunk = Chunk::new(ChunkPos::new(-1, 2), 64);
        let bounds = chunk.world_bounds();
        assert_eq!(bounds.min, Vec3::new(-16.0, -64.0, 32.0));
        assert_eq!(bounds.max, Vec3::new(0.0, 64.0, 48.0));

        let region = chunk.region();
        assert_eq!(region.min, IVec3::new(-16, -64, 32));
        assert_eq!(region.max, IVec3::new(0, 64, 48));
        assert_eq!(region.to_aabb(), bounds);
    }

    #[test]
    fn test_footprint_columns() {
        let chunk = Chunk::new(ChunkPos::new(1, 0), 8);
        let footprint = chunk.footprint();
        let columns = footprint.iter_columns().collect::<Vec<_>>();
        assert_eq!(columns.len(), (CHUNK_SIZE * CHUNK_SIZE) as usize);
        assert_eq!(columns[0], IVec2::new(16, 0));
        assert_eq!(columns[columns.len() - 1], IVec2::new(31, 15));
    }

    #[test]
    fn test_set_active_only_toggles_visibility() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 8);
        let mesh = Arc::new(ChunkMesh::default());
        chunk
            .renderable_mut()
            .assign(mesh.clone(), ChunkMaterial(7), 3);
        chunk.set_state(ChunkState::Meshed);

        chunk.set_active(true);
        assert!(chunk.renderable().is_visible());
        chunk.set_active(false);
        assert!(!chunk.renderable().is_visible());
        chunk.set_active(true);

        assert_eq!(chunk.state(), ChunkState::Meshed);
        assert_eq!(chunk.renderable().revision(), 1);
        assert_eq!(chunk.renderable().published_frame(), Some(3));
        assert!(Arc::ptr_eq(chunk.renderable().mesh().unwrap(), &mesh));
        assert_eq!(chunk.renderable().material(), Some(ChunkMaterial(7)));
    }

    #[test]
    #[should_panic(expected = "filled twice")]
    fn test_double_fill_is_fatal() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 8);
        chunk.mark_terrain_filled();
        chunk.mark_terrain_filled();
    }
}
