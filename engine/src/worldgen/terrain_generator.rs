use crate::voxels::{chunk::ChunkFootprint, volume::Volume};

/// Writes the initial terrain of a chunk column into the volume.
///
/// Called at most once per chunk over the lifetime of a world, on the generation worker.
pub trait TerrainGenerator: Send + Sync + 'static {
    fn new(seed: u32) -> Self
    where
        Self: Sized;

    fn fill(&self, volume: &mut dyn Volume, footprint: ChunkFootprint);
}
