use crate::voxels::chunk::ChunkState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunksByState([u32; ChunkState::TOTAL_STATES]);

impl ChunksByState {
    pub fn increment(&mut self, state: ChunkState) {
        self.0[state as usize] += 1;
    }

    pub fn get(&self, state: ChunkState) -> u32 {
        self.0[state as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkState, u32)> + '_ {
        ChunkState::ALL
            .iter()
            .map(|&state| (state, self.get(state)))
    }
}

/// Snapshot of a world's bookkeeping, taken between updates
#[derive(Debug, Default, Clone)]
pub struct WorldStatistics {
    pub total_chunks: usize,
    pub active_chunks: usize,
    pub chunks_by_state: ChunksByState,
    pub queued_edits: usize,
    pub queued_raycasts: usize,
    pub streaming_queue: usize,
    pub batch_queue: usize,
    pub job_in_flight: bool,
    pub jobs_launched: u64,
    pub jobs_completed: u64,
    /// Volume memory, only known while the volume isn't lent out to a job
    pub approximate_volume_bytes: Option<usize>,
    pub approximate_mesh_bytes: usize,
}

impl WorldStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}
