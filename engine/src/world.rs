use std::{
    collections::{VecDeque, hash_map::Entry},
    sync::Arc,
};

use ahash::AHashMap;
use glam::Vec3;
use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
use tinyvec::ArrayVec;

use crate::{
    config::world_config::{MAX_VIEW_DISTANCE, WorldConfig},
    job_slot::{ExecutionMode, JobSlot},
    math::{aabb::VoxelRegion, ray::Ray},
    mesh_generation::{
        chunk_mesh::ChunkMesh, culled_mesher::CulledMesher, mesh_extractor::MeshExtractor,
    },
    raycast::{RaycastHandle, RaycastRequest, cast_ray},
    voxels::{
        block::Block,
        chunk::{CHUNK_SIZE, Chunk, ChunkFootprint, ChunkMaterial, ChunkState},
        coord::{ChunkPos, WorldPos, WorldPosF},
        volume::{SparseVolume, Volume},
    },
    world_stats::WorldStatistics,
    worldgen::{TerrainGenerator, create_generator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEdit {
    pub pos: WorldPos,
    pub block: Block,
}

enum GenerationJob {
    /// Remesh every chunk of an edit batch
    Remesh(Vec<(ChunkPos, VoxelRegion)>),
    /// First generation of a streamed chunk
    Generate {
        pos: ChunkPos,
        footprint: ChunkFootprint,
        region: VoxelRegion,
    },
}

struct GenerationOutput {
    volume: Box<dyn Volume>,
    meshes: Vec<(ChunkPos, Arc<ChunkMesh>)>,
}

#[profiling::function]
fn run_generation_job(
    job: GenerationJob,
    mut volume: Box<dyn Volume>,
    generator: &dyn TerrainGenerator,
    extractor: &dyn MeshExtractor,
) -> GenerationOutput {
    let meshes = match job {
        GenerationJob::Remesh(chunks) => chunks
            .into_iter()
            .map(|(pos, region)| (pos, Arc::new(extractor.extract(&*volume, region))))
            .collect(),
        GenerationJob::Generate {
            pos,
            footprint,
            region,
        } => {
            generator.fill(&mut *volume, footprint);
            vec![(pos, Arc::new(extractor.extract(&*volume, region)))]
        }
    };

    GenerationOutput { volume, meshes }
}

/// Chunk offsets at exactly `ring` chunks (Chebyshev) from the centre
fn ring_offsets(ring: i32) -> impl Iterator<Item = ChunkPos> {
    (-ring..=ring).flat_map(move |z| {
        (-ring..=ring)
            .filter(move |x| x.abs().max(z.abs()) == ring)
            .map(move |x| ChunkPos::new(x, z))
    })
}

/// The chunk owning `pos`, plus the chunks across the X and Z borders it sits on
fn chunks_touched_by(pos: WorldPos) -> ArrayVec<[ChunkPos; 3]> {
    let owner = pos.to_chunk_pos();
    let local = pos.to_chunk_local();
    let mut touched = ArrayVec::new();
    touched.push(owner);

    if local.x == 0 {
        touched.push(owner + ChunkPos::new(-1, 0));
    } else if local.x == CHUNK_SIZE - 1 {
        touched.push(owner + ChunkPos::new(1, 0));
    }

    if local.z == 0 {
        touched.push(owner + ChunkPos::new(0, -1));
    } else if local.z == CHUNK_SIZE - 1 {
        touched.push(owner + ChunkPos::new(0, 1));
    }

    touched
}

fn clamp_view_distance(view_distance: u32) -> u32 {
    if view_distance > MAX_VIEW_DISTANCE {
        warn!(
            "View distance {} is above the maximum of {}, clamping",
            view_distance, MAX_VIEW_DISTANCE
        );
    }
    view_distance.min(MAX_VIEW_DISTANCE)
}

/// Streams chunks around a viewer and keeps their meshes in sync with the volume.
///
/// All volume access goes through a single job slot. While a job runs, the volume is
/// moved into it, so edits and raycasts submitted in the meantime stay queued until
/// the job has been collected.
pub struct World {
    view_distance: u32,
    chunk_half_height: i32,
    raycast_max_distance: f32,

    chunks: AHashMap<ChunkPos, Chunk>,
    active_chunks: Vec<ChunkPos>,
    viewer_chunk: Option<ChunkPos>,

    /// `None` while lent out to the running job
    volume: Option<Box<dyn Volume>>,
    generator: Arc<dyn TerrainGenerator>,
    extractor: Arc<dyn MeshExtractor>,
    chunk_material: ChunkMaterial,

    edits: VecDeque<BlockEdit>,
    raycasts: VecDeque<RaycastRequest>,
    streaming_queue: VecDeque<ChunkPos>,
    batch_queue: Vec<ChunkPos>,

    job_slot: JobSlot<GenerationOutput>,
    results: Vec<(ChunkPos, Arc<ChunkMesh>)>,

    frame: u64,
    elapsed_time: f64,
}

impl World {
    pub fn new(
        config: &WorldConfig,
        volume: Box<dyn Volume>,
        generator: Arc<dyn TerrainGenerator>,
        extractor: Arc<dyn MeshExtractor>,
    ) -> Self {
        World {
            view_distance: clamp_view_distance(config.view_distance),
            chunk_half_height: config.chunk_half_height,
            raycast_max_distance: config.raycast_max_distance,
            chunks: AHashMap::new(),
            active_chunks: Vec::new(),
            viewer_chunk: None,
            volume: Some(volume),
            generator,
            extractor,
            chunk_material: ChunkMaterial::default(),
            edits: VecDeque::new(),
            raycasts: VecDeque::new(),
            streaming_queue: VecDeque::new(),
            batch_queue: Vec::new(),
            job_slot: JobSlot::new(config.execution),
            results: Vec::new(),
            frame: 0,
            elapsed_time: 0.0,
        }
    }

    /// Empty sparse volume, culled meshing and the configured terrain generator
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(
            config,
            Box::new(SparseVolume::new()),
            create_generator(config.generator, config.seed),
            Arc::new(CulledMesher::new()),
        )
    }

    /// Queues a voxel write. Applied on the next update that finds the job slot free.
    pub fn request_voxel_edit(&mut self, pos: WorldPos, block: Block) {
        self.edits.push_back(BlockEdit { pos, block });
    }

    /// Queues a raycast. Answered during a later update, in submission order.
    pub fn request_raycast(&mut self, ray: Ray) -> RaycastHandle {
        let (handle, responder) = RaycastHandle::new();
        self.raycasts.push_back(RaycastRequest { ray, responder });
        handle
    }

    /// Used for chunks whose terrain hasn't been generated yet
    pub fn set_terrain_generator(&mut self, generator: Arc<dyn TerrainGenerator>) {
        self.generator = generator;
    }

    /// Takes effect on the next update. Values above `MAX_VIEW_DISTANCE` are clamped.
    pub fn set_view_distance(&mut self, view_distance: u32) {
        self.view_distance = clamp_view_distance(view_distance);
    }

    /// Material assigned along with every mesh published from now on
    pub fn set_chunk_material(&mut self, material: ChunkMaterial) {
        self.chunk_material = material;
    }

    #[profiling::function]
    pub fn update(&mut self, delta_time: f32, viewer: Vec3) {
        self.frame += 1;
        self.elapsed_time += delta_time as f64;

        self.collect_finished_job();
        self.apply_edits();
        self.update_visibility(viewer);
        self.service_raycasts();
        self.launch_next_job();
        self.collect_finished_job();
    }

    /// Blocks until the running job (if any) is done and publishes its results
    pub fn finish_pending_job(&mut self) {
        if let Some(output) = self.job_slot.wait() {
            self.absorb_output(output);
            self.publish_results();
        }
    }

    fn collect_finished_job(&mut self) {
        if let Some(output) = self.job_slot.try_collect() {
            self.absorb_output(output);
        }
        self.publish_results();
    }

    fn absorb_output(&mut self, output: GenerationOutput) {
        assert!(self.volume.is_none(), "Job returned a second volume");
        self.volume = Some(output.volume);
        self.results.extend(output.meshes);
    }

    fn publish_results(&mut self) {
        if self.results.is_empty() {
            return;
        }

        debug!(
            "Publishing {} chunk meshes in frame {}",
            self.results.len(),
            self.frame
        );

        for (pos, mesh) in self.results.drain(..) {
            let chunk = self
                .chunks
                .get_mut(&pos)
                .unwrap_or_else(|| panic!("Received a mesh for unknown chunk {:?}", pos));

            assert!(
                matches!(
                    chunk.state(),
                    ChunkState::Generating | ChunkState::Regenerating
                ),
                "Chunk {:?} received a mesh while {:?}",
                pos,
                chunk.state()
            );

            chunk
                .renderable_mut()
                .assign(mesh, self.chunk_material, self.frame);
            chunk.set_state(ChunkState::Meshed);
        }
    }

    #[profiling::function]
    fn apply_edits(&mut self) {
        if self.volume.is_none() {
            if !self.edits.is_empty() {
                trace!("Deferring {} edits, job in flight", self.edits.len());
            }
            return;
        }

        while let Some(edit) = self.edits.front().copied() {
            let chunk_pos = edit.pos.to_chunk_pos();

            // Writing before the terrain fill would get the edit overwritten
            if !self.is_terrain_filled(chunk_pos) {
                self.prioritize_streaming(chunk_pos);
                break;
            }

            self.edits.pop_front();
            if let Some(volume) = self.volume.as_mut() {
                volume.set_voxel(edit.pos, edit.block);
            }

            for pos in chunks_touched_by(edit.pos) {
                self.invalidate_chunk(pos);
            }
        }
    }

    fn is_terrain_filled(&self, pos: ChunkPos) -> bool {
        self.chunks
            .get(&pos)
            .is_some_and(|chunk| chunk.is_terrain_filled())
    }

    /// Moves a chunk to the front of the streaming queue, creating it if needed
    fn prioritize_streaming(&mut self, pos: ChunkPos) {
        match self.chunks.entry(pos) {
            Entry::Occupied(entry) => {
                let chunk = entry.get();
                assert_eq!(
                    chunk.state(),
                    ChunkState::Pending,
                    "Unfilled chunk {:?} is not waiting for generation",
                    pos
                );

                let index = self
                    .streaming_queue
                    .iter()
                    .position(|&queued| queued == pos)
                    .unwrap_or_else(|| panic!("Pending chunk {:?} is not queued", pos));
                if index > 0 {
                    self.streaming_queue.remove(index);
                    self.streaming_queue.push_front(pos);
                }
            }
            Entry::Vacant(entry) => {
                debug!("Creating chunk {:?} for a pending edit", pos);
                entry.insert(Chunk::new(pos, self.chunk_half_height));
                self.streaming_queue.push_front(pos);
            }
        }
    }

    /// Schedules a meshed chunk for the next edit batch. Chunks that have never been
    /// meshed will see the edit when they are.
    fn invalidate_chunk(&mut self, pos: ChunkPos) {
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            return;
        };

        match chunk.state() {
            ChunkState::Meshed => {
                chunk.set_state(ChunkState::PendingRegeneration);
                self.batch_queue.push(pos);
            }
            ChunkState::Pending | ChunkState::PendingRegeneration => {}
            state @ (ChunkState::Generating | ChunkState::Regenerating) => {
                panic!("Edited chunk {:?} while it was {:?}", pos, state)
            }
        }
    }

    #[profiling::function]
    fn update_visibility(&mut self, viewer: Vec3) {
        let center = WorldPosF(viewer).to_chunk_pos();
        if self.viewer_chunk != Some(center) {
            trace!("Viewer entered chunk {:?}", center);
            self.viewer_chunk = Some(center);
        }

        for pos in self.active_chunks.drain(..) {
            if let Some(chunk) = self.chunks.get_mut(&pos) {
                chunk.set_active(false);
            }
        }

        if self.view_distance == 0 {
            return;
        }

        for ring in 0..=self.view_distance as i32 {
            let mut ring_positions = ring_offsets(ring)
                .map(|offset| center + offset)
                .collect::<Vec<_>>();
            // Nearest first, so the streaming queue fills in from the viewer outwards
            ring_positions.sort_by_key(|pos| {
                let distance = pos.center(viewer.y).distance_squared(viewer);
                (OrderedFloat(distance), *pos)
            });

            for pos in ring_positions {
                match self.chunks.entry(pos) {
                    Entry::Occupied(entry) => entry.into_mut().set_active(true),
                    Entry::Vacant(entry) => {
                        trace!("Creating chunk {:?}", pos);
                        let chunk = entry.insert(Chunk::new(pos, self.chunk_half_height));
                        chunk.set_active(true);
                        self.streaming_queue.push_back(pos);
                    }
                }
                self.active_chunks.push(pos);
            }
        }
    }

    fn service_raycasts(&mut self) {
        let Some(volume) = self.volume.as_deref() else {
            return;
        };

        while let Some(request) = self.raycasts.pop_front() {
            let hit = cast_ray(volume, &request.ray, self.raycast_max_distance);
            // The caller may have dropped its handle
            let _ = request.responder.send(hit);
        }
    }

    fn launch_next_job(&mut self) {
        if self.job_slot.is_busy() {
            return;
        }

        let job = if !self.batch_queue.is_empty() {
            let batch = std::mem::take(&mut self.batch_queue);
            debug!("Launching remesh of {} edited chunks", batch.len());

            let regions = batch
                .into_iter()
                .map(|pos| {
                    let chunk = self.chunk_mut(pos);
                    assert_eq!(chunk.state(), ChunkState::PendingRegeneration);
                    chunk.set_state(ChunkState::Regenerating);
                    (pos, chunk.region())
                })
                .collect();

            GenerationJob::Remesh(regions)
        } else if let Some(pos) = self.streaming_queue.pop_front() {
            let chunk = self.chunk_mut(pos);
            assert_eq!(
                chunk.state(),
                ChunkState::Pending,
                "Chunk {:?} was queued for generation twice",
                pos
            );
            chunk.mark_terrain_filled();
            chunk.set_state(ChunkState::Generating);
            trace!("Launching generation of chunk {:?}", pos);

            GenerationJob::Generate {
                pos,
                footprint: chunk.footprint(),
                region: chunk.region(),
            }
        } else {
            return;
        };

        let Some(volume) = self.volume.take() else {
            panic!("Volume is missing while the job slot is free");
        };
        let generator = self.generator.clone();
        let extractor = self.extractor.clone();

        let launched = self.job_slot.try_launch(move || {
            run_generation_job(job, volume, &*generator, &*extractor)
        });
        assert!(launched.is_ok(), "Job slot was taken during launch");
    }

    fn chunk_mut(&mut self, pos: ChunkPos) -> &mut Chunk {
        self.chunks
            .get_mut(&pos)
            .unwrap_or_else(|| panic!("Chunk {:?} is missing from the chunk table", pos))
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn active_chunks(&self) -> &[ChunkPos] {
        &self.active_chunks
    }

    /// Reads a voxel, unless the volume is lent out to a running job
    pub fn voxel(&self, pos: WorldPos) -> Option<Block> {
        self.volume.as_ref().map(|volume| volume.get_voxel(pos))
    }

    pub fn volume(&self) -> Option<&dyn Volume> {
        self.volume.as_deref()
    }

    pub fn is_job_in_flight(&self) -> bool {
        self.job_slot.is_busy()
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.job_slot.mode()
    }

    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    pub fn viewer_chunk(&self) -> Option<ChunkPos> {
        self.viewer_chunk
    }

    /// Number of updates run so far. Meshes record the frame they were published in.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn statistics(&self) -> WorldStatistics {
        let mut statistics = WorldStatistics::new();

        for chunk in self.chunks.values() {
            statistics.chunks_by_state.increment(chunk.state());
            if let Some(mesh) = chunk.renderable().mesh() {
                statistics.approximate_mesh_bytes += mesh.approximate_size();
            }
        }

        statistics.total_chunks = self.chunks.len();
        statistics.active_chunks = self.active_chunks.len();
        statistics.queued_edits = self.edits.len();
        statistics.queued_raycasts = self.raycasts.len();
        statistics.streaming_queue = self.streaming_queue.len();
        statistics.batch_queue = self.batch_queue.len();
        statistics.job_in_flight = self.job_slot.is_busy();
        statistics.jobs_launched = self.job_slot.jobs_launched();
        statistics.jobs_completed = self.job_slot.jobs_completed();
        statistics.approximate_volume_bytes =
            self.volume.as_ref().map(|volume| volume.approximate_size());
        statistics
    }
}
