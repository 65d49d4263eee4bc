use std::{collections::VecDeque, task::Poll, time::Instant};

use anyhow::Context;
use voxel_stream::{
    RaycastHandle, World,
    assets::blocks::BlockRegistry,
    config::{config_manager::ConfigManager, world_config::WorldConfig},
    game_loop::{Game, GameLoopTime},
    viewer::Viewer,
    voxels::block::Block,
};

use crate::{config::SandboxConfig, stats_report::format_world_statistics, update_timer::UpdateTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Dig,
    Place,
}

impl EditAction {
    fn next(self) -> EditAction {
        match self {
            EditAction::Dig => EditAction::Place,
            EditAction::Place => EditAction::Dig,
        }
    }
}

/// Flies a viewer over the world and alternately digs and places blocks where it looks
pub struct SandboxGame {
    world: World,
    viewer: Viewer,
    blocks: BlockRegistry,
    place_block: Block,
    config: SandboxConfig,
    world_config: Option<ConfigManager<WorldConfig>>,

    pending_raycasts: VecDeque<(EditAction, RaycastHandle)>,
    next_action: EditAction,

    updates: u64,
    edits_requested: u64,
    raycast_misses: u64,
    update_timer: UpdateTimer,
    last_report_s: f64,
}

impl Game for SandboxGame {
    #[profiling::function]
    fn update(&mut self, time: &GameLoopTime) -> anyhow::Result<()> {
        let delta_time_s = time.delta_time_s as f32;
        self.viewer.update(delta_time_s);

        if self.updates % self.config.edit_interval as u64 == 0 {
            let ray = self.viewer.look_ray(self.config.edit_ray_pitch);
            let handle = self.world.request_raycast(ray);
            self.pending_raycasts.push_back((self.next_action, handle));
            self.next_action = self.next_action.next();
        }

        let start = Instant::now();
        self.world.update(delta_time_s, self.viewer.position());
        self.update_timer.record(start.elapsed());

        self.handle_raycast_results();
        self.updates += 1;
        Ok(())
    }

    fn frame_finished(&mut self, time: &GameLoopTime) -> anyhow::Result<()> {
        if time.elapsed_time_s - self.last_report_s >= self.config.stats_interval_s {
            self.last_report_s = time.elapsed_time_s;
            self.log_statistics();
            self.tune_view_distance();
        }
        Ok(())
    }

    fn should_exit(&self) -> bool {
        self.config.ticks > 0 && self.updates >= self.config.ticks
    }
}

impl SandboxGame {
    pub fn new(
        world: World,
        viewer: Viewer,
        blocks: BlockRegistry,
        config: SandboxConfig,
    ) -> anyhow::Result<Self> {
        let place_block = blocks
            .get_by_name(&config.place_block)
            .with_context(|| format!("Unknown block '{}'", config.place_block))?;

        Ok(SandboxGame {
            world,
            viewer,
            blocks,
            place_block,
            config,
            world_config: None,
            pending_raycasts: VecDeque::new(),
            next_action: EditAction::Dig,
            updates: 0,
            edits_requested: 0,
            raycast_misses: 0,
            update_timer: UpdateTimer::new(),
            last_report_s: 0.0,
        })
    }

    /// View distance changes made while tuning are saved through this manager
    pub fn with_world_config(mut self, manager: ConfigManager<WorldConfig>) -> Self {
        self.world_config = Some(manager);
        self
    }

    fn tune_view_distance(&mut self) {
        if self.config.update_budget_ms <= 0.0 {
            return;
        }

        let average_ms = self.update_timer.average().as_secs_f64() * 1000.0;
        let view_distance = self.world.view_distance();
        if average_ms <= self.config.update_budget_ms || view_distance <= 1 {
            return;
        }

        let reduced = view_distance - 1;
        log::warn!(
            "Updates average {:.2} ms (budget {:.2} ms), lowering view distance to {}",
            average_ms,
            self.config.update_budget_ms,
            reduced
        );
        self.world.set_view_distance(reduced);

        if let Some(manager) = &self.world_config {
            manager.update_and_save(|config| config.view_distance = reduced);
        }
    }

    fn handle_raycast_results(&mut self) {
        // Answers arrive in request order, so only the front can be ready
        while let Some((action, handle)) = self.pending_raycasts.front_mut() {
            let action = *action;
            let Poll::Ready(result) = handle.poll() else {
                break;
            };
            self.pending_raycasts.pop_front();

            let Some(hit) = result else {
                self.raycast_misses += 1;
                continue;
            };

            match action {
                EditAction::Dig => {
                    log::debug!(
                        "Digging {} at {:?}",
                        self.blocks.name_of(hit.block).unwrap_or("unknown block"),
                        hit.voxel
                    );
                    self.world.request_voxel_edit(hit.voxel, Block::AIR);
                    self.edits_requested += 1;
                }
                EditAction::Place => {
                    if let Some(target) = hit.adjacent_voxel() {
                        log::debug!("Placing block at {:?}", target);
                        self.world.request_voxel_edit(target, self.place_block);
                        self.edits_requested += 1;
                    }
                }
            }
        }
    }

    pub fn log_statistics(&self) {
        log::info!(
            "update avg {:.2} ms, max {:.2} ms | edits {} misses {} | {}",
            self.update_timer.average().as_secs_f64() * 1000.0,
            self.update_timer.slowest().as_secs_f64() * 1000.0,
            self.edits_requested,
            self.raycast_misses,
            format_world_statistics(&self.world.statistics())
        );
    }

    /// Lets the last job finish so the final statistics are complete, and flushes
    /// the world config
    pub fn shutdown(&mut self) -> anyhow::Result<()> {
        self.world.finish_pending_job();
        self.log_statistics();

        if let Some(manager) = &self.world_config {
            manager
                .save_now()
                .context("Failed to save the world config")?;
        }
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn edits_requested(&self) -> u64 {
        self.edits_requested
    }

    pub fn raycast_misses(&self) -> u64 {
        self.raycast_misses
    }
}
