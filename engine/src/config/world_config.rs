use serde::{Deserialize, Serialize};

use crate::{config::config_manager::Config, job_slot::ExecutionMode, worldgen::GeneratorKind};

pub const MAX_VIEW_DISTANCE: u32 = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Radius of the streamed square around the viewer, in chunks. 0 streams nothing.
    pub view_distance: u32,
    /// Chunks span `-chunk_half_height..chunk_half_height` vertically
    pub chunk_half_height: i32,
    pub raycast_max_distance: f32,
    pub seed: u32,
    pub generator: GeneratorKind,
    pub execution: ExecutionMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            view_distance: 4,
            chunk_half_height: 64,
            raycast_max_distance: 64.0,
            seed: 0,
            generator: GeneratorKind::default(),
            execution: ExecutionMode::default(),
        }
    }
}

impl Config for WorldConfig {
    fn get_path() -> &'static str {
        "world.ron"
    }

    fn is_valid(&self) -> bool {
        self.view_distance <= MAX_VIEW_DISTANCE
            && self.chunk_half_height > 0
            && self.raycast_max_distance.is_finite()
            && self.raycast_max_distance > 0.0
    }
}
