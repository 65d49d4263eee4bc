use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use voxel_stream::config::config_manager::Config;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    /// Number of fixed updates to simulate. 0 runs until the process is killed.
    pub ticks: u64,
    pub updates_per_s: u32,
    /// Updates between two raycast-driven edits
    pub edit_interval: u32,
    /// How far below the view direction the edit ray points, in radians
    pub edit_ray_pitch: f32,
    pub stats_interval_s: f64,
    /// Average update time above which the view distance is lowered and saved to the
    /// world config. 0 disables tuning.
    pub update_budget_ms: f64,
    /// RON block definitions. The built-in blocks are used if unset.
    pub block_definitions: Option<PathBuf>,
    /// Block name placed by the sandbox
    pub place_block: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        SandboxConfig {
            ticks: 1800,
            updates_per_s: 60,
            edit_interval: 20,
            edit_ray_pitch: 0.6,
            stats_interval_s: 2.0,
            update_budget_ms: 8.0,
            block_definitions: None,
            place_block: "stone".to_string(),
        }
    }
}

impl Config for SandboxConfig {
    fn get_path() -> &'static str {
        "sandbox.ron"
    }

    fn is_valid(&self) -> bool {
        self.updates_per_s > 0
            && self.edit_interval > 0
            && self.stats_interval_s > 0.0
            && self.update_budget_ms >= 0.0
            && !self.place_block.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SandboxConfig::default().is_valid());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: SandboxConfig =
            ron::from_str("(ticks: 0, block_definitions: Some(\"assets/defs/blocks.ron\"))")
                .unwrap();
        assert_eq!(config.ticks, 0);
        assert_eq!(
            config.block_definitions,
            Some(PathBuf::from("assets/defs/blocks.ron"))
        );
        assert_eq!(config.updates_per_s, 60);
    }
}
