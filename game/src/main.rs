use std::time::Duration;

use anyhow::Context;
use voxel_stream::{
    World,
    assets::blocks::BlockRegistry,
    config::{config_manager::Config, world_config::WorldConfig},
    game_loop::{GameLoop, GameLoopConfig, GameLoopResult},
    viewer::Viewer,
};

use crate::{config::SandboxConfig, sandbox_game::SandboxGame};

mod config;
mod sandbox_game;
mod stats_report;
mod update_timer;

fn load_block_registry(config: &SandboxConfig) -> anyhow::Result<BlockRegistry> {
    match &config.block_definitions {
        Some(path) => BlockRegistry::load(path)
            .with_context(|| format!("Failed to load block definitions from {:?}", path)),
        None => Ok(BlockRegistry::with_builtin_blocks()),
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    log::info!("Starting voxel sandbox...");

    let world_config_manager = WorldConfig::create_manager()?;
    let world_config = world_config_manager.snapshot();
    let sandbox_config = SandboxConfig::create_manager()?.snapshot();
    log::info!(
        "View distance {}, {:?} terrain, {:?} jobs",
        world_config.view_distance,
        world_config.generator,
        world_config.execution
    );

    let blocks = load_block_registry(&sandbox_config)?;
    let world = World::from_config(&world_config);
    let game = SandboxGame::new(world, Viewer::new(), blocks, sandbox_config.clone())?
        .with_world_config(world_config_manager);

    let mut game_loop = GameLoop::new(
        game,
        GameLoopConfig {
            updates_per_s: sandbox_config.updates_per_s,
            max_frame_time_s: 0.2,
        },
    );

    while game_loop.next_frame()? == GameLoopResult::Continue {
        profiling::finish_frame!();
        std::thread::sleep(Duration::from_millis(1));
    }

    game_loop.game.shutdown()?;
    log::info!(
        "Simulated {} updates in {:.1} s",
        game_loop.game.updates(),
        game_loop.running_time_s()
    );

    Ok(())
}
