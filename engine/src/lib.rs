pub mod assets;
pub mod config;
pub mod game_loop;
pub mod job_slot;
pub mod math;
pub mod mesh_generation;
pub mod raycast;
pub mod viewer;
pub mod voxels;
pub mod world;
pub mod world_stats;
pub mod worldgen;

pub use raycast::{RaycastHandle, RaycastHit};
pub use world::World;
