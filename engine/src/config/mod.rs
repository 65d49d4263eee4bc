pub mod config_manager;
pub mod world_config;
