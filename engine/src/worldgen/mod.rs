use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod checkerboard_generator;
pub mod flat_generator;
pub mod noise_generator;
pub mod terrain_generator;

pub use terrain_generator::TerrainGenerator;

use crate::worldgen::{
    checkerboard_generator::CheckerboardTerrainGenerator, flat_generator::FlatTerrainGenerator,
    noise_generator::NoiseTerrainGenerator,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorKind {
    Flat,
    #[default]
    Noise,
    Checkerboard,
}

pub fn create_generator(kind: GeneratorKind, seed: u32) -> Arc<dyn TerrainGenerator> {
    match kind {
        GeneratorKind::Flat => Arc::new(FlatTerrainGenerator::new(seed)),
        GeneratorKind::Noise => Arc::new(NoiseTerrainGenerator::new(seed)),
        GeneratorKind::Checkerboard => Arc::new(CheckerboardTerrainGenerator::new(seed)),
    }
}
