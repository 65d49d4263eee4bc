use glam::DVec2;
use noise::{NoiseFn, SuperSimplex};

use crate::{
    voxels::{block::Block, chunk::ChunkFootprint, coord::WorldPos, volume::Volume},
    worldgen::terrain_generator::TerrainGenerator,
};

const HORIZONTAL_SCALE: f64 = 0.01;
const AMPLITUDE: f64 = 32.0;
const SEA_LEVEL: i32 = -6;

/// Rolling hills from 2D simplex noise. Low ground near sea level is sand.
pub struct NoiseTerrainGenerator {
    noise: SuperSimplex,
}

impl NoiseTerrainGenerator {
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let pos = DVec2::new(x as f64, z as f64) * HORIZONTAL_SCALE;
        (self.noise.get(pos.to_array()) * AMPLITUDE) as i32
    }
}

impl TerrainGenerator for NoiseTerrainGenerator {
    fn new(seed: u32) -> Self {
        Self {
            noise: SuperSimplex::new(seed),
        }
    }

    #[profiling::function]
    fn fill(&self, volume: &mut dyn Volume, footprint: ChunkFootprint) {
        for column in footprint.iter_columns() {
            let height = self.height_at(column.x, column.y);
            let top = height.min(footprint.max_y - 1);

            for y in footprint.min_y..=top {
                let block = if y == height {
                    if height <= SEA_LEVEL + 1 {
                        Block::SAND
                    } else {
                        Block::GRASS
                    }
                } else if y >= height - 3 {
                    Block::DIRT
                } else {
                    Block::STONE
                };
                volume.set_voxel(WorldPos::new(column.x, y, column.y), block);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::{chunk::Chunk, coord::ChunkPos, volume::SparseVolume};

    #[test]
    fn test_surface_matches_height() {
        let generator = NoiseTerrainGenerator::new(123_456);
        let mut volume = SparseVolume::new();
        let chunk = Chunk::new(ChunkPos::new(2, -3), 64);
        generator.fill(&mut volume, chunk.footprint());

        for column in chunk.footprint().iter_columns() {
            let height = generator.height_at(column.x, column.y);
            let surface = volume.get_voxel(WorldPos::new(column.x, height, column.y));
            assert!(surface == Block::GRASS || surface == Block::SAND);
            assert_eq!(
                volume.get_voxel(WorldPos::new(column.x, height + 1, column.y)),
                Block::AIR
            );
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = NoiseTerrainGenerator::new(7);
        let b = NoiseTerrainGenerator::new(7);
        for x in -40..40 {
            assert_eq!(a.height_at(x, x * 3), b.height_at(x, x * 3));
        }
    }
}
