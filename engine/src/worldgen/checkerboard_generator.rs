use crate::{
    voxels::{block::Block, chunk::ChunkFootprint, coord::WorldPos, volume::Volume},
    worldgen::terrain_generator::TerrainGenerator,
};

/// Worst case for meshing: every other voxel in a slab below y = 0 is solid.
pub struct CheckerboardTerrainGenerator {
    pub depth: i32,
}

impl TerrainGenerator for CheckerboardTerrainGenerator {
    fn new(_seed: u32) -> Self {
        CheckerboardTerrainGenerator { depth: 8 }
    }

    #[profiling::function]
    fn fill(&self, volume: &mut dyn Volume, footprint: ChunkFootprint) {
        let bottom = (-self.depth).max(footprint.min_y);
        let top = 0.min(footprint.max_y);

        for column in footprint.iter_columns() {
            for y in bottom..top {
                if (column.x + y + column.y).rem_euclid(2) == 0 {
                    volume.set_voxel(WorldPos::new(column.x, y, column.y), Block::STONE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::{chunk::Chunk, coord::ChunkPos, volume::SparseVolume};

    #[test]
    fn test_checkerboard_pattern() {
        let mut volume = SparseVolume::new();
        let chunk = Chunk::new(ChunkPos::new(-1, 0), 16);
        CheckerboardTerrainGenerator::new(0).fill(&mut volume, chunk.footprint());

        assert_eq!(volume.get_voxel(WorldPos::new(-2, -2, 0)), Block::STONE);
        assert_eq!(volume.get_voxel(WorldPos::new(-1, -2, 0)), Block::AIR);
        assert_eq!(volume.get_voxel(WorldPos::new(-1, -1, 0)), Block::STONE);
        assert_eq!(volume.get_voxel(WorldPos::new(-2, 0, 0)), Block::AIR);
        assert_eq!(volume.get_voxel(WorldPos::new(-2, -10, 0)), Block::AIR);
    }
}
