use crate::{
    voxels::{block::Block, chunk::ChunkFootprint, coord::WorldPos, volume::Volume},
    worldgen::terrain_generator::TerrainGenerator,
};

/// Stone up to y = -4, three layers of dirt, grass at y = 0 and air above.
pub struct FlatTerrainGenerator {
    pub surface_y: i32,
}

impl TerrainGenerator for FlatTerrainGenerator {
    fn new(_seed: u32) -> Self {
        FlatTerrainGenerator { surface_y: 0 }
    }

    #[profiling::function]
    fn fill(&self, volume: &mut dyn Volume, footprint: ChunkFootprint) {
        let top = self.surface_y.min(footprint.max_y - 1);

        for column in footprint.iter_columns() {
            for y in footprint.min_y..=top {
                let block = if y == self.surface_y {
                    Block::GRASS
                } else if y >= self.surface_y - 3 {
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
    fn test_flat_layers() {
        let mut volume = SparseVolume::new();
        let chunk = Chunk::new(ChunkPos::new(0, -1), 16);
        FlatTerrainGenerator::new(0).fill(&mut volume, chunk.footprint());

        assert_eq!(volume.get_voxel(WorldPos::new(3, 0, -5)), Block::GRASS);
        assert_eq!(volume.get_voxel(WorldPos::new(3, -1, -5)), Block::DIRT);
        assert_eq!(volume.get_voxel(WorldPos::new(3, -3, -5)), Block::DIRT);
        assert_eq!(volume.get_voxel(WorldPos::new(3, -4, -5)), Block::STONE);
        assert_eq!(volume.get_voxel(WorldPos::new(3, -16, -5)), Block::STONE);
        assert_eq!(volume.get_voxel(WorldPos::new(3, 1, -5)), Block::AIR);
        // Nothing below the footprint and nothing outside it
        assert_eq!(volume.get_voxel(WorldPos::new(3, -17, -5)), Block::AIR);
        assert_eq!(volume.get_voxel(WorldPos::new(3, 0, 0)), Block::AIR);
    }
}
