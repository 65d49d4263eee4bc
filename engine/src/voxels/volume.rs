use ahash::AHashMap;

use crate::voxels::{
    block::Block,
    coord::{SectionPos, WorldPos},
    section::Section,
};

/// Voxel storage the world streams and meshes.
///
/// Implementations don't need to be internally synchronized: the world hands the
/// volume to at most one thread at a time.
pub trait Volume: Send + 'static {
    fn get_voxel(&self, pos: WorldPos) -> Block;
    fn set_voxel(&mut self, pos: WorldPos, block: Block);

    fn approximate_size(&self) -> usize {
        0
    }
}

/// Unbounded sparse volume made of 16³ sections. Unwritten space reads as air.
#[derive(Default)]
pub struct SparseVolume {
    sections: AHashMap<SectionPos, Section>,
}

impl SparseVolume {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn get_section(&self, pos: SectionPos) -> Option<&Section> {
        self.sections.get(&pos)
    }
}

impl Volume for SparseVolume {
    fn get_voxel(&self, pos: WorldPos) -> Block {
        match self.sections.get(&pos.to_section_pos()) {
            Some(section) => section.get_block(pos.to_local_pos()),
            None => Block::AIR,
        }
    }

    fn set_voxel(&mut self, pos: WorldPos, block: Block) {
        let section_pos = pos.to_section_pos();

        if block.is_air() && !self.sections.contains_key(&section_pos) {
            // Writing air into unallocated space is a no-op
            return;
        }

        self.sections
            .entry(section_pos)
            .or_insert_with(|| Section::uniform(Block::AIR))
            .set_block(pos.to_local_pos(), block);
    }

    fn approximate_size(&self) -> usize {
        self.sections
            .values()
            .map(|section| section.approximate_size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_space_is_air() {
        let volume = SparseVolume::new();
        assert_eq!(volume.get_voxel(WorldPos::new(0, 0, 0)), Block::AIR);
        assert_eq!(volume.get_voxel(WorldPos::new(-500, 9000, 12)), Block::AIR);
        assert_eq!(volume.section_count(), 0);
    }

    #[test]
    fn test_set_and_get_across_sections() {
        let mut volume = SparseVolume::new();
        let positions = [
            WorldPos::new(0, 0, 0),
            WorldPos::new(-1, -1, -1),
            WorldPos::new(15, 200, -16),
            WorldPos::new(16, -200, 31),
        ];

        for (i, pos) in positions.iter().enumerate() {
            volume.set_voxel(*pos, Block::from_type(i as u16 + 1));
        }

        for (i, pos) in positions.iter().enumerate() {
            assert_eq!(volume.get_voxel(*pos), Block::from_type(i as u16 + 1));
        }
        assert_eq!(volume.section_count(), 4);
        assert!(volume.approximate_size() > 0);
    }

    #[test]
    fn test_air_writes_do_not_allocate() {
        let mut volume = SparseVolume::new();
        volume.set_voxel(WorldPos::new(3, 3, 3), Block::AIR);
        assert_eq!(volume.section_count(), 0);

        volume.set_voxel(WorldPos::new(3, 3, 3), Block::STONE);
        volume.set_voxel(WorldPos::new(3, 3, 3), Block::AIR);
        assert_eq!(volume.get_voxel(WorldPos::new(3, 3, 3)), Block::AIR);
    }
}
