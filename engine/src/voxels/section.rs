use crate::voxels::{block::Block, coord::LocalPos};

pub const SECTION_SIZE: u8 = 16;
pub const SECTION_VOLUME: usize = (SECTION_SIZE as usize).pow(3);

#[derive(Default, Clone, Debug)]
pub struct Palette {
    pub blocks: Vec<Block>,
}

impl Palette {
    pub fn new() -> Self {
        Palette { blocks: Vec::new() }
    }

    pub fn from_block(block: Block) -> Self {
        Palette {
            blocks: vec![block],
        }
    }

    pub fn ensure_block(&mut self, block: Block) -> usize {
        if let Some(index) = self.blocks.iter().position(|&b| b == block) {
            return index;
        }

        assert!(
            self.blocks.len() < 2usize.pow(16),
            "Palette cannot have more than 65536 block types"
        );
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<Block> {
        self.blocks.get(index).copied()
    }

    // How many bits are needed to index into the palette.
    // 0 means every voxel refers to the first entry.
    pub fn index_bits(&self) -> usize {
        let count = self.blocks.len();
        (count as f32).log2().ceil() as usize
    }
}

/// 16³ block storage. Sections that hold a single block type don't allocate.
#[derive(Clone, Debug)]
pub enum Section {
    Uniform(Block),
    Packed(PackedSection),
}

#[derive(Clone, Debug)]
pub struct PackedSection {
    pub palette: Palette,
    // Palette indices in YZX order, packed tightly into u64s.
    // The tail of each u64 may be unused.
    pub data: Box<[u64]>,
    pub bits_per_voxel: u8,
    pub bit_mask: u64,
}

#[derive(Debug)]
struct StorageOffsets {
    data_index: usize,
    bit_offset: usize,
}

impl PackedSection {
    pub fn new_with_palette(palette: Palette) -> Self {
        let mut section = PackedSection {
            palette,
            data: Box::new([]),
            bits_per_voxel: 0,
            bit_mask: 0,
        };
        section.reallocate_if_necessary();
        section
    }

    fn reallocate_if_necessary(&mut self) {
        let needed_bits = self.palette.index_bits();
        if needed_bits == self.bits_per_voxel as usize {
            return;
        }

        let old_bits = self.bits_per_voxel as usize;
        let old_data = std::mem::replace(&mut self.data, Box::new([]));

        self.bits_per_voxel = needed_bits as u8;
        self.bit_mask = (1u64 << needed_bits) - 1;

        if needed_bits == 0 {
            return;
        }

        let per_u64 = 64 / needed_bits;
        self.data = vec![0u64; SECTION_VOLUME.div_ceil(per_u64)].into_boxed_slice();

        // Palettes only grow, so every old index fits in the new width
        if old_bits > 0 {
            let old_per_u64 = 64 / old_bits;
            let old_mask = (1u64 << old_bits) - 1;

            for i in 0..SECTION_VOLUME {
                let value = (old_data[i / old_per_u64] >> ((i % old_per_u64) * old_bits)) & old_mask;
                self.data[i / per_u64] |= value << ((i % per_u64) * needed_bits);
            }
        }
    }

    fn storage_offsets(&self, index: usize) -> StorageOffsets {
        let bits = self.bits_per_voxel as usize;
        let per_u64 = 64 / bits;
        StorageOffsets {
            data_index: index / per_u64,
            bit_offset: (index % per_u64) * bits,
        }
    }

    fn get_packed_index(&self, index: usize) -> u16 {
        if self.bits_per_voxel == 0 {
            return 0;
        }

        let offsets = self.storage_offsets(index);
        ((self.data[offsets.data_index] >> offsets.bit_offset) & self.bit_mask) as u16
    }

    fn set_packed_index(&mut self, index: usize, value: u16) {
        assert!(
            self.bits_per_voxel > 0,
            "Cannot set packed index when bits_per_voxel is 0"
        );

        let offsets = self.storage_offsets(index);
        let mask = self.bit_mask << offsets.bit_offset;
        let shifted = (value as u64 & self.bit_mask) << offsets.bit_offset;
        self.data[offsets.data_index] = (self.data[offsets.data_index] & !mask) | shifted;
    }

    pub fn get_block(&self, pos: LocalPos) -> Block {
        let palette_index = self.get_packed_index(pos.to_section_index());
        self.palette.get(palette_index as usize).unwrap_or_default()
    }

    pub fn set_block(&mut self, pos: LocalPos, block: Block) {
        let palette_index = self.palette.ensure_block(block);
        self.reallocate_if_necessary();
        if self.bits_per_voxel == 0 {
            // Single-entry palette, every voxel already refers to it
            return;
        }
        self.set_packed_index(pos.to_section_index(), palette_index as u16);
    }
}

impl Section {
    pub fn uniform(block: Block) -> Self {
        Section::Uniform(block)
    }

    pub fn get_block(&self, pos: LocalPos) -> Block {
        match self {
            Section::Uniform(block) => *block,
            Section::Packed(packed) => packed.get_block(pos),
        }
    }

    pub fn set_block(&mut self, pos: LocalPos, block: Block) {
        match self {
            Section::Uniform(current) if *current == block => {}
            Section::Uniform(current) => {
                let mut packed = PackedSection::new_with_palette(Palette::from_block(*current));
                packed.set_block(pos, block);
                *self = Section::Packed(packed);
            }
            Section::Packed(packed) => packed.set_block(pos, block),
        }
    }

    pub fn bits_per_voxel(&self) -> u8 {
        match self {
            Section::Uniform(_) => 0,
            Section::Packed(packed) => packed.bits_per_voxel,
        }
    }

    pub fn approximate_size(&self) -> usize {
        match self {
            Section::Uniform(_) => std::mem::size_of::<Section>(),
            Section::Packed(packed) => {
                std::mem::size_of::<Section>()
                    + packed.data.len() * std::mem::size_of::<u64>()
                    + packed.palette.blocks.len() * std::mem::size_of::<Block>()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_block_storage() {
        let stone = Block::STONE;
        let dirt = Block::DIRT;
        let grass = Block::GRASS;
        let sand = Block::SAND;

        let mut section = Section::uniform(Block::AIR);
        assert_eq!(section.bits_per_voxel(), 0);

        // Two types -> 1 bit required
        section.set_block(LocalPos::new(0, 0, 0), stone);
        assert_eq!(section.bits_per_voxel(), 1);
        assert!(matches!(section, Section::Packed(_)));

        // Three types -> 2 bits required
        section.set_block(LocalPos::new(1, 0, 0), dirt);
        assert_eq!(section.bits_per_voxel(), 2);

        // Four types -> still 2 bits
        section.set_block(LocalPos::new(2, 0, 0), grass);
        assert_eq!(section.bits_per_voxel(), 2);

        // Five types -> 3 bits, existing data is repacked
        section.set_block(LocalPos::new(3, 0, 0), sand);
        assert_eq!(section.bits_per_voxel(), 3);

        assert_eq!(section.get_block(LocalPos::new(0, 0, 0)), stone);
        assert_eq!(section.get_block(LocalPos::new(1, 0, 0)), dirt);
        assert_eq!(section.get_block(LocalPos::new(2, 0, 0)), grass);
        assert_eq!(section.get_block(LocalPos::new(3, 0, 0)), sand);
        assert_eq!(section.get_block(LocalPos::new(4, 0, 0)), Block::AIR);
        assert_eq!(section.get_block(LocalPos::new(15, 15, 15)), Block::AIR);
    }

    #[test]
    fn test_word_boundary_crossing() {
        let mut packed = PackedSection::new_with_palette(Palette::from_block(Block::AIR));
        // 33 palette entries -> 6 bits per voxel, 10 voxels per u64
        for i in 1..33 {
            packed.set_block(LocalPos::new(0, 15, 15), Block::from_type(i));
        }
        assert_eq!(packed.bits_per_voxel, 6);

        // Index 10 is the first voxel of the second u64
        let pos = LocalPos::new(10, 0, 0);
        packed.set_block(pos, Block::from_type(5));
        assert_eq!(packed.get_block(pos), Block::from_type(5));
        assert_eq!(packed.get_block(LocalPos::new(9, 0, 0)), Block::AIR);
        assert_eq!(packed.get_block(LocalPos::new(11, 0, 0)), Block::AIR);

        let offsets = packed.storage_offsets(10);
        assert_eq!(offsets.data_index, 1);
        assert_eq!(offsets.bit_offset, 0);
    }

    #[test]
    fn test_setting_same_block_keeps_uniform() {
        let mut section = Section::uniform(Block::STONE);
        section.set_block(LocalPos::new(3, 3, 3), Block::STONE);
        assert!(matches!(section, Section::Uniform(_)));
    }
}
