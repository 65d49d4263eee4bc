use bitfield_struct::bitfield;

/// Material tag of a single voxel cell.
#[bitfield(u16, hash = true)]
pub struct Block {
    #[bits(12)]
    pub block_type: u16,
    #[bits(4)]
    pub metadata: u8,
}

impl Block {
    /// Largest block type representable in the 12-bit type field.
    pub const MAX_TYPE: u16 = (1 << 12) - 1;

    pub const fn from_type(block_type: u16) -> Self {
        let mut block = Block::new();
        block.set_block_type(block_type);
        block
    }

    pub const fn from_type_metadata(block_type: u16, metadata: u8) -> Self {
        let mut block = Block::new();
        block.set_block_type(block_type);
        block.set_metadata(metadata);
        block
    }

    pub const AIR: Block = Block::new();
    pub const STONE: Block = Block::from_type(1);
    pub const DIRT: Block = Block::from_type(2);
    pub const GRASS: Block = Block::from_type(3);
    pub const SAND: Block = Block::from_type(4);

    pub const fn is_air(&self) -> bool {
        self.block_type() == 0
    }

    pub const fn is_solid(&self) -> bool {
        !self.is_air()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.into_bits() == other.into_bits()
    }
}

impl Eq for Block {}
