use std::ops::{Add, Sub};

use glam::{IVec2, IVec3, U8Vec3, Vec3, Vec3Swizzles};

use crate::voxels::{chunk::CHUNK_SIZE, section::SECTION_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A position of a voxel within a storage section
pub struct LocalPos(pub U8Vec3);

impl LocalPos {
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        if x >= SECTION_SIZE || y >= SECTION_SIZE || z >= SECTION_SIZE {
            panic!("LocalPos out of bounds: ({}, {}, {})", x, y, z);
        }
        LocalPos(U8Vec3 { x, y, z })
    }

    pub fn x(&self) -> u8 {
        self.0.x
    }

    pub fn y(&self) -> u8 {
        self.0.y
    }

    pub fn z(&self) -> u8 {
        self.0.z
    }

    /// Linear index in YZX order
    pub fn to_section_index(&self) -> usize {
        let size = SECTION_SIZE as usize;
        (self.0.y as usize * size * size) + (self.0.z as usize * size) + self.0.x as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Identifies a 16³ storage section of the volume
pub struct SectionPos(pub IVec3);

impl SectionPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        SectionPos(IVec3 { x, y, z })
    }

    pub fn origin(&self) -> WorldPos {
        WorldPos(self.0 * IVec3::splat(SECTION_SIZE as i32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Coordinates identifying a chunk column in chunk space.
/// The first component is the chunk X coordinate and the second one is the chunk Z coordinate.
pub struct ChunkPos(pub IVec2);

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPos(IVec2 { x, y: z })
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn z(&self) -> i32 {
        self.0.y
    }

    /// World-space position of the chunk's minimum corner at y = 0
    pub fn origin(&self) -> WorldPos {
        WorldPos::new(self.0.x * CHUNK_SIZE, 0, self.0.y * CHUNK_SIZE)
    }

    pub fn chebyshev_distance(&self, other: ChunkPos) -> u32 {
        self.0.chebyshev_distance(other.0)
    }

    /// Centre of the chunk footprint in the XZ plane, lifted to the given height
    pub fn center(&self, y: f32) -> Vec3 {
        let half = CHUNK_SIZE as f32 / 2.0;
        Vec3::new(
            (self.0.x * CHUNK_SIZE) as f32 + half,
            y,
            (self.0.y * CHUNK_SIZE) as f32 + half,
        )
    }
}

impl Ord for ChunkPos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.0.x, self.0.y).cmp(&(other.0.x, other.0.y))
    }
}

impl PartialOrd for ChunkPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for ChunkPos {
    type Output = ChunkPos;

    fn add(self, other: ChunkPos) -> ChunkPos {
        ChunkPos(self.0 + other.0)
    }
}

impl Sub for ChunkPos {
    type Output = ChunkPos;

    fn sub(self, other: ChunkPos) -> ChunkPos {
        ChunkPos(self.0 - other.0)
    }
}

/// A position of a voxel in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldPos(pub IVec3);

impl WorldPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        WorldPos(IVec3 { x, y, z })
    }

    pub fn to_chunk_pos(&self) -> ChunkPos {
        ChunkPos(self.0.xz().div_euclid(IVec2::splat(CHUNK_SIZE)))
    }

    /// Position within the owning chunk column. Y is left untouched.
    pub fn to_chunk_local(&self) -> IVec3 {
        let xz = self.0.xz().rem_euclid(IVec2::splat(CHUNK_SIZE));
        IVec3::new(xz.x, self.0.y, xz.y)
    }

    pub fn to_section_pos(&self) -> SectionPos {
        SectionPos(self.0.div_euclid(IVec3::splat(SECTION_SIZE as i32)))
    }

    pub fn to_local_pos(&self) -> LocalPos {
        let converted_pos = self.0.rem_euclid(IVec3::splat(SECTION_SIZE as i32));
        LocalPos(converted_pos.as_u8vec3())
    }

    pub fn from_section_and_local(section: SectionPos, local: LocalPos) -> Self {
        section.origin() + WorldPos(local.0.as_ivec3())
    }

    /// Centre of the unit cube occupied by this voxel
    pub fn center(&self) -> Vec3 {
        self.0.as_vec3() + Vec3::splat(0.5)
    }
}

impl From<IVec3> for WorldPos {
    fn from(value: IVec3) -> Self {
        WorldPos(value)
    }
}

impl From<[i32; 3]> for WorldPos {
    fn from(value: [i32; 3]) -> Self {
        WorldPos(IVec3::from(value))
    }
}

impl Add for WorldPos {
    type Output = WorldPos;

    fn add(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 + other.0)
    }
}

impl Sub for WorldPos {
    type Output = WorldPos;

    fn sub(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 - other.0)
    }
}

/// A floating point position in world space, e.g. the viewer's eye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPosF(pub Vec3);

impl WorldPosF {
    pub fn to_voxel_pos(&self) -> WorldPos {
        WorldPos(self.0.floor().as_ivec3())
    }

    pub fn to_chunk_pos(&self) -> ChunkPos {
        self.to_voxel_pos().to_chunk_pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_positions_floor_into_chunks() {
        assert_eq!(WorldPos::new(0, 5, 0).to_chunk_pos(), ChunkPos::new(0, 0));
        assert_eq!(WorldPos::new(15, 5, 15).to_chunk_pos(), ChunkPos::new(0, 0));
        assert_eq!(WorldPos::new(16, 5, 0).to_chunk_pos(), ChunkPos::new(1, 0));
        assert_eq!(WorldPos::new(-1, 5, 0).to_chunk_pos(), ChunkPos::new(-1, 0));
        assert_eq!(WorldPos::new(-16, 5, -17).to_chunk_pos(), ChunkPos::new(-1, -2));

        assert_eq!(
            WorldPos::new(-1, -40, -16).to_chunk_local(),
            IVec3::new(15, -40, 0)
        );
    }

    #[test]
    fn test_height_does_not_affect_chunk() {
        // Chunks are unbounded columns
        assert_eq!(
            WorldPos::new(3, -1000, 3).to_chunk_pos(),
            WorldPos::new(3, 1000, 3).to_chunk_pos()
        );
    }

    #[test]
    fn test_section_round_trip() {
        let pos = WorldPos::new(-17, 33, 5);
        let section = pos.to_section_pos();
        let local = pos.to_local_pos();
        assert_eq!(section, SectionPos::new(-2, 2, 0));
        assert_eq!(local, LocalPos::new(15, 1, 5));
        assert_eq!(WorldPos::from_section_and_local(section, local), pos);
    }

    #[test]
    fn test_viewer_position_flooring() {
        assert_eq!(
            WorldPosF(Vec3::new(-0.1, 10.0, 15.9)).to_chunk_pos(),
            ChunkPos::new(-1, 0)
        );
        assert_eq!(
            WorldPosF(Vec3::new(16.0, 10.0, 0.0)).to_chunk_pos(),
            ChunkPos::new(1, 0)
        );
    }
}
