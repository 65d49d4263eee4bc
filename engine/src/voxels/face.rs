use glam::{IVec3, U8Vec3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// Y+
    Top = 0,
    /// Y-
    Bottom,
    /// X-
    Left,
    /// X+
    Right,
    /// Z-
    Front,
    /// Z+
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    pub fn to_ivec3(self) -> IVec3 {
        match self {
            Face::Top => IVec3::Y,
            Face::Bottom => -IVec3::Y,
            Face::Left => -IVec3::X,
            Face::Right => IVec3::X,
            Face::Front => -IVec3::Z,
            Face::Back => IVec3::Z,
        }
    }

    pub fn normal(self) -> Vec3 {
        self.to_ivec3().as_vec3()
    }

    pub fn from_normal(normal: IVec3) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.to_ivec3() == normal)
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    /// Corners of the face on a unit cube, wound counter-clockwise when seen from outside
    pub fn vertices(self) -> [U8Vec3; 4] {
        match self {
            Face::Top => [
                U8Vec3::new(0, 1, 0),
                U8Vec3::new(0, 1, 1),
                U8Vec3::new(1, 1, 1),
                U8Vec3::new(1, 1, 0),
            ],
            Face::Bottom => [
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(1, 0, 0),
                U8Vec3::new(1, 0, 1),
                U8Vec3::new(0, 0, 1),
            ],
            Face::Left => [
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(0, 0, 1),
                U8Vec3::new(0, 1, 1),
                U8Vec3::new(0, 1, 0),
            ],
            Face::Right => [
                U8Vec3::new(1, 0, 0),
                U8Vec3::new(1, 1, 0),
                U8Vec3::new(1, 1, 1),
                U8Vec3::new(1, 0, 1),
            ],
            Face::Front => [
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(0, 1, 0),
                U8Vec3::new(1, 1, 0),
                U8Vec3::new(1, 0, 0),
            ],
            Face::Back => [
                U8Vec3::new(0, 0, 1),
                U8Vec3::new(1, 0, 1),
                U8Vec3::new(1, 1, 1),
                U8Vec3::new(0, 1, 1),
            ],
        }
    }

    pub fn indices(start_index: u32) -> [u32; 6] {
        [
            start_index,
            start_index + 1,
            start_index + 2,
            start_index,
            start_index + 2,
            start_index + 3,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_winding_matches_normal() {
        for face in Face::ALL {
            let [a, b, c, _] = face.vertices().map(|v| v.as_vec3());
            let winding_normal = (b - a).cross(c - a).normalize();
            assert_eq!(
                winding_normal,
                face.normal(),
                "Face {:?} is wound the wrong way",
                face
            );
        }
    }

    #[test]
    fn test_opposite_and_from_normal() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.opposite().to_ivec3(), -face.to_ivec3());
            assert_eq!(Face::from_normal(face.to_ivec3()), Some(face));
        }
        assert_eq!(Face::from_normal(IVec3::ONE), None);
    }
}
