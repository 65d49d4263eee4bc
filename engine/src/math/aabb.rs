use glam::{IVec3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(point1: Vec3, point2: Vec3) -> Aabb {
        let min = point1.min(point2);
        let max = point1.max(point2);
        Aabb { min, max }
    }

    /// The unit cube occupied by the voxel at an integer position
    pub fn unit_voxel(pos: IVec3) -> Aabb {
        let min = pos.as_vec3();
        Aabb {
            min,
            max: min + Vec3::ONE,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Integer region of voxels. `min` is inclusive, `max` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelRegion {
    pub min: IVec3,
    pub max: IVec3,
}

impl VoxelRegion {
    pub fn new(min: IVec3, max: IVec3) -> Self {
        assert!(
            max.cmpge(min).all(),
            "Invalid voxel region: min {:?} is not below max {:?}",
            min,
            max
        );
        VoxelRegion { min, max }
    }

    pub fn size(&self) -> IVec3 {
        self.max - self.min
    }

    pub fn volume(&self) -> usize {
        let size = self.size();
        size.x as usize * size.y as usize * size.z as usize
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.min).all() && pos.cmplt(self.max).all()
    }

    /// Iterates every voxel position in the region in YZX order
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + use<> {
        let VoxelRegion { min, max } = *self;
        (min.y..max.y).flat_map(move |y| {
            (min.z..max.z).flat_map(move |z| (min.x..max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb::new(self.min.as_vec3(), self.max.as_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_iteration_covers_every_voxel() {
        let region = VoxelRegion::new(IVec3::new(-1, 0, 2), IVec3::new(1, 2, 4));
        let positions = region.iter().collect::<Vec<_>>();
        assert_eq!(positions.len(), region.volume());
        assert_eq!(positions.len(), 8);
        assert!(positions.iter().all(|p| region.contains(*p)));
        assert_eq!(positions[0], IVec3::new(-1, 0, 2));
        assert_eq!(positions[1], IVec3::new(0, 0, 2));
        assert!(!region.contains(IVec3::new(1, 0, 2)));
    }

    #[test]
    fn test_unit_voxel_bounds() {
        let aabb = Aabb::unit_voxel(IVec3::new(-2, 3, 0));
        assert_eq!(aabb.center(), Vec3::new(-1.5, 3.5, 0.5));
        assert_eq!(aabb.extent(), Vec3::splat(0.5));
        assert!(aabb.contains_point(Vec3::new(-2.0, 3.0, 1.0)));
        assert!(!aabb.contains_point(Vec3::new(-2.01, 3.0, 1.0)));
    }
}
