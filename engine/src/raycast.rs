use std::task::Poll;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use glam::{IVec3, Vec3};
use nalgebra::{Point3, Vector3};
use parry3d::{
    bounding_volume::Aabb as ParryAabb,
    query::{Ray as ParryRay, RayCast},
};

use crate::{
    math::{aabb::Aabb, ray::Ray},
    voxels::{block::Block, coord::WorldPos, face::Face, volume::Volume},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Exact point where the ray enters the hit voxel
    pub hit_point: Vec3,
    pub block_center: Vec3,
    pub block: Block,
    pub voxel: WorldPos,
    /// Side of the voxel the ray entered through. `None` if the ray started inside it.
    pub face: Option<Face>,
}

impl RaycastHit {
    /// The empty cell in front of the hit face, where a block would be placed
    pub fn adjacent_voxel(&self) -> Option<WorldPos> {
        self.face
            .map(|face| WorldPos(self.voxel.0 + face.to_ivec3()))
    }
}

/// Walks the voxels pierced by `ray` in order and reports the first one that isn't air.
///
/// The direction must not be zero.
pub fn cast_ray(volume: &dyn Volume, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
    let direction = ray.direction.normalize();
    let origin = ray.origin;

    let mut voxel = origin.floor().as_ivec3();
    let step = IVec3::new(
        if direction.x >= 0.0 { 1 } else { -1 },
        if direction.y >= 0.0 { 1 } else { -1 },
        if direction.z >= 0.0 { 1 } else { -1 },
    );

    // Ray parameter at which the next cell boundary is crossed, per axis
    let next_boundary = (voxel + step.max(IVec3::ZERO)).as_vec3();
    let mut t_max = Vec3::select(
        direction.cmpeq(Vec3::ZERO),
        Vec3::INFINITY,
        (next_boundary - origin) / direction,
    );
    let t_delta = Vec3::select(
        direction.cmpeq(Vec3::ZERO),
        Vec3::INFINITY,
        (Vec3::ONE / direction).abs(),
    );

    let mut entered_through: Option<Face> = None;
    let mut t = 0.0;
    let max_steps = (max_distance * 3.0).ceil() as usize + 3;

    for _ in 0..max_steps {
        if t > max_distance {
            break;
        }

        let block = volume.get_voxel(WorldPos(voxel));
        if block.is_solid() {
            return Some(refine_hit(
                origin,
                direction,
                t,
                voxel,
                block,
                entered_through,
            ));
        }

        // Advance along the axis whose boundary comes first
        let axis = if t_max.x < t_max.y {
            if t_max.x < t_max.z { 0 } else { 2 }
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };

        t = t_max[axis];
        t_max[axis] += t_delta[axis];
        voxel[axis] += step[axis];

        let mut normal = IVec3::ZERO;
        normal[axis] = -step[axis];
        entered_through = Face::from_normal(normal);
    }

    None
}

/// The traversal only yields a voxel, so intersect the ray with that voxel's unit box
/// to recover the surface point. `entry_t` is where the traversal entered the voxel.
fn refine_hit(
    origin: Vec3,
    direction: Vec3,
    entry_t: f32,
    voxel: IVec3,
    block: Block,
    face: Option<Face>,
) -> RaycastHit {
    let bounds = Aabb::unit_voxel(voxel);
    let parry_aabb = ParryAabb::new(Point3::from(bounds.min), Point3::from(bounds.max));
    let parry_ray = ParryRay::new(Point3::from(origin), Vector3::from(direction));

    // Grazing edge and corner hits can slip past the slab test
    let time_of_impact = parry_aabb
        .cast_local_ray(&parry_ray, f32::MAX, true)
        .unwrap_or(entry_t);
    let hit_point = (origin + direction * time_of_impact).clamp(bounds.min, bounds.max);

    RaycastHit {
        hit_point,
        block_center: bounds.center(),
        block,
        voxel: WorldPos(voxel),
        face,
    }
}

pub(crate) struct RaycastRequest {
    pub ray: Ray,
    pub responder: Sender<Option<RaycastHit>>,
}

/// Answer to a queued raycast. Exactly one response arrives per request, on a later
/// world update.
pub struct RaycastHandle {
    receiver: Receiver<Option<RaycastHit>>,
    response: Option<Option<RaycastHit>>,
}

impl RaycastHandle {
    pub(crate) fn new() -> (RaycastHandle, Sender<Option<RaycastHit>>) {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        (
            RaycastHandle {
                receiver,
                response: None,
            },
            sender,
        )
    }

    /// `Ready(None)` means the ray hit nothing within range, or the world was dropped
    /// before the request was serviced.
    pub fn poll(&mut self) -> Poll<Option<RaycastHit>> {
        if let Some(response) = self.response {
            return Poll::Ready(response);
        }

        match self.receiver.try_recv() {
            Ok(response) => {
                self.response = Some(response);
                Poll::Ready(response)
            }
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.response = Some(None);
                Poll::Ready(None)
            }
        }
    }

    pub fn is_ready(&mut self) -> bool {
        self.poll().is_ready()
    }
}
