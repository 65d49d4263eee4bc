use glam::Vec3;
use splines::{Interpolation, Key, Spline};

use crate::math::ray::Ray;

/// Point of view the world streams around. Flies along a looping spline.
pub struct Viewer {
    position: Vec3,
    target: Vec3,

    path_progress: f32,
    path_length: f32,
    path: Spline<f32, Vec3>,
}

impl Viewer {
    /// Sweeps across a few kilometres of terrain at roughly constant height
    pub fn new() -> Self {
        let path = Spline::from_vec(vec![
            Key::new(0.0, Vec3::new(0.0, 32.0, 0.0), Interpolation::Linear),
            Key::new(
                50.0,
                Vec3::new(200.0, 35.0, 800.0),
                Interpolation::CatmullRom,
            ),
            Key::new(
                90.0,
                Vec3::new(400.0, 40.0, 90.0),
                Interpolation::CatmullRom,
            ),
            Key::new(100.0, Vec3::new(250.0, 32.0, -50.0), Interpolation::Linear),
        ]);

        Self::from_path(path, 89.0)
    }

    /// `path_length` is where progress wraps back to the start
    pub fn from_path(path: Spline<f32, Vec3>, path_length: f32) -> Self {
        let position = path.clamped_sample(0.0).unwrap_or(Vec3::ZERO);
        let target = path.clamped_sample(1.0).unwrap_or(position + Vec3::X);

        Viewer {
            position,
            target,
            path_progress: 0.0,
            path_length,
            path,
        }
    }

    pub fn stationary(position: Vec3) -> Self {
        let path = Spline::from_vec(vec![Key::new(0.0, position, Interpolation::Linear)]);
        let mut viewer = Self::from_path(path, f32::INFINITY);
        viewer.target = position + Vec3::new(1.0, -0.5, 0.0);
        viewer
    }

    pub fn update(&mut self, delta_time_s: f32) {
        self.path_progress += delta_time_s;

        if self.path_progress >= self.path_length {
            self.path_progress = 0.0;
        }

        if let Some(position) = self.path.clamped_sample(self.path_progress) {
            let target = self
                .path
                .clamped_sample(self.path_progress + 1.0)
                .unwrap_or(position);

            self.position = position;
            if target != position {
                self.target = target;
            }
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::X)
    }

    /// Ray from the eye along the view direction, tilted down by `pitch` radians
    pub fn look_ray(&self, pitch: f32) -> Ray {
        let forward = self.look_direction();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::Z);
        let direction = glam::Quat::from_axis_angle(right, -pitch) * forward;
        Ray::new(self.position, direction)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}
