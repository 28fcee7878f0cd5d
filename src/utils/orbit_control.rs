//! Orbit Camera Controls
//!
//! Spherical-coordinate camera rig: drag with the left button to orbit, drag
//! with the right button to pan the focus point, scroll to zoom. All three
//! motions accumulate into pending deltas that damping bleeds off over the
//! following frames, giving the camera glide after the input stops.

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::app::input::Input;
use crate::scene::transform::Transform;

/// Fraction of the camera distance removed by one scroll line at
/// `zoom_speed` 1.0.
const ZOOM_STEP: f32 = 0.05;

pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Focus point the camera orbits around and looks at.
    pub center: Vec3,
    /// Camera distance from `center`.
    pub radius: f32,
    /// Azimuth angle in radians. Zero places the camera on the +Z side.
    pub theta: f32,
    /// Polar angle in radians, measured from the +Y axis.
    pub phi: f32,

    rotate_delta: Vec2,
    pan_delta: Vec3,
    zoom_delta: f32,
}

impl OrbitControls {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 5.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
            damping_factor: 0.3,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
            pan_delta: Vec3::ZERO,
            zoom_delta: 0.0,
        }
    }

    /// Folds one frame of pointer input into the pending motion deltas.
    ///
    /// `fov_degrees` is the camera's vertical field of view; panning uses it
    /// to keep the point under the cursor glued to the cursor.
    pub fn absorb(&mut self, input: &Input, fov_degrees: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(MouseButton::Left) {
            // A full-height drag sweeps one whole revolution.
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta.x -= input.cursor_delta.x * rotate_per_pixel * self.rotate_speed;
            self.rotate_delta.y -= input.cursor_delta.y * rotate_per_pixel * self.rotate_speed;
        }

        if input.is_button_pressed(MouseButton::Right) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let (right, up) = self.screen_basis();
            self.pan_delta += (right * -input.cursor_delta.x + up * input.cursor_delta.y)
                * pixels_to_world_ratio
                * self.pan_speed;
        }

        self.zoom_delta += input.scroll_delta.y;
    }

    /// Advances the damped motion by `dt` seconds and writes the resulting
    /// camera pose into `transform`.
    pub fn step(&mut self, transform: &mut Transform, dt: f32) {
        let blend = if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            1.0 - retention
        } else {
            1.0
        };

        self.theta += self.rotate_delta.x * blend;
        self.phi += self.rotate_delta.y * blend;
        self.center += self.pan_delta * blend;

        let zoom_applied = self.zoom_delta * blend;
        if zoom_applied != 0.0 {
            let scale_per_line = 1.0 - ZOOM_STEP * self.zoom_speed;
            self.radius *= scale_per_line.powf(zoom_applied);
            self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        }

        let keep = 1.0 - blend;
        self.rotate_delta *= keep;
        self.pan_delta *= keep;
        self.zoom_delta *= keep;

        // Keep the camera off the poles so the look-at basis stays stable.
        const EPS: f32 = 0.0001;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);

        transform.position = self.center + self.radius * self.spherical_offset();
        transform.look_at(self.center, Vec3::Y);
    }

    /// Absorbs this frame's input and advances the motion in one call.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        self.absorb(input, fov_degrees);
        self.step(transform, dt);
    }

    /// Returns `true` while queued motion is still being damped out.
    pub fn is_coasting(&self) -> bool {
        self.rotate_delta.length_squared() > 1e-10
            || self.pan_delta.length_squared() > 1e-10
            || self.zoom_delta.abs() > 1e-5
    }

    /// Unit vector from `center` toward the camera position.
    fn spherical_offset(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    /// Screen-aligned right and up vectors for the current orbit angles.
    fn screen_basis(&self) -> (Vec3, Vec3) {
        let forward = -self.spherical_offset().normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }
}
