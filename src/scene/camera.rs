use glam::Mat4;
use uuid::Uuid;

use crate::scene::transform::Transform;

/// Perspective camera.
///
/// Owns its world transform plus the projection parameters. The projection
/// matrix is cached and rebuilt whenever a parameter changes through
/// [`set_aspect`](Self::set_aspect) or [`update_projection_matrix`](Self::update_projection_matrix).
#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub transform: Transform,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    projection_matrix: Mat4,
}

impl Camera {
    /// Creates a perspective camera. `fov` is the vertical field of view in
    /// degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            uuid: Uuid::new_v4(),
            transform: Transform::new(),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets the WGPU/Vulkan depth range (0 to 1)
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// Updates the projection aspect ratio. Position and orientation are
    /// untouched; only the projection changes.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// View matrix, the inverse of the camera's world transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.matrix().inverse()
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }
}
