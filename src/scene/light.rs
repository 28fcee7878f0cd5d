use glam::Vec3;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum LightKind {
    /// Uniform illumination with no direction.
    Ambient,
    /// Parallel rays shining from `direction` toward the origin.
    Directional { direction: Vec3 },
}

/// A light source in the scene.
#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, direction: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Directional { direction },
        }
    }
}
