use glam::Vec3;
use slotmap::SlotMap;

use crate::resources::mesh::Mesh;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::{LightKey, MeshKey};

/// Scene contents: lights, a camera, and at most one displayed model.
///
/// Scene is a pure data layer. Lights and the camera are set up once and
/// left alone afterwards; the model slot is replaced wholesale on every
/// successful load and is never mutated in place, so a frame either sees
/// the complete old model or the complete new one.
pub struct Scene {
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub lights: SlotMap<LightKey, Light>,
    pub camera: Camera,

    /// Clear color, linear RGB.
    pub background: Vec3,

    model_key: Option<MeshKey>,
}

impl Scene {
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self {
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            camera,
            background: Vec3::ZERO,
            model_key: None,
        }
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    /// Replaces the displayed model with `mesh`.
    ///
    /// The previous model (if any) is removed in the same call, so the
    /// scene never holds two models and never holds a partially swapped
    /// one. The caller builds `mesh` completely before handing it over.
    pub fn set_model(&mut self, mesh: Mesh) -> MeshKey {
        if let Some(old) = self.model_key.take() {
            self.meshes.remove(old);
        }
        let key = self.meshes.insert(mesh);
        self.model_key = Some(key);
        key
    }

    /// Removes the displayed model, leaving the scene empty.
    pub fn clear_model(&mut self) {
        if let Some(old) = self.model_key.take() {
            self.meshes.remove(old);
        }
    }

    #[must_use]
    pub fn model(&self) -> Option<&Mesh> {
        self.model_key.and_then(|key| self.meshes.get(key))
    }

    #[must_use]
    pub fn model_key(&self) -> Option<MeshKey> {
        self.model_key
    }
}
