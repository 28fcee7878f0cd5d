//! Scene Module
//!
//! The data layer the renderer draws from:
//! - [`Scene`]: lights, camera, and the (single) displayed model
//! - [`Camera`]: perspective projection plus world transform
//! - [`Light`]: ambient and directional light sources
//! - [`Transform`]: position / rotation / scale bundle

pub mod camera;
pub mod light;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct MeshKey;
    pub struct LightKey;
}
