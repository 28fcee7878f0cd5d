use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::scene::transform::Transform;

/// A renderable entity: geometry plus shading parameters plus placement.
///
/// Built completely before it is handed to the scene, so a swap can never
/// expose geometry from one load with the material of another.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            transform: Transform::new(),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
