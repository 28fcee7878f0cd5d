use bitflags::bitflags;
use glam::Vec3;
use uuid::Uuid;

/// Surface tint used when a mesh carries no per-vertex colors (0xdec9f0,
/// a pale lavender).
pub const DEFAULT_TINT: u32 = 0x00de_c9f0;

bitflags! {
    /// Shading feature selection, mapped to pipeline variants by the
    /// renderer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFeatures: u32 {
        /// Multiply the base color by the per-vertex color attribute.
        const USE_VERTEX_COLORS = 1 << 0;
        /// Skip lighting and output the surface color directly. Used for
        /// point clouds, which have no normals to light.
        const UNLIT             = 1 << 1;
    }
}

/// Shading parameters for one mesh.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    /// Base surface color, linear RGB.
    pub base_color: Vec3,
    pub features: MaterialFeatures,
}

impl Material {
    #[must_use]
    pub fn new(base_color: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            base_color,
            features: MaterialFeatures::empty(),
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: MaterialFeatures) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn uses_vertex_colors(&self) -> bool {
        self.features.contains(MaterialFeatures::USE_VERTEX_COLORS)
    }

    #[must_use]
    pub fn is_unlit(&self) -> bool {
        self.features.contains(MaterialFeatures::UNLIT)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(rgb_from_hex(DEFAULT_TINT))
    }
}

/// Unpacks a `0xRRGGBB` color into normalized linear RGB.
#[must_use]
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
