//! Core Resource Definitions
//!
//! CPU-side data structures the renderer consumes, independent of any GPU
//! implementation:
//! - Geometry: vertex data and the canonical-volume normalization
//! - Material: shading parameters
//! - Mesh: geometry + material + placement

pub mod geometry;
pub mod material;
pub mod mesh;

pub use geometry::{BoundingBox, Geometry, Topology, TARGET_SIZE};
pub use material::{rgb_from_hex, Material, MaterialFeatures, DEFAULT_TINT};
pub use mesh::Mesh;
