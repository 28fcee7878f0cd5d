//! Mesh Geometry
//!
//! CPU-side vertex data decoded from a PLY file, plus the normalization
//! math that fits every loaded mesh into the canonical view volume before
//! it is displayed.

use glam::Vec3;
use uuid::Uuid;

/// Largest extent of the canonical view volume, in world units.
///
/// Every loaded mesh is re-centered on the origin and uniformly rescaled so
/// that its longest bounding-box axis spans exactly this many units. The
/// camera's initial distance and clip planes are tuned around this value.
pub const TARGET_SIZE: f32 = 3.0;

/// Primitive topology of a [`Geometry`].
///
/// Meshes with face connectivity render as triangle lists; PLY files that
/// carry only a vertex element (a point cloud) render as point lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    PointList,
}

/// Axis-aligned bounding box in the geometry's local space.
///
/// Always derived from the current vertex positions, never cached across
/// edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Computes the box enclosing `points`. Empty input yields a default
    /// (zero) box.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }

        Self { min, max }
    }
}

/// Vertex data for a single mesh.
///
/// `normals` and `colors`, when present, run parallel to `positions` (same
/// length, same order); the PLY decoder guarantees this. `indices`, when
/// present, is a triangle list referencing `positions`.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub colors: Option<Vec<Vec3>>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    #[must_use]
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            positions,
            normals: None,
            colors: None,
            indices: None,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.as_ref().map_or(0, |indices| indices.len() / 3)
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        if self.indices.is_some() {
            Topology::TriangleList
        } else {
            Topology::PointList
        }
    }

    #[must_use]
    pub fn has_vertex_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Recomputes the axis-aligned bounding box from the current positions.
    #[must_use]
    pub fn compute_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.positions)
    }

    /// Computes smooth per-vertex normals from the face topology.
    ///
    /// Each triangle contributes its area-weighted face normal (the cross
    /// product's length is twice the triangle area, so larger faces weigh
    /// more) to its three corners; the accumulated sums are normalized at
    /// the end. Degenerate triangles contribute nothing and isolated
    /// vertices end up with a zero normal.
    ///
    /// Point clouds have no topology to derive normals from; this is a
    /// no-op when `indices` is absent.
    pub fn compute_vertex_normals(&mut self) {
        let Some(indices) = &self.indices else {
            return;
        };

        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for triangle in indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            // Out-of-range indices are skipped rather than trusted.
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let v0 = self.positions[i0];
            let v1 = self.positions[i1];
            let v2 = self.positions[i2];

            let face_normal = (v1 - v0).cross(v2 - v0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Centers the mesh on the origin and uniformly rescales it so the
    /// longest bounding-box axis spans [`TARGET_SIZE`] units.
    ///
    /// A box with zero extent on every axis (a single point, or fully
    /// coincident vertices) keeps a scale of 1.0 instead of dividing by
    /// zero; the result is always finite. Applying this twice is a no-op
    /// up to floating-point rounding.
    pub fn normalize_to_view_volume(&mut self) {
        if self.positions.is_empty() {
            return;
        }

        let bounds = self.compute_bounding_box();
        let center = bounds.center();
        let max_extent = bounds.size().max_element();

        let scale = if max_extent > f32::EPSILON {
            TARGET_SIZE / max_extent
        } else {
            1.0
        };

        for p in &mut self.positions {
            *p = (*p - center) * scale;
        }
    }
}
