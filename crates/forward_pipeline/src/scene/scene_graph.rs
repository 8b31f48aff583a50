//! Bounding volumes and view frustum for visibility culling

use crate::foundation::math::{Mat4, Mat4Ext, Point3, Vec3, Vec4};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounding box of this box after an affine transform
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);

        for corner in self.corners() {
            let p = transform.transform_point(&Point3::from(corner)).coords;
            min = min.inf(&p);
            max = max.sup(&p);
        }

        Self { min, max }
    }
}

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Plane from `(a, b, c, d)` coefficients of `ax + by + cz + d = 0`
    ///
    /// Returns `None` if the normal part is degenerate.
    pub fn from_coefficients(coefficients: Vec4) -> Option<Self> {
        let normal = coefficients.xyz();
        let length = normal.norm();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            normal: normal / length,
            distance: coefficients.w / length,
        })
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Frustum for visibility culling
///
/// Plane normals point into the view volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Six planes defining the frustum (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix
    ///
    /// Gribb-Hartmann extraction for clip space with depth in `[0, 1]`.
    /// Returns `None` when any plane degenerates, which happens for matrices
    /// built from invalid projection parameters.
    pub fn from_matrix(vp_matrix: &Mat4) -> Option<Self> {
        let r0 = vp_matrix.row_vector(0);
        let r1 = vp_matrix.row_vector(1);
        let r2 = vp_matrix.row_vector(2);
        let r3 = vp_matrix.row_vector(3);

        Some(Self {
            planes: [
                Plane::from_coefficients(r3 + r0)?,
                Plane::from_coefficients(r3 - r0)?,
                Plane::from_coefficients(r3 + r1)?,
                Plane::from_coefficients(r3 - r1)?,
                Plane::from_coefficients(r2)?,
                Plane::from_coefficients(r3 - r2)?,
            ],
        })
    }

    /// Check if an AABB is inside or intersects the frustum
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        for plane in &self.planes {
            // Corner furthest along the plane normal
            let mut p = aabb.min;
            if plane.normal.x >= 0.0 { p.x = aabb.max.x; }
            if plane.normal.y >= 0.0 { p.y = aabb.max.y; }
            if plane.normal.z >= 0.0 { p.z = aabb.max.z; }

            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }

        true
    }

    /// Check if a sphere is inside or intersects the frustum
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }
}
