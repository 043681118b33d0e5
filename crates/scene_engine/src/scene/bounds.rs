//! Culling volumes: axis-aligned boxes, planes, and view frustums

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Axis-aligned bounding box used for object culling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new box from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check whether a point lies inside the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check whether this box overlaps another
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Normal vector (normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane, normalizing the input
    ///
    /// A zero-length normal yields a degenerate plane that classifies every
    /// point as on the plane, so it never culls anything.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let length = normal.magnitude();
        if length <= f32::EPSILON {
            Self {
                normal: Vec3::zeros(),
                distance: 0.0,
            }
        } else {
            Self {
                normal: normal / length,
                distance: distance / length,
            }
        }
    }

    /// Signed distance from the plane to a point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// View frustum for visibility culling
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Six inward-facing planes (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six inward-facing planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a combined view-projection matrix
    ///
    /// Gribb-Hartmann extraction for matrices with an OpenGL-style clip
    /// volume (`-w <= z <= w`), which is what `nalgebra`'s perspective and
    /// orthographic constructors produce.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row = |i: usize| Vec4::new(vp[(i, 0)], vp[(i, 1)], vp[(i, 2)], vp[(i, 3)]);
        let plane = |v: Vec4| Plane::new(Vec3::new(v.x, v.y, v.z), v.w);

        let w = row(3);
        Self {
            planes: [
                plane(w + row(0)), // left
                plane(w - row(0)), // right
                plane(w + row(1)), // bottom
                plane(w - row(1)), // top
                plane(w + row(2)), // near
                plane(w - row(2)), // far
            ],
        }
    }

    /// A frustum that passes everything
    ///
    /// Useful for layers that must see the whole scene, such as full-scene
    /// debug overlays.
    pub fn unbounded() -> Self {
        Self {
            planes: [Plane::new(Vec3::zeros(), 0.0); 6],
        }
    }

    /// Check whether a point lies inside the frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Check whether a box is inside or intersects the frustum
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        // p-vertex test: if the box corner farthest along the plane normal
        // is behind the plane, the whole box is outside
        for plane in &self.planes {
            let mut p = aabb.min;
            if plane.normal.x >= 0.0 {
                p.x = aabb.max.x;
            }
            if plane.normal.y >= 0.0 {
                p.y = aabb.max.y;
            }
            if plane.normal.z >= 0.0 {
                p.z = aabb.max.z;
            }

            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;

    fn ortho_frustum() -> Frustum {
        // unit-ish box looking down -Z from the origin
        let projection = Mat4::new_orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
        Frustum::from_view_projection(&projection)
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let c = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_extracted_frustum_classifies_points() {
        let frustum = ortho_frustum();

        // inside the ortho volume
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -1.0)));
        // behind the camera
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 1.0)));
        // outside the left plane
        assert!(!frustum.contains_point(Vec3::new(-2.0, 0.0, -1.0)));
        // past the far plane
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -20.0)));
    }

    #[test]
    fn test_frustum_aabb_culling() {
        let frustum = ortho_frustum();

        let inside = Aabb::from_center_extents(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.5, 0.5, 0.5));
        let straddling =
            Aabb::from_center_extents(Vec3::new(1.0, 0.0, -2.0), Vec3::new(0.5, 0.5, 0.5));
        let outside =
            Aabb::from_center_extents(Vec3::new(5.0, 0.0, -2.0), Vec3::new(0.5, 0.5, 0.5));

        assert!(frustum.intersects_aabb(&inside));
        assert!(frustum.intersects_aabb(&straddling));
        assert!(!frustum.intersects_aabb(&outside));
    }

    #[test]
    fn test_perspective_frustum_with_view_transform() {
        // camera at +5 on Z, looking at the origin
        let projection = Mat4::new_perspective(1.0, std::f32::consts::FRAC_PI_3, 0.1, 100.0);
        let view = Mat4::look_at_rh(
            &Point3::new(0.0, 0.0, 5.0),
            &Point3::origin(),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        let frustum = Frustum::from_view_projection(&(projection * view));

        assert!(frustum.contains_point(Vec3::zeros()));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_unbounded_frustum_passes_everything() {
        let frustum = Frustum::unbounded();
        let far_away = Aabb::from_center_extents(Vec3::new(1e6, -1e6, 1e6), Vec3::new(1.0, 1.0, 1.0));

        assert!(frustum.intersects_aabb(&far_away));
    }
}
