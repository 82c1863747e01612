//! View frustum and the visibility seam used by the streamer

use super::aabb::Aabb;
use crate::core::types::{Mat4, Vec3, Vec4};

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Build from `ax + by + cz + d` coefficients, normalizing the normal
    fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len == 0.0 {
            return Self::new(Vec3::Y, f32::INFINITY);
        }
        Self::new(normal / len, v.w / len)
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Answers whether a world-space box could be on screen.
///
/// The streamer only needs this one question from the renderer, so any
/// camera model can drive chunk loading by implementing it.
pub trait Visibility {
    fn is_box_visible(&self, aabb: &Aabb) -> bool;
}

impl<F: Fn(&Aabb) -> bool> Visibility for F {
    fn is_box_visible(&self, aabb: &Aabb) -> bool {
        self(aabb)
    }
}

/// Visibility test that accepts everything, for headless runs
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysVisible;

impl Visibility for AlwaysVisible {
    fn is_box_visible(&self, _aabb: &Aabb) -> bool {
        true
    }
}

/// View frustum with 6 planes (Near, Far, Left, Right, Top, Bottom)
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a combined view-projection matrix
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));
        Self {
            planes: [
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r1),
            ],
        }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) >= 0.0)
    }

    /// Conservative box test: rejected only if fully behind one plane
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|p| p.distance_to_point(aabb.positive_vertex(p.normal)) >= 0.0)
    }
}

impl Visibility for Frustum {
    fn is_box_visible(&self, aabb: &Aabb) -> bool {
        self.intersects_aabb(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        let proj = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(Vec3::Y, 0.0);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, 5.0, 0.0)), 5.0);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, -3.0, 0.0)), -3.0);
    }

    #[test]
    fn test_frustum_contains_point() {
        let frustum = test_frustum();
        assert!(frustum.contains_point(Vec3::ZERO));
        assert!(!frustum.contains_point(Vec3::new(50.0, 0.0, 0.0)));
    }

    #[test]
    fn test_box_visibility() {
        let frustum = test_frustum();
        let inside = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let straddling = Aabb::new(Vec3::new(8.0, -1.0, -1.0), Vec3::new(30.0, 1.0, 1.0));
        let outside = Aabb::new(Vec3::new(20.0, -1.0, -1.0), Vec3::new(30.0, 1.0, 1.0));
        assert!(frustum.is_box_visible(&inside));
        assert!(frustum.is_box_visible(&straddling));
        assert!(!frustum.is_box_visible(&outside));
    }

    #[test]
    fn test_always_visible() {
        let far = Aabb::new(Vec3::splat(1.0e6), Vec3::splat(1.0e6 + 1.0));
        assert!(AlwaysVisible.is_box_visible(&far));
    }
}
