//! Intersect trait and Intersection record for ray-primitive tests.

use whitted_math::{Ray, Vec3};

/// Record of a successful ray-primitive test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal, oriented toward the side the ray came from
    pub normal: Vec3,
    /// Distance from the ray origin to `position`
    pub distance: f64,
}

impl Intersection {
    pub fn new(position: Vec3, normal: Vec3, distance: f64) -> Self {
        Self {
            position,
            normal,
            distance,
        }
    }
}

/// Trait for primitives that can be hit by rays.
///
/// A miss is the common case and is reported as `None`. Only hits in the
/// ray's forward direction are returned.
pub trait Intersect {
    /// Nearest valid hit of `ray` with this primitive.
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;
}
