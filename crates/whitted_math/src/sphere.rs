use crate::Vec3;

/// A sphere given by its center and radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// True when `point` lies strictly inside the sphere.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) < self.radius
    }
}
