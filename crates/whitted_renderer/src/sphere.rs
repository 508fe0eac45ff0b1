//! Ray-sphere intersection.

use whitted_math::{Ray, Sphere};

use crate::intersection::{Intersect, Intersection};

impl Intersect for Sphere {
    /// Geometric (closest-approach) solution.
    ///
    /// A closest approach behind the origin is rejected even when the
    /// origin lies inside the sphere; such rays report no hit.
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let origin = ray.origin();
        let direction = ray.direction();

        let l = self.center - origin;
        let tc = l.dot(direction);
        if tc < 0.0 {
            return None;
        }

        let d2 = l.length_squared() - tc * tc;
        let radius2 = self.radius * self.radius;
        if d2 > radius2 {
            return None;
        }

        let half_chord = (radius2 - d2).sqrt();
        let near = ray.at(tc - half_chord);
        let far = ray.at(tc + half_chord);

        let inside = self.contains(origin);
        let position = if inside {
            // Only the exit point lies ahead of an interior origin
            if direction.dot(near - origin) > 0.0 {
                near
            } else {
                far
            }
        } else if origin.distance(near) < origin.distance(far) {
            near
        } else {
            far
        };

        let normal = if inside {
            self.center - position
        } else {
            position - self.center
        };

        Some(Intersection::new(
            position,
            normal.normalize(),
            origin.distance(position),
        ))
    }
}
