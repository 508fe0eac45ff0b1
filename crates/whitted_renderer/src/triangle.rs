//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use whitted_math::{Ray, Triangle};

use crate::intersection::{Intersect, Intersection};

/// Determinants below this are treated as a ray parallel to the plane.
const PARALLEL_EPS: f64 = 1e-9;

impl Intersect for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let (edge1, edge2) = self.edges();

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPS {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self[0];
        let u = tvec.dot(pvec) * inv_det;

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        // Only hits in front of the origin count
        let k = edge2.dot(qvec) * inv_det;
        if k < 0.0 {
            return None;
        }

        let position = ray.at(k);

        // Of the two face normals keep the one on the origin's side
        let face_normal = edge1.cross(edge2).normalize();
        let origin = ray.origin();
        let normal = if (position + face_normal).distance(origin)
            < (position - face_normal).distance(origin)
        {
            face_normal
        } else {
            -face_normal
        };

        Some(Intersection::new(position, normal, origin.distance(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use whitted_math::Vec3;

    fn facing_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        // Ray pointing at triangle center
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = facing_triangle().intersect(&ray).unwrap();

        assert!((hit.distance - 1.0).abs() < 1e-12);
        assert!((hit.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!((hit.normal - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_triangle_miss() {
        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(facing_triangle().intersect(&ray).is_none());

        // Ray passing outside the edges
        let ray = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::NEG_Z);
        assert!(facing_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        assert!(facing_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let line = Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, -1.0),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(line.intersect(&ray).is_none());
    }

    #[test]
    fn test_normal_faces_origin_from_both_sides() {
        let tri = facing_triangle();

        let front = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!((tri.intersect(&front).unwrap().normal - Vec3::Z).length() < 1e-12);

        let back = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let hit = tri.intersect(&back).unwrap();
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-12);
        assert!((hit.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_lies_in_triangle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = 0;

        for _ in 0..500 {
            let mut vertex = || {
                Vec3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-6.0..-2.0),
                )
            };
            let tri = Triangle::new(vertex(), vertex(), vertex());
            let target = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), -4.0);
            let ray = Ray::new(Vec3::ZERO, target.normalize());

            if let Some(hit) = tri.intersect(&ray) {
                hits += 1;
                let (e1, e2) = tri.edges();
                let plane_normal = e1.cross(e2).normalize();
                assert!((hit.position - tri[0]).dot(plane_normal).abs() < 1e-6);

                let coords = tri.barycentric(hit.position);
                assert!((coords.x + coords.y + coords.z - 1.0).abs() < 1e-6);
                for c in coords.to_array() {
                    assert!((-1e-6..=1.0 + 1e-6).contains(&c));
                }
                assert!((hit.normal.length() - 1.0).abs() < 1e-9);
            }
        }

        assert!(hits > 20, "only {} random rays hit", hits);
    }
}
