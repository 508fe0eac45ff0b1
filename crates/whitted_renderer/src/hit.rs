//! Nearest-hit resolution and shadow queries over a whole scene.
//!
//! Intersection is brute force: every triangle object, then every sphere
//! object, in insertion order.

use whitted_core::{Material, Object, Scene, SphereObject};
use whitted_math::{Ray, Vec3};

use crate::intersection::{Intersect, Intersection};

/// Extra reach added to a shadow ray so that occluders sitting at the
/// light's position still count.
const SHADOW_TOLERANCE: f64 = 1e-5;

/// The closest primitive hit along a ray.
#[derive(Clone, Copy, Debug)]
pub struct Hit<'a> {
    pub intersection: Intersection,
    /// Normal used for shading: the authored blend when the object has
    /// vertex normals, the geometric normal otherwise
    pub normal: Vec3,
    pub material: &'a Material,
}

impl<'a> Hit<'a> {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.intersection.position
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.intersection.distance
    }
}

#[derive(Clone, Copy)]
enum Source<'a> {
    Triangle(&'a Object),
    Sphere(&'a SphereObject),
}

fn intersections<'a>(
    scene: &'a Scene,
    ray: &'a Ray,
) -> impl Iterator<Item = (Intersection, Source<'a>)> + 'a {
    let triangles = scene
        .objects()
        .iter()
        .filter_map(move |o| o.polygon.intersect(ray).map(|i| (i, Source::Triangle(o))));
    let spheres = scene
        .sphere_objects()
        .iter()
        .filter_map(move |o| o.sphere.intersect(ray).map(|i| (i, Source::Sphere(o))));
    triangles.chain(spheres)
}

/// Find the closest hit of `ray` in `scene`.
///
/// On equal distances the first primitive in iteration order wins.
pub fn nearest_hit<'a>(scene: &'a Scene, ray: &Ray) -> Option<Hit<'a>> {
    let mut nearest: Option<(Intersection, Source<'_>)> = None;
    for (intersection, source) in intersections(scene, ray) {
        let closer = nearest
            .as_ref()
            .map_or(true, |(best, _)| intersection.distance < best.distance);
        if closer {
            nearest = Some((intersection, source));
        }
    }

    nearest.map(|(intersection, source)| {
        let (normal, material) = match source {
            Source::Triangle(object) => (
                object.shading_normal(intersection.position, intersection.normal),
                object.material,
            ),
            Source::Sphere(object) => (intersection.normal, object.material),
        };
        Hit {
            intersection,
            normal,
            material: scene.material(material),
        }
    })
}

/// True if anything along `ray` lies closer than `distance`
/// (plus a small tolerance).
pub fn is_occluded(scene: &Scene, ray: &Ray, distance: f64) -> bool {
    intersections(scene, ray).any(|(hit, _)| hit.distance < distance + SHADOW_TOLERANCE)
}
