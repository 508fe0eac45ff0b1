use std::ops::{Index, IndexMut};

use crate::Vec3;

/// Three ordered vertices.
///
/// The same type carries geometry positions, per-vertex texture
/// coordinates and per-vertex normals; the three triangles of a scene
/// object share index semantics.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Get a vertex by index (0, 1 or 2).
    #[inline]
    pub fn vertex(&self, index: usize) -> Vec3 {
        self.vertices[index]
    }

    /// First and second edge, both starting at vertex 0.
    #[inline]
    pub fn edges(&self) -> (Vec3, Vec3) {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0, v2 - v0)
    }

    /// Surface area (half the length of the edge cross product).
    pub fn area(&self) -> f64 {
        let (e1, e2) = self.edges();
        e1.cross(e2).length() / 2.0
    }

    /// True when every component of every vertex is within `eps` of zero.
    pub fn is_near_zero(&self, eps: f64) -> bool {
        self.vertices
            .iter()
            .all(|v| v.abs().max_element() < eps)
    }

    /// Barycentric coordinates of `point` with respect to this triangle.
    ///
    /// Each coordinate is the area of the sub-triangle obtained by
    /// replacing that vertex with `point`, divided by the sum of all three
    /// sub-triangle areas. For points in the triangle's plane and inside it
    /// the coordinates sum to one.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        let mut areas = [0.0; 3];
        for (i, area) in areas.iter_mut().enumerate() {
            let mut sub = *self;
            sub[i] = point;
            *area = sub.area();
        }
        let sum: f64 = areas.iter().sum();
        Vec3::from_array(areas) / sum
    }

    /// Blend the three vertices with the given weights.
    pub fn interpolate(&self, weights: Vec3) -> Vec3 {
        weights.x * self.vertices[0] + weights.y * self.vertices[1] + weights.z * self.vertices[2]
    }
}

impl Index<usize> for Triangle {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.vertices[index]
    }
}

impl IndexMut<usize> for Triangle {
    fn index_mut(&mut self, index: usize) -> &mut Vec3 {
        &mut self.vertices[index]
    }
}
