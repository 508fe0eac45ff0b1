// Re-export the double precision glam types used across the workspace
pub use glam::{dvec3, DVec3};

/// 3-component vector used for points, directions, normals and colors.
///
/// All scene math runs in double precision: the intersection tests rely on
/// 1e-9 tolerances that single precision cannot resolve.
pub type Vec3 = DVec3;

// Whitted math types
mod ray;
mod sphere;
mod triangle;

pub use ray::Ray;
pub use sphere::Sphere;
pub use triangle::Triangle;
