//! Whitted Renderer - CPU Whitted-style ray tracing
//!
//! Renders a [`whitted_core::Scene`] of triangles, spheres and point lights
//! into an 8-bit RGB [`Image`]:
//!
//! - **Intersection**: closed-form ray/sphere and Möller-Trumbore
//!   ray/triangle tests behind the [`Intersect`] trait
//! - **Transport**: [`cast`] adds local Phong illumination with hard shadows
//!   to recursively traced reflection and refraction
//! - **Modes**: depth and normal previews besides full shading
//! - **Post**: extended Reinhard tone mapping, gamma 2.2, quantization
//!
//! Buckets are rendered in parallel with rayon; the output does not depend
//! on the bucket size.
//!
//! # Example
//!
//! ```ignore
//! use whitted_renderer::{render, CameraOptions, RenderOptions};
//!
//! let scene = whitted_core::load_scene("scene.obj")?;
//! let image = render(&scene, &CameraOptions::default(), &RenderOptions::default())?;
//! image.save("out.png")?;
//! ```

mod bucket;
mod camera;
mod hit;
mod intersection;
mod output;
pub mod post;
mod renderer;
mod shading;
mod sphere;
mod triangle;

pub use bucket::{
    generate_buckets, render_bucket, render_frame, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, CameraOptions};
pub use hit::{is_occluded, nearest_hit, Hit};
pub use intersection::{Intersect, Intersection};
pub use output::{Image, ImageError};
pub use renderer::{
    cast, local_illumination, render, Color, Framebuffer, Medium, RenderError, RenderMode,
    RenderOptions, SURFACE_OFFSET,
};
pub use shading::{reflect, refract};

/// Re-export math types from whitted_math
pub use whitted_math::{Ray, Sphere, Triangle, Vec3};
