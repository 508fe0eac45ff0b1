//! Core Whitted ray tracer.
//!
//! Implements recursive ray tracing with:
//! - Direct illumination from point lights with hard shadows
//! - Specular reflection and refraction up to a configurable depth
//! - Depth and normal preview modes

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whitted_core::{Material, Scene};
use whitted_math::{Ray, Vec3};

use crate::bucket::{render_frame, DEFAULT_BUCKET_SIZE};
use crate::camera::{Camera, CameraOptions};
use crate::hit::{is_occluded, nearest_hit, Hit};
use crate::output::Image;
use crate::post;
use crate::shading::{reflect, refract};

/// Linear RGB radiance.
pub type Color = Vec3;

/// Offset along the normal for secondary ray origins, so they do not
/// re-hit the surface they start on.
pub const SURFACE_OFFSET: f64 = 1e-6;

/// Errors raised for invalid render settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid resolution {width}x{height}: both dimensions must be positive")]
    InvalidResolution { width: u32, height: u32 },

    #[error("invalid field of view {0} rad: must lie strictly between 0 and pi")]
    InvalidFov(f64),

    #[error("camera look-from and look-to coincide")]
    DegenerateView,

    #[error("bucket size must be positive")]
    InvalidBucketSize,

    #[error("unknown render mode '{0}' (expected depth, normal or full)")]
    UnknownMode(String),
}

/// What a render writes into each pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Grayscale distance to the nearest hit
    Depth,
    /// Shading normal mapped to RGB
    Normal,
    /// Full recursive shading
    #[default]
    Full,
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth" => Ok(RenderMode::Depth),
            "normal" => Ok(RenderMode::Normal),
            "full" => Ok(RenderMode::Full),
            _ => Err(RenderError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Depth => "depth",
            RenderMode::Normal => "normal",
            RenderMode::Full => "full",
        };
        f.write_str(name)
    }
}

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub mode: RenderMode,
    /// Maximum number of ray generations; 0 renders black in full mode
    pub depth: u32,
    /// Edge length of the square tiles rendered in parallel
    pub bucket_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Full,
            depth: 4,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderOptions {
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }
}

/// Which side of a refractive boundary a ray travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Outside,
    Inside,
}

/// Radiance arriving along a primary ray.
pub fn cast(scene: &Scene, ray: &Ray, max_depth: u32) -> Color {
    trace(scene, ray, Medium::Outside, 0, max_depth)
}

fn trace(scene: &Scene, ray: &Ray, medium: Medium, depth: u32, max_depth: u32) -> Color {
    if depth >= max_depth {
        return Color::ZERO;
    }
    let Some(hit) = nearest_hit(scene, ray) else {
        return Color::ZERO;
    };

    let material = hit.material;
    let position = hit.position();
    let normal = hit.normal;
    let direction = (position - ray.origin()).normalize();
    let local = local_illumination(scene, &hit, ray.origin());

    // Both branches are traced even at zero weight so NaN from a failed
    // refraction still reaches the pixel.
    match medium {
        Medium::Inside => {
            let refracted = Ray::new(
                position - SURFACE_OFFSET * normal,
                refract(direction, normal, material.refraction_index),
            );
            let weight = material.albedo[1] + material.albedo[2];
            local + weight * trace(scene, &refracted, Medium::Outside, depth + 1, max_depth)
        }
        Medium::Outside => {
            let reflected = Ray::new(
                position + SURFACE_OFFSET * normal,
                reflect(direction, normal),
            );
            let refracted = Ray::new(
                position - SURFACE_OFFSET * normal,
                refract(direction, normal, 1.0 / material.refraction_index),
            );
            let next = depth + 1;
            local
                + material.albedo[1] * trace(scene, &reflected, Medium::Outside, next, max_depth)
                + material.albedo[2] * trace(scene, &refracted, Medium::Inside, next, max_depth)
        }
    }
}

/// Ambient, emission and unshadowed Phong terms of every light at `hit`,
/// as seen from `eye`.
pub fn local_illumination(scene: &Scene, hit: &Hit<'_>, eye: Vec3) -> Color {
    let material: &Material = hit.material;
    let position = hit.position();
    let normal = hit.normal;
    let diffuse_weight = material.albedo[0];

    let mut color = material.ambient_color + material.intensity;
    for light in scene.lights() {
        let to_light = (light.position - position).normalize();
        let distance = position.distance(light.position);
        let shadow = Ray::new(position + SURFACE_OFFSET * normal, to_light);
        if is_occluded(scene, &shadow, distance) {
            continue;
        }

        let diffuse = normal.dot(to_light).max(0.0);
        color += diffuse_weight * diffuse * material.diffuse_color * light.intensity;

        let to_eye = (eye - position).normalize();
        let specular = to_eye
            .dot(reflect(-to_light, normal))
            .max(0.0)
            .powf(material.specular_exponent);
        color += diffuse_weight * specular * material.specular_color * light.intensity;
    }
    color
}

/// Simple dense buffer for intermediate per-pixel render output.
#[derive(Debug, Clone)]
pub struct Framebuffer<T> {
    width: u32,
    height: u32,
    pixels: Vec<T>,
}

impl<T: Copy + Default> Framebuffer<T> {
    /// Create a new buffer filled with `T::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![T::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> T {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set the value at (x, y).
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = value;
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    /// Convert every value to an RGB pixel.
    pub fn to_image(&self, mut convert: impl FnMut(T) -> [u8; 3]) -> Image {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|value| convert(*value)).collect(),
        }
    }
}

/// Render `scene` as seen through `camera_options`.
pub fn render(
    scene: &Scene,
    camera_options: &CameraOptions,
    options: &RenderOptions,
) -> Result<Image, RenderError> {
    let camera = Camera::new(camera_options)?;
    let start = Instant::now();

    let image = match options.mode {
        RenderMode::Depth => render_depth(scene, &camera, options.bucket_size)?,
        RenderMode::Normal => render_normal(scene, &camera, options.bucket_size)?,
        RenderMode::Full => render_full(scene, &camera, options)?,
    };

    log::info!(
        "Rendered '{}' {}x{} ({} mode, depth {}) in {:.2?}",
        scene.name(),
        camera.width(),
        camera.height(),
        options.mode,
        options.depth,
        start.elapsed()
    );
    Ok(image)
}

fn render_depth(scene: &Scene, camera: &Camera, bucket_size: u32) -> Result<Image, RenderError> {
    // Misses are 0, the same as a hit at the origin
    let distances = render_frame(camera.width(), camera.height(), bucket_size, |i, j| {
        nearest_hit(scene, &camera.ray(i, j)).map_or(0.0, |hit| hit.distance())
    })?;

    let max = distances.pixels().iter().copied().fold(0.0, f64::max);
    Ok(distances.to_image(|distance| {
        let value = if distance > 0.0 { distance / max } else { 255.0 / 256.0 };
        let gray = (value * 256.0) as u8;
        [gray; 3]
    }))
}

fn render_normal(scene: &Scene, camera: &Camera, bucket_size: u32) -> Result<Image, RenderError> {
    let normals = render_frame(camera.width(), camera.height(), bucket_size, |i, j| {
        nearest_hit(scene, &camera.ray(i, j)).map(|hit| hit.normal)
    })?;

    Ok(normals.to_image(|normal| match normal {
        Some(n) => {
            let c = 255.0 * (0.5 * n + Vec3::splat(0.5));
            [c.x as u8, c.y as u8, c.z as u8]
        }
        None => [0; 3],
    }))
}

fn render_full(
    scene: &Scene,
    camera: &Camera,
    options: &RenderOptions,
) -> Result<Image, RenderError> {
    let mut radiance = render_frame(camera.width(), camera.height(), options.bucket_size, |i, j| {
        cast(scene, &camera.ray(i, j), options.depth)
    })?;

    post::tone_map_frame(radiance.pixels_mut());
    Ok(radiance.to_image(post::to_rgb))
}
