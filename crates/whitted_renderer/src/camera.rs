//! Camera for primary ray generation.

use serde::{Deserialize, Serialize};
use whitted_math::{Ray, Vec3};

use crate::RenderError;

/// Below this, `1 - |forward.y|` means the camera looks straight up or down.
const VERTICAL_EPS: f64 = 1e-9;

/// User-facing camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Vertical field of view in radians
    pub fov: f64,
    pub look_from: Vec3,
    pub look_to: Vec3,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            fov: std::f64::consts::FRAC_PI_2,
            look_from: Vec3::ZERO,
            look_to: Vec3::NEG_Z,
        }
    }
}

impl CameraOptions {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Set the vertical field of view in radians.
    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_to: Vec3) -> Self {
        self.look_from = look_from;
        self.look_to = look_to;
        self
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.screen_width as f64 / self.screen_height as f64
    }
}

/// Pinhole camera with a precomputed orthonormal basis.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    width: u32,
    height: u32,
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    aspect: f64,
    scale: f64,
}

impl Camera {
    /// Validate `options` and build the camera basis.
    pub fn new(options: &CameraOptions) -> Result<Self, RenderError> {
        if options.screen_width == 0 || options.screen_height == 0 {
            return Err(RenderError::InvalidResolution {
                width: options.screen_width,
                height: options.screen_height,
            });
        }
        let fov = options.fov;
        if !fov.is_finite() || fov <= 0.0 || fov >= std::f64::consts::PI {
            return Err(RenderError::InvalidFov(fov));
        }

        // Forward points back toward the viewer; rays travel along -forward
        let forward = (options.look_from - options.look_to).normalize();
        if !forward.is_finite() {
            return Err(RenderError::DegenerateView);
        }
        let right = if 1.0 - forward.y.abs() < VERTICAL_EPS {
            Vec3::X
        } else {
            Vec3::Y.cross(forward).normalize()
        };
        let up = forward.cross(right).normalize();

        Ok(Self {
            width: options.screen_width,
            height: options.screen_height,
            origin: options.look_from,
            right,
            up,
            forward,
            aspect: options.aspect_ratio(),
            scale: (fov * 0.5).tan(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World-space direction through the center of pixel (i, j), where
    /// `j = 0` is the top row.
    pub fn direction(&self, i: u32, j: u32) -> Vec3 {
        let x = (2.0 * (i as f64 + 0.5) / self.width as f64 - 1.0) * self.aspect * self.scale;
        let y = (2.0 * (j as f64 + 0.5) / self.height as f64 - 1.0) * self.scale;
        let local = Vec3::new(x, -y, -1.0).normalize();
        (local.x * self.right + local.y * self.up + local.z * self.forward).normalize()
    }

    /// Primary ray for pixel (i, j).
    pub fn ray(&self, i: u32, j: u32) -> Ray {
        Ray::new(self.origin, self.direction(i, j))
    }
}
