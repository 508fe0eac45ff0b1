//! OBJ-style scene files for Whitted.
//!
//! Geometry comes from a Wavefront-like text format extended with two
//! statements, `S` for spheres and `P` for point lights. Materials come
//! from MTL-like libraries with an extra `al` statement carrying the
//! diffuse/reflective/refractive weights.
//!
//! ## Not Supported
//!
//! - Groups, smoothing groups and object names (ignored)
//! - Texture maps (texture coordinates are loaded but unused)
//! - Line and point elements
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::obj::load_scene;
//!
//! let scene = load_scene("scenes/cornell/scene.obj")?;
//! println!("{} lights", scene.lights().len());
//! ```

mod loader;
mod parser;

pub use loader::*;
pub use parser::*;
