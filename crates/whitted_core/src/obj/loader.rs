//! High-level scene loading.
//!
//! Turns an OBJ-style scene file plus its material libraries into a frozen
//! [`Scene`]. Face indices are resolved here; the renderer only ever sees
//! concrete triangles.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use whitted_math::{Sphere, Triangle, Vec3};

use crate::obj::parser::{
    parse_materials, resolve_index, statements, FaceVertex, ParseError, Statement,
};
use crate::scene::{Light, MaterialId, Object, Scene, SceneBuilder, SceneError, SphereObject};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Geometry at line {0} is defined before any usemtl")]
    NoActiveMaterial(usize),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file from disk.
///
/// `mtllib` paths are resolved relative to the scene file's directory.
///
/// # Example
///
/// ```ignore
/// use whitted_core::obj::load_scene;
///
/// let scene = load_scene("scenes/box/scene.obj")?;
/// println!("Loaded {} primitives", scene.primitive_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let content = fs::read_to_string(path)?;
    load_scene_with(name, &content, |library| {
        fs::read_to_string(base_dir.join(library))
    })
}

/// Load a scene from text, fetching material libraries through `read_library`.
///
/// `read_library` receives the argument of each `mtllib` statement and
/// returns the library's contents.
pub fn load_scene_with<F>(name: &str, content: &str, read_library: F) -> LoadResult<Scene>
where
    F: FnMut(&str) -> io::Result<String>,
{
    let mut state = LoadState::new(name, read_library);
    for statement in statements(content) {
        state.apply(&statement)?;
    }

    let scene = state.builder.build();
    if scene.is_empty() {
        log::warn!("Scene {} contains no geometry", scene.name());
    }
    log::info!(
        "Loaded scene {}: {} triangles, {} spheres, {} lights, {} materials",
        scene.name(),
        scene.objects().len(),
        scene.sphere_objects().len(),
        scene.lights().len(),
        scene.materials().len()
    );
    Ok(scene)
}

/// Parse state for a single pass over a scene file.
struct LoadState<F> {
    builder: SceneBuilder,
    read_library: F,
    vertices: Vec<Vec3>,
    texture_coords: Vec<Vec3>,
    normals: Vec<Vec3>,
    current_material: Option<String>,
}

impl<F> LoadState<F>
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn new(name: &str, read_library: F) -> Self {
        Self {
            builder: SceneBuilder::new(name),
            read_library,
            vertices: Vec::new(),
            texture_coords: Vec::new(),
            normals: Vec::new(),
            current_material: None,
        }
    }

    fn apply(&mut self, statement: &Statement<'_>) -> Result<(), LoadError> {
        match statement.keyword {
            "mtllib" => {
                let library = statement.name()?;
                let content = (self.read_library)(library)?;
                let materials = parse_materials(&content)?;
                log::debug!("Read {} materials from {}", materials.len(), library);
                for material in materials {
                    self.builder.add_material(material);
                }
            }
            "usemtl" => self.current_material = Some(statement.name()?.to_string()),
            "v" => self.vertices.push(statement.padded_vector()?),
            "vt" => self.texture_coords.push(statement.padded_vector()?),
            "vn" => self.normals.push(statement.padded_vector()?),
            "S" => {
                statement.expect_args(4)?;
                let material = self.material(statement.line)?;
                let sphere = Sphere::new(statement.vector(0)?, statement.real(3)?);
                self.builder
                    .add_sphere_object(SphereObject::new(material, sphere))?;
            }
            "P" => {
                statement.expect_args(6)?;
                self.builder
                    .add_light(Light::new(statement.vector(0)?, statement.vector(3)?));
            }
            "f" => self.add_face(statement)?,
            other => log::debug!("Ignoring keyword '{}' at line {}", other, statement.line),
        }
        Ok(())
    }

    fn material(&self, line: usize) -> Result<MaterialId, LoadError> {
        let name = self
            .current_material
            .as_deref()
            .ok_or(LoadError::NoActiveMaterial(line))?;
        Ok(self.builder.material_id(name)?)
    }

    /// Fan-triangulate a face around its first vertex.
    fn add_face(&mut self, statement: &Statement<'_>) -> Result<(), LoadError> {
        let corners = statement.face_vertices()?;
        if corners.len() < 3 {
            log::warn!(
                "Skipping face with {} vertices at line {}",
                corners.len(),
                statement.line
            );
            return Ok(());
        }
        let material = self.material(statement.line)?;

        for j in 2..corners.len() {
            let fan = [corners[0], corners[j - 1], corners[j]];
            let object = Object::new(
                material,
                self.triangle(&fan, |c| c.vertex, &self.vertices, statement.line)?,
                self.triangle(&fan, |c| c.texture, &self.texture_coords, statement.line)?,
                self.triangle(&fan, |c| c.normal, &self.normals, statement.line)?,
            );
            self.builder.add_object(object)?;
        }
        Ok(())
    }

    fn triangle(
        &self,
        fan: &[FaceVertex; 3],
        component: impl Fn(&FaceVertex) -> i64,
        items: &[Vec3],
        line: usize,
    ) -> Result<Triangle, ParseError> {
        Ok(Triangle::new(
            resolve_index(component(&fan[0]), items, line)?,
            resolve_index(component(&fan[1]), items, line)?,
            resolve_index(component(&fan[2]), items, line)?,
        ))
    }
}
