//! Scene types for Whitted.
//!
//! A scene is assembled through a [`SceneBuilder`] and frozen into an
//! immutable [`Scene`] before rendering. Objects reference their material
//! through a [`MaterialId`] handle into the scene's material arena, so the
//! backing storage can move without invalidating anything.

use std::collections::HashMap;

use thiserror::Error;
use whitted_math::{Sphere, Triangle, Vec3};

/// Authored normals whose components are all below this are treated as absent.
const NORMAL_SENTINEL_EPS: f64 = 1e-9;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Material handle {0} does not belong to this scene")]
    InvalidMaterialId(usize),
}

/// Result type for scene assembly.
pub type SceneResult<T> = Result<T, SceneError>;

/// A Phong-style material with weights for the diffuse, reflective and
/// refractive contributions.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (key in the material library)
    pub name: String,

    /// Ambient color, added unconditionally
    pub ambient_color: Vec3,

    /// Diffuse color (Lambert term)
    pub diffuse_color: Vec3,

    /// Specular color (Phong term)
    pub specular_color: Vec3,

    /// Emissive intensity, added unconditionally
    pub intensity: Vec3,

    /// Phong exponent
    pub specular_exponent: f64,

    /// Index of refraction relative to the outside medium
    pub refraction_index: f64,

    /// Weights for [diffuse, reflective, refractive] contributions.
    /// They scale independently and need not sum to one.
    pub albedo: [f64; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient_color: Vec3::ZERO,
            diffuse_color: Vec3::ZERO,
            specular_color: Vec3::ZERO,
            intensity: Vec3::ZERO,
            specular_exponent: 0.0,
            refraction_index: 1.0,
            albedo: [1.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// Check if this material emits light on its own.
    pub fn is_emissive(&self) -> bool {
        self.intensity.length_squared() > 0.0
    }
}

/// Stable handle to a material inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl MaterialId {
    /// Position of the material in the scene's material list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-vertex normals of a triangle object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VertexNormals {
    /// No normals were authored; shading uses the geometric face normal.
    None,
    /// Authored normals, blended with barycentric weights.
    Authored(Triangle),
}

impl VertexNormals {
    /// Classify a normal triangle coming from a loader. Three zero vectors
    /// mean the face had no normal indices.
    pub fn from_triangle(normals: Triangle) -> Self {
        if normals.is_near_zero(NORMAL_SENTINEL_EPS) {
            VertexNormals::None
        } else {
            VertexNormals::Authored(normals)
        }
    }
}

/// A triangle with its material, texture coordinates and vertex normals.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub material: MaterialId,
    pub polygon: Triangle,
    pub texture: Triangle,
    pub normals: VertexNormals,
}

impl Object {
    /// Create an object. `normal` is the raw per-vertex normal triangle;
    /// all-zero normals are recorded as [`VertexNormals::None`].
    pub fn new(
        material: MaterialId,
        polygon: Triangle,
        texture: Triangle,
        normal: Triangle,
    ) -> Self {
        Self {
            material,
            polygon,
            texture,
            normals: VertexNormals::from_triangle(normal),
        }
    }

    /// Create an object without texture coordinates or authored normals.
    pub fn flat(material: MaterialId, polygon: Triangle) -> Self {
        Self {
            material,
            polygon,
            texture: Triangle::default(),
            normals: VertexNormals::None,
        }
    }

    /// Check if the object carries authored normals.
    pub fn has_normals(&self) -> bool {
        matches!(self.normals, VertexNormals::Authored(_))
    }

    /// Normal used for shading at `position`.
    ///
    /// Authored normals are blended with the barycentric coordinates of
    /// `position`; the blend is not renormalized. Without authored normals
    /// the geometric normal from the intersection test is returned as is.
    pub fn shading_normal(&self, position: Vec3, geometric: Vec3) -> Vec3 {
        match &self.normals {
            VertexNormals::None => geometric,
            VertexNormals::Authored(normals) => {
                normals.interpolate(self.polygon.barycentric(position))
            }
        }
    }
}

/// A sphere with its material.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereObject {
    pub material: MaterialId,
    pub sphere: Sphere,
}

impl SphereObject {
    pub fn new(material: MaterialId, sphere: Sphere) -> Self {
        Self { material, sphere }
    }
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    /// Per-channel intensity, not limited to [0, 1]
    pub intensity: Vec3,
}

impl Light {
    pub fn new(position: Vec3, intensity: Vec3) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Incrementally assembles a [`Scene`].
///
/// Materials are append-only: re-adding a name updates that material in
/// place and keeps its handle.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    name: String,
    materials: Vec<Material>,
    material_index: HashMap<String, MaterialId>,
    objects: Vec<Object>,
    sphere_objects: Vec<SphereObject>,
    lights: Vec<Light>,
}

impl SceneBuilder {
    /// Create an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        if let Some(&id) = self.material_index.get(&material.name) {
            self.materials[id.0] = material;
            return id;
        }
        let id = MaterialId(self.materials.len());
        self.material_index.insert(material.name.clone(), id);
        self.materials.push(material);
        id
    }

    /// Look up a material handle by name.
    pub fn material_id(&self, name: &str) -> SceneResult<MaterialId> {
        self.material_index
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
    }

    fn check_material(&self, id: MaterialId) -> SceneResult<()> {
        if id.0 < self.materials.len() {
            Ok(())
        } else {
            Err(SceneError::InvalidMaterialId(id.0))
        }
    }

    /// Add a triangle object.
    pub fn add_object(&mut self, object: Object) -> SceneResult<()> {
        self.check_material(object.material)?;
        self.objects.push(object);
        Ok(())
    }

    /// Add a sphere object.
    pub fn add_sphere_object(&mut self, object: SphereObject) -> SceneResult<()> {
        self.check_material(object.material)?;
        self.sphere_objects.push(object);
        Ok(())
    }

    /// Add a point light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Freeze the builder into a scene.
    pub fn build(self) -> Scene {
        Scene {
            name: self.name,
            materials: self.materials,
            material_index: self.material_index,
            objects: self.objects,
            sphere_objects: self.sphere_objects,
            lights: self.lights,
        }
    }
}

/// A complete, immutable scene.
///
/// Iteration order of objects, sphere objects and lights is insertion
/// order; nearest-hit ties resolve to the first inserted primitive.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    name: String,
    materials: Vec<Material>,
    material_index: HashMap<String, MaterialId>,
    objects: Vec<Object>,
    sphere_objects: Vec<SphereObject>,
    lights: Vec<Light>,
}

impl Scene {
    /// Scene name (usually from filename).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Triangle objects in insertion order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Sphere objects in insertion order.
    pub fn sphere_objects(&self) -> &[SphereObject] {
        &self.sphere_objects
    }

    /// Point lights in insertion order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// All materials, indexed by [`MaterialId::index`].
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Resolve a material handle. Handles are validated when objects are
    /// added, so every handle stored in this scene resolves.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Look up a material by name.
    pub fn material_by_name(&self, name: &str) -> Option<&Material> {
        self.material_index.get(name).map(|&id| self.material(id))
    }

    /// Total number of ray-testable primitives.
    pub fn primitive_count(&self) -> usize {
        self.objects.len() + self.sphere_objects.len()
    }

    /// Check if the scene has nothing to hit.
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
