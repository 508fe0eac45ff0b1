//! Simple Whitted render example.
//!
//! Builds a small scene in code (a glass sphere and a mirror sphere on a
//! diffuse floor, lit by two point lights) and saves it as PNG.

use std::time::Instant;

use whitted_core::{Light, Material, Object, SceneBuilder, SphereObject};
use whitted_renderer::{render, CameraOptions, RenderOptions, Sphere, Triangle, Vec3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = Instant::now();
    let scene = build_scene()?;
    log::info!(
        "Scene built in {:?}: {} primitives",
        start.elapsed(),
        scene.primitive_count()
    );

    let camera = CameraOptions::default()
        .with_resolution(640, 480)
        .with_fov(60f64.to_radians())
        .with_position(Vec3::new(0.0, 1.5, 4.0), Vec3::new(0.0, 0.5, -2.0));
    let options = RenderOptions::default().with_depth(6);

    let image = render(&scene, &camera, &options)?;
    image.save("simple_render.png")?;
    Ok(())
}

fn build_scene() -> Result<whitted_core::Scene, whitted_core::SceneError> {
    let mut builder = SceneBuilder::new("simple_render");

    let mut floor = Material::new("floor", Vec3::new(0.6, 0.6, 0.55));
    floor.ambient_color = Vec3::splat(0.02);
    let floor = builder.add_material(floor);

    let mut glass = Material::new("glass", Vec3::ZERO);
    glass.specular_color = Vec3::ONE;
    glass.specular_exponent = 125.0;
    glass.refraction_index = 1.5;
    glass.albedo = [0.0, 0.1, 0.9];
    let glass = builder.add_material(glass);

    let mut mirror = Material::new("mirror", Vec3::new(0.1, 0.1, 0.1));
    mirror.specular_color = Vec3::ONE;
    mirror.specular_exponent = 500.0;
    mirror.albedo = [0.3, 0.7, 0.0];
    let mirror = builder.add_material(mirror);

    // Floor quad as two triangles
    let corners = [
        Vec3::new(-4.0, 0.0, 2.0),
        Vec3::new(4.0, 0.0, 2.0),
        Vec3::new(4.0, 0.0, -6.0),
        Vec3::new(-4.0, 0.0, -6.0),
    ];
    builder.add_object(Object::flat(floor, Triangle::new(corners[0], corners[1], corners[2])))?;
    builder.add_object(Object::flat(floor, Triangle::new(corners[0], corners[2], corners[3])))?;

    let glass_ball = Sphere::new(Vec3::new(-0.9, 0.8, -1.5), 0.8);
    let mirror_ball = Sphere::new(Vec3::new(1.0, 1.0, -3.0), 1.0);
    builder.add_sphere_object(SphereObject::new(glass, glass_ball))?;
    builder.add_sphere_object(SphereObject::new(mirror, mirror_ball))?;

    builder.add_light(Light::new(Vec3::new(-3.0, 5.0, 3.0), Vec3::splat(0.8)));
    builder.add_light(Light::new(Vec3::new(3.0, 4.0, -1.0), Vec3::new(0.6, 0.5, 0.4)));

    Ok(builder.build())
}
