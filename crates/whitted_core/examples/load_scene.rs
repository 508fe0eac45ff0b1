//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example load_scene -- scenes/spheres/scene.obj

use std::env;

use whitted_core::obj::load_scene;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example load_scene -- scenes/spheres/scene.obj");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name());
            println!("Triangles: {}", scene.objects().len());
            println!("Spheres: {}", scene.sphere_objects().len());
            println!("Lights: {}", scene.lights().len());

            println!("\n--- Materials ---");
            for (i, material) in scene.materials().iter().enumerate() {
                println!(
                    "  [{}] {} - albedo {:?}, Ni {:.2}, Ns {:.1}",
                    i,
                    material.name,
                    material.albedo,
                    material.refraction_index,
                    material.specular_exponent
                );
            }

            println!("\n--- Lights ---");
            for (i, light) in scene.lights().iter().enumerate() {
                let p = light.position;
                let c = light.intensity;
                println!(
                    "  [{}] at ({:.2}, {:.2}, {:.2}) intensity ({:.2}, {:.2}, {:.2})",
                    i, p.x, p.y, p.z, c.x, c.y, c.z
                );
            }

            let smooth = scene.objects().iter().filter(|o| o.has_normals()).count();
            println!("\nTriangles with authored normals: {}", smooth);
        }
        Err(e) => {
            eprintln!("Error loading scene file: {}", e);
        }
    }
}
