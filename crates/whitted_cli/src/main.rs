use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use whitted_core::load_scene;
use whitted_renderer::{render, CameraOptions, RenderMode, RenderOptions, Vec3};

/// Render an OBJ-style scene with a Whitted ray tracer
#[derive(Parser, Debug)]
#[command(name = "whitted", version, about)]
struct Args {
    /// Scene file (OBJ geometry with S/P extensions)
    scene: PathBuf,

    /// Output image; the format follows the extension
    output: PathBuf,

    /// What to render
    #[arg(long, value_name = "MODE")]
    mode: Option<RenderMode>,

    /// Maximum recursion depth
    #[arg(long)]
    depth: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long, value_name = "DEGREES")]
    fov: Option<f64>,

    /// Camera position as x,y,z
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
    look_from: Option<Vec3>,

    /// Camera target as x,y,z
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
    look_to: Option<Vec3>,

    /// Bucket edge length in pixels
    #[arg(long, value_name = "PIXELS")]
    bucket_size: Option<u32>,

    /// JSON file with `camera` and `render` sections; flags override it
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Settings file layout. Camera FOV is in radians here.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
struct Config {
    camera: CameraOptions,
    render: RenderOptions,
}

impl Config {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

impl Args {
    /// Layer explicit flags over `config`.
    fn apply_to(&self, mut config: Config) -> Config {
        let camera = &mut config.camera;
        if let Some(width) = self.width {
            camera.screen_width = width;
        }
        if let Some(height) = self.height {
            camera.screen_height = height;
        }
        if let Some(fov) = self.fov {
            camera.fov = fov.to_radians();
        }
        if let Some(look_from) = self.look_from {
            camera.look_from = look_from;
        }
        if let Some(look_to) = self.look_to {
            camera.look_to = look_to;
        }

        let render = &mut config.render;
        if let Some(mode) = self.mode {
            render.mode = mode;
        }
        if let Some(depth) = self.depth {
            render.depth = depth;
        }
        if let Some(bucket_size) = self.bucket_size {
            render.bucket_size = bucket_size;
        }
        config
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", s));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| format!("'{}' is not a number", part))?;
    }
    Ok(Vec3::from_array(values))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = args.apply_to(config);
    log::debug!("Camera: {:?}", config.camera);
    log::debug!("Render: {:?}", config.render);

    let start = Instant::now();
    let scene = load_scene(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;
    log::info!(
        "Scene ready in {:.2?}: {} primitives, {} lights",
        start.elapsed(),
        scene.primitive_count(),
        scene.lights().len()
    );

    let image = render(&scene, &config.camera, &config.render).context("failed to render")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3(" -1.5, 0 ,2e1").unwrap(), Vec3::new(-1.5, 0.0, 20.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,x").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["whitted", "scene.obj", "out.png"]).unwrap();
        let config = args.apply_to(Config::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "camera": { "screen_width": 100, "screen_height": 50, "look_from": [0, 1, 5] },
                "render": { "mode": "depth", "depth": 2 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.render.mode, RenderMode::Depth);

        let args = Args::try_parse_from([
            "whitted",
            "scene.obj",
            "out.png",
            "--mode",
            "normal",
            "--width",
            "320",
            "--fov",
            "90",
            "--look-to",
            "0,-1,-2",
        ])
        .unwrap();
        let config = args.apply_to(config);

        assert_eq!(config.render.mode, RenderMode::Normal);
        assert_eq!(config.render.depth, 2);
        assert_eq!(config.camera.screen_width, 320);
        assert_eq!(config.camera.screen_height, 50);
        assert!((config.camera.fov - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(config.camera.look_from, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(config.camera.look_to, Vec3::new(0.0, -1.0, -2.0));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Args::try_parse_from(["whitted", "a.obj", "b.png", "--mode", "fancy"]).is_err());
    }
}
