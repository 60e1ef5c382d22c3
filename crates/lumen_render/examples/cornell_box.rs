//! Cornell box render with a glass sphere and a rotated box.
//!
//! Run with: cargo run --release --example cornell_box -- [output.png] [config.json]
//!
//! The optional config is a `RenderConfig` in JSON, e.g.
//! `{"samples_per_pixel": 200, "max_depth": 50, "seed": 7}`.

use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_render::{
    cuboid, render, Background, Camera, Color, Dielectric, DiffuseLight, Hittable, HittableList,
    Lambertian, Material, Quad, RenderConfig, RotateY, Scene, Sphere, Translate, Vec3,
};

fn build_scene() -> Scene {
    let red: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.12, 0.45, 0.15)));
    let light_material: Arc<dyn Material> =
        Arc::new(DiffuseLight::from_color(Color::splat(15.0)));

    let mut world = HittableList::new();

    // Walls
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    // Ceiling light, facing down
    let light: Arc<dyn Hittable> = Arc::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light_material,
    ));
    world.add(light.clone());

    // Tall box
    let tall_box: Arc<dyn Hittable> = Arc::new(cuboid(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white,
    ));
    let tall_box = Arc::new(RotateY::new(tall_box, 15.0));
    world.add(Arc::new(Translate::new(tall_box, Vec3::new(265.0, 0.0, 295.0))));

    // Glass sphere
    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(glass);

    Scene::with_bvh(&world, light, Background::Solid(Color::ZERO))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let output = args.get(1).map(String::as_str).unwrap_or("cornell_box.png");

    let config = match args.get(2) {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read render config {}", path))?;
            RenderConfig::from_json(&json)?
        }
        None => RenderConfig::default(),
    };

    let scene = build_scene();

    let mut camera = Camera::new()
        .with_resolution(600, 600)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0), // look_from
            Vec3::new(278.0, 278.0, 0.0),    // look_at
            Vec3::Y,                         // vup
        )
        .with_fov(40.0);
    camera.initialize();

    let image = render(&camera, &scene, &config)?;

    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Pixel buffer does not match image dimensions")?;
    rgba.save(output)
        .with_context(|| format!("Failed to write {}", output))?;

    log::info!("Saved to {}", output);
    Ok(())
}
