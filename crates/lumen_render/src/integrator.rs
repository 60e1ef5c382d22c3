//! Recursive radiance estimator.
//!
//! Diffuse bounces draw one direction from an equal mixture of light
//! sampling and the material's own density, then weight the recursive
//! estimate by `scattering_pdf / mixture_pdf`. Specular bounces follow their
//! continuation ray unweighted.

use crate::material::Scatter;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::scene::Scene;
use crate::Color;
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Hits closer than this are treated as self-intersections.
pub const MIN_HIT_DISTANCE: f32 = 0.001;

/// Estimate the radiance arriving along `ray`.
///
/// `depth` is the number of bounces still allowed; zero returns black.
pub fn radiance(ray: &Ray, depth: u32, scene: &Scene, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene
        .world
        .hit(ray, Interval::new(MIN_HIT_DISTANCE, f32::INFINITY))
    else {
        return scene.background.color(ray);
    };

    let emitted = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    let surface_pdf = match srec.scatter {
        Scatter::Specular(continuation) => {
            return emitted + srec.attenuation * radiance(&continuation, depth - 1, scene, rng);
        }
        Scatter::Pdf(pdf) => pdf,
    };

    let light_pdf = HittablePdf::new(scene.lights.as_ref(), rec.p);
    let mixture = MixturePdf::new(&light_pdf, surface_pdf.as_ref());

    let scattered = Ray::at_time(rec.p, mixture.generate(rng), ray.time());
    let pdf_value = mixture.value(scattered.direction());
    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

    let incoming = radiance(&scattered, depth - 1, scene, rng);
    emitted + srec.attenuation * scattering_pdf * incoming / pdf_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::CosinePdf;
    use crate::scene::Background;
    use crate::{DiffuseLight, HittableList, Lambertian, Quad, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    const BACKGROUND: Color = Color::new(0.1, 0.2, 0.3);

    fn emitter_only_scene() -> Scene {
        let light = Arc::new(Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(DiffuseLight::from_color(Color::new(4.0, 3.0, 2.0))),
        ));
        Scene::new(light.clone(), light, Background::Solid(BACKGROUND))
    }

    /// A gray sphere under a large quad light facing down.
    fn lit_sphere_scene() -> Scene {
        let light = Arc::new(Quad::new(
            Vec3::new(-2.0, 2.5, -2.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Arc::new(DiffuseLight::from_color(Color::splat(3.0))),
        ));
        let sphere = Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::from_color(Color::splat(0.5))),
        ));

        let mut world = HittableList::new();
        world.add(sphere);
        world.add(light.clone());
        Scene::with_bvh(&world, light, Background::Solid(Color::ZERO))
    }

    enum Strategy {
        Light,
        Surface,
    }

    /// One bounce sampled with a single strategy, then the full estimator below it.
    fn single_strategy(
        strategy: &Strategy,
        ray: &Ray,
        depth: u32,
        scene: &Scene,
        rng: &mut dyn RngCore,
    ) -> Color {
        let rec = scene
            .world
            .hit(ray, Interval::new(MIN_HIT_DISTANCE, f32::INFINITY))
            .unwrap();
        let srec = rec.material.scatter(ray, &rec, rng).unwrap();

        let light_pdf = HittablePdf::new(scene.lights.as_ref(), rec.p);
        let surface_pdf = CosinePdf::new(rec.normal);
        let pdf: &dyn Pdf = match strategy {
            Strategy::Light => &light_pdf,
            Strategy::Surface => &surface_pdf,
        };

        let scattered = Ray::new(rec.p, pdf.generate(rng));
        let pdf_value = pdf.value(scattered.direction());
        if pdf_value <= 0.0 {
            return Color::ZERO;
        }
        let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

        srec.attenuation * scattering_pdf * radiance(&scattered, depth - 1, scene, rng) / pdf_value
    }

    fn mean(samples: usize, mut estimate: impl FnMut() -> Color) -> Color {
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            sum += estimate();
        }
        sum / samples as f32
    }

    fn assert_close(actual: Color, expected: Color, rel: f32) {
        for axis in 0..3 {
            let (a, e) = (actual[axis], expected[axis]);
            assert!(((a - e) / e).abs() < rel, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn test_zero_depth_is_black() {
        let scene = emitter_only_scene();
        let mut rng = StdRng::seed_from_u64(1);

        for d in [Vec3::new(0.0, 0.0, -1.0), Vec3::Y, Vec3::new(0.3, -0.2, 1.0)] {
            let ray = Ray::new(Vec3::ZERO, d);
            assert_eq!(radiance(&ray, 0, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_emitter_only_scene() {
        let scene = emitter_only_scene();
        let mut rng = StdRng::seed_from_u64(2);

        let toward = Ray::new(Vec3::ZERO, Vec3::new(0.1, 0.2, -1.0));
        assert_eq!(radiance(&toward, 50, &scene, &mut rng), Color::new(4.0, 3.0, 2.0));

        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(radiance(&away, 50, &scene, &mut rng), BACKGROUND);

        // The back of a one-sided light is dark, not background
        let behind = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_eq!(radiance(&behind, 50, &scene, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_mirror_shows_background() {
        use crate::Metal;

        let mirror = Arc::new(Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(Metal::new(Color::splat(0.5), 0.0)),
        ));
        let lights = Arc::new(HittableList::new());
        let scene = Scene::new(mirror, lights, Background::Solid(BACKGROUND));

        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = radiance(&ray, 5, &scene, &mut rng);
        assert!((color - 0.5 * BACKGROUND).length() < 1e-6);
    }

    #[test]
    fn test_mixture_agrees_with_single_strategies() {
        let scene = lit_sphere_scene();
        // Straight down onto the top of the sphere, from under the light
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), -Vec3::Y);
        let depth = 5;
        let samples = 100_000;

        let mut rng = StdRng::seed_from_u64(7);
        let mixture = mean(samples, || radiance(&ray, depth, &scene, &mut rng));

        let mut rng = StdRng::seed_from_u64(8);
        let light_only = mean(samples, || {
            single_strategy(&Strategy::Light, &ray, depth, &scene, &mut rng)
        });

        let mut rng = StdRng::seed_from_u64(9);
        let surface_only = mean(samples, || {
            single_strategy(&Strategy::Surface, &ray, depth, &scene, &mut rng)
        });

        assert!(mixture.x > 0.1, "sphere top should be lit, got {mixture:?}");
        assert_close(mixture, light_only, 0.02);
        assert_close(mixture, surface_only, 0.02);
    }
}
