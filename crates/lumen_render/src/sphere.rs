//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::{cone_cos_theta_max, random_to_sphere, random_unit_vector};
use crate::Material;
use lumen_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Uniform density over the cone of directions subtended by the sphere.
    ///
    /// From inside, every direction reaches the sphere and the density is
    /// uniform over the full sphere of directions.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let distance_squared = (self.center - origin).length_squared();
        if distance_squared <= self.radius * self.radius {
            return 1.0 / (4.0 * PI);
        }

        let ray = Ray::new(origin, direction);
        if self.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }

        let cos_theta_max = cone_cos_theta_max(self.radius, distance_squared);
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return random_unit_vector(rng);
        }

        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(rng, self.radius, distance_squared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere_at(center: Vec3) -> Sphere {
        Sphere::new(center, 1.0, Arc::new(Lambertian::from_color(Color::splat(0.5))))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::from_color(Color::splat(0.5))),
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!((rec.p - Vec3::new(0.0, 0.0, -0.5)).length() < 0.001);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_outside_ray_through_center_has_two_positive_roots() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let first = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        let second = sphere
            .hit(&ray, Interval::new(first.t + 1e-3, f32::INFINITY))
            .unwrap();

        assert!((first.t - 4.0).abs() < 1e-4);
        assert!((second.t - 6.0).abs() < 1e-4);
        assert!(first.front_face);
        assert!(!second.front_face);
    }

    #[test]
    fn test_inside_ray_has_one_positive_root() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.2, 0.0, 0.0), Vec3::X);

        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.8).abs() < 1e-4);
        assert!(sphere
            .hit(&ray, Interval::new(rec.t + 1e-3, f32::INFINITY))
            .is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v) = Sphere::sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-5);

        let (u, _) = Sphere::sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_pdf_value_matches_solid_angle() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -2.0));

        // cos θmax = sqrt(1 - 1/4)
        let cos_max = (0.75f32).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_max));

        let pdf = sphere.pdf_value(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!((pdf - expected).abs() / expected < 1e-4);

        // Directions that miss have zero density
        assert_eq!(sphere.pdf_value(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_sampled_directions_hit_sphere() {
        let sphere = unit_sphere_at(Vec3::new(3.0, 1.0, -2.0));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..500 {
            let d = sphere.sample_direction(Vec3::ZERO, &mut rng);
            // Pull the direction slightly toward the center to stay clear of the silhouette
            let toward = (d.normalize() * 0.999 + sphere.center().normalize() * 0.001).normalize();
            assert!(sphere.pdf_value(Vec3::ZERO, toward) > 0.0);
        }
    }
}
