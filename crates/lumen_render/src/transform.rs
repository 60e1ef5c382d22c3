//! Instance wrappers that move or rotate a shared hittable.
//!
//! Rather than transforming geometry, incoming rays are mapped into the
//! wrapped object's frame and hit results are mapped back out.

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An object shifted by `offset`.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box() + offset;
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let offset_ray = Ray::at_time(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.sample_direction(origin - self.offset, rng)
    }
}

/// An object rotated about the Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees (counter-clockwise looking down -Y).
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let (sin_theta, cos_theta) = angle.to_radians().sin_cos();

        let mut rotated = Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::EMPTY,
        };

        let (min, max) = rotated.object.bounding_box().corners().iter().fold(
            (Vec3::INFINITY, Vec3::NEG_INFINITY),
            |(min, max), &corner| {
                let world = rotated.to_world(corner);
                (min.min(world), max.max(world))
            },
        );
        rotated.bbox = Aabb::from_points(min, max);
        rotated
    }

    /// World space to the wrapped object's frame (inverse rotation).
    #[inline]
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// The wrapped object's frame to world space (forward rotation).
    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let rotated_ray = Ray::at_time(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated_ray, ray_t)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.to_object(origin), self.to_object(direction))
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.sample_direction(self.to_object(origin), rng))
    }
}
