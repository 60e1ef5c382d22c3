//! Lumen - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering.
//!
//! Scenes are built from shared [`Hittable`] handles (spheres, quads, boxes,
//! instance transforms) and accelerated with a [`BvhNode`]. The
//! [`radiance`] estimator combines material sampling with explicit light
//! sampling through an equal-weight [`MixturePdf`].

mod bvh;
mod camera;
mod hittable;
mod integrator;
mod material;
mod pdf;
mod quad;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;
mod transform;

/// Linear RGB color.
pub type Color = Vec3;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{radiance, MIN_HIT_DISTANCE};
pub use material::{
    reflect, refract, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, Scatter,
    ScatterRecord,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use quad::{cuboid, Quad};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_pixel, ConfigError, ImageBuffer, RenderConfig,
};
pub use sampling::{gen_f32, gen_range_f32};
pub use scene::{Background, Scene};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture, TextureError, TextureResult};
pub use transform::{RotateY, Translate};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Onb, Ray, Vec3};
