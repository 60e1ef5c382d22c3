//! Scene description consumed by the integrator.

use crate::bvh::BvhNode;
use crate::hittable::{Hittable, HittableList};
use crate::Color;
use lumen_math::Ray;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Radiance returned for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Solid(Color),
    /// Vertical white-to-blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Everything a render needs besides the camera.
///
/// `lights` is sampled for next-event estimation and must offer a usable
/// [`Hittable::pdf_value`] / [`Hittable::sample_direction`] pair. Its objects
/// normally also appear in `world`.
#[derive(Clone)]
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub lights: Arc<dyn Hittable>,
    pub background: Background,
}

impl Scene {
    pub fn new(world: Arc<dyn Hittable>, lights: Arc<dyn Hittable>, background: Background) -> Self {
        Self {
            world,
            lights,
            background,
        }
    }

    /// Build a BVH over `objects` and use it as the world.
    pub fn with_bvh(objects: &HittableList, lights: Arc<dyn Hittable>, background: Background) -> Self {
        Self::new(Arc::new(BvhNode::new(objects)), lights, background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up should be more blue (less red than white)
        let up_color = Background::Sky.color(&Ray::new(Vec3::ZERO, Vec3::Y));

        // Ray pointing down should be white
        let down_color = Background::Sky.color(&Ray::new(Vec3::ZERO, -Vec3::Y));

        assert!(
            up_color.x < down_color.x,
            "up_color.x={} should be < down_color.x={}",
            up_color.x,
            down_color.x
        );
        assert!((up_color - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down_color - Color::ONE).length() < 1e-6);
    }

    #[test]
    fn test_solid_background_ignores_direction() {
        let background = Background::Solid(Color::new(0.1, 0.2, 0.3));
        for d in [Vec3::X, Vec3::Y, -Vec3::Z] {
            assert_eq!(background.color(&Ray::new(Vec3::ZERO, d)), Color::new(0.1, 0.2, 0.3));
        }
        assert_eq!(Background::default(), Background::Solid(Color::ZERO));
    }

    #[test]
    fn test_background_from_json() {
        let sky: Background = serde_json::from_str("\"Sky\"").unwrap();
        assert_eq!(sky, Background::Sky);

        let solid: Background = serde_json::from_str(r#"{"Solid":[0.5,0.25,1.0]}"#).unwrap();
        assert_eq!(solid, Background::Solid(Color::new(0.5, 0.25, 1.0)));
    }
}
