//! Image render driver.
//!
//! Averages radiance samples per pixel and fans image rows out over the
//! rayon thread pool. Each row gets its own generator seeded from the
//! configuration, so a render is reproducible for a given seed.

use crate::camera::Camera;
use crate::integrator::radiance;
use crate::scene::Scene;
use crate::Color;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Errors in render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("max_depth must be at least 1")]
    ZeroDepth,

    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid render config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-row generators
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0x5eed,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Sum of the finite samples for one pixel, with the number discarded.
fn sample_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> (Color, u32) {
    let mut pixel_color = Color::ZERO;
    let mut discarded = 0;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        let sample = radiance(&ray, config.max_depth, scene, rng);
        if sample.is_finite() {
            pixel_color += sample;
        } else {
            discarded += 1;
        }
    }

    let kept = config.samples_per_pixel - discarded;
    if kept == 0 {
        return (Color::ZERO, discarded);
    }
    (pixel_color / kept as f32, discarded)
}

/// Render a single pixel with multi-sampling.
///
/// Non-finite samples (a zero-density direction, for instance) are dropped
/// from the average.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    sample_pixel(camera, scene, x, y, config, rng).0
}

/// Simple image buffer of linear colors, row-major from the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }
}

/// Seed for the generator of image row `y`.
#[inline]
fn row_seed(seed: u64, y: u32) -> u64 {
    seed.wrapping_add(y as u64)
}

/// Render the entire scene to an image buffer, one rayon task per row.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;

    let (width, height) = (camera.image_width, camera.image_height);
    if width == 0 || height == 0 {
        return Err(ConfigError::EmptyImage { width, height });
    }

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    let rows: Vec<(Vec<Color>, u32)> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut rng = StdRng::seed_from_u64(row_seed(config.seed, y));
            let mut discarded = 0u32;
            let row: Vec<Color> = (0..width)
                .map(|x| {
                    let (color, dropped) = sample_pixel(camera, scene, x, y, config, &mut rng);
                    discarded += dropped;
                    color
                })
                .collect();
            (row, discarded)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    let mut discarded = 0u64;
    for (y, (row, dropped)) in rows.into_iter().enumerate() {
        let offset = y * width as usize;
        image.pixels[offset..offset + width as usize].copy_from_slice(&row);
        discarded += dropped as u64;
    }

    if discarded > 0 {
        log::warn!("Discarded {} non-finite samples", discarded);
    }
    log::info!("Render finished in {:.2?}", start.elapsed());

    Ok(image)
}
