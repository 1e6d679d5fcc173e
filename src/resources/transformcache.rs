//! Transform cache.
//!
//! Produces the scaled, mirrored and rotated variant of a source image and
//! memoizes it by [`TransformKey`]. The pipeline is a pure function of the
//! key, so a cached entry is always pixel-identical to a fresh computation.
//!
//! Pipeline order:
//! 1. resize to `(floor(w * scale), floor(h * scale))` with a smooth filter
//! 2. mirror about the vertical center axis
//! 3. rotate about the scaled image's center; the result grows to the
//!    rotated bounding box
//!
//! The key space in practice is one image per part, a handful of angles, one
//! or two scales and two mirror states. The cache is still bounded by a
//! configurable capacity; the oldest entry is evicted first.

use bevy_ecs::prelude::Resource;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::geometry::{Size, normalize_degrees};
use crate::render::raster::sample_bilinear;
use crate::resources::imagestore::SourceImage;

/// Identity of a cached variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformKey {
    image: u64,
    scale_bits: u32,
    rotation_bits: u32,
    mirrored: bool,
}

impl TransformKey {
    pub fn new(image: &SourceImage, scale: f32, rotation: f32, mirrored: bool) -> Self {
        // adding 0.0 folds -0.0 into 0.0
        let rotation = normalize_degrees(rotation) + 0.0;
        Self {
            image: image.id(),
            scale_bits: (scale + 0.0).to_bits(),
            rotation_bits: rotation.to_bits(),
            mirrored,
        }
    }

    pub fn rotation(&self) -> f32 {
        f32::from_bits(self.rotation_bits)
    }

    pub fn scale(&self) -> f32 {
        f32::from_bits(self.scale_bits)
    }
}

/// Scale an image, truncating the target size and never going below 1x1.
pub fn scale_image(src: &RgbaImage, scale: f32) -> RgbaImage {
    if (scale - 1.0).abs() < f32::EPSILON {
        return src.clone();
    }
    let target = Size::of_image(src).scaled(scale);
    imageops::resize(
        src,
        target.w.max(1) as u32,
        target.h.max(1) as u32,
        FilterType::Triangle,
    )
}

/// Rotate clockwise by `degrees` about the image center.
///
/// Right angles are exact pixel permutations; other angles are resampled
/// bilinearly into the rotated bounding box.
pub fn rotate_image(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let degrees = normalize_degrees(degrees);
    if degrees == 0.0 {
        return src.clone();
    }
    if degrees == 90.0 {
        return imageops::rotate90(src);
    }
    if degrees == 180.0 {
        return imageops::rotate180(src);
    }
    if degrees == 270.0 {
        return imageops::rotate270(src);
    }

    let (w, h) = (src.width() as f32, src.height() as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let out_w = (w * cos.abs() + h * sin.abs()).ceil().max(1.0);
    let out_h = (w * sin.abs() + h * cos.abs()).ceil().max(1.0);
    let (src_cx, src_cy) = (w / 2.0, h / 2.0);
    let (dst_cx, dst_cy) = (out_w / 2.0, out_h / 2.0);

    RgbaImage::from_fn(out_w as u32, out_h as u32, |x, y| {
        // inverse-rotate the destination pixel center into source space
        let dx = x as f32 + 0.5 - dst_cx;
        let dy = y as f32 + 0.5 - dst_cy;
        let sx = dx * cos + dy * sin + src_cx;
        let sy = -dx * sin + dy * cos + src_cy;
        sample_bilinear(src, sx - 0.5, sy - 0.5)
    })
}

/// The full uncached pipeline: scale, then mirror, then rotate.
pub fn transform_image(src: &RgbaImage, scale: f32, rotation: f32, mirrored: bool) -> RgbaImage {
    let mut img = scale_image(src, scale);
    if mirrored {
        imageops::flip_horizontal_in_place(&mut img);
    }
    rotate_image(&img, rotation)
}

#[derive(Resource, Debug)]
pub struct TransformCache {
    entries: FxHashMap<TransformKey, Arc<RgbaImage>>,
    order: VecDeque<TransformKey>,
    capacity: usize,
    hits: u64,
    pipeline_runs: u64,
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl TransformCache {
    /// A cache holding at most `capacity` variants; 0 means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            pipeline_runs: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self::with_capacity(0)
    }

    /// Transformed variant of `image`, computed on first request.
    pub fn resolve(
        &mut self,
        image: &SourceImage,
        scale: f32,
        rotation: f32,
        mirrored: bool,
    ) -> Arc<RgbaImage> {
        let key = TransformKey::new(image, scale, rotation, mirrored);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            trace!("transform cache hit {:?}", key);
            return Arc::clone(hit);
        }

        let transformed = Arc::new(transform_image(
            image.pixels(),
            key.scale(),
            key.rotation(),
            mirrored,
        ));
        self.pipeline_runs += 1;
        debug!(
            "transform cache miss: image {} scale {} rotation {} mirrored {} -> {}x{}",
            image.id(),
            key.scale(),
            key.rotation(),
            mirrored,
            transformed.width(),
            transformed.height()
        );

        if self.capacity > 0 && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, Arc::clone(&transformed));
        self.order.push_back(key);
        transformed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &TransformKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Requests answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Times the scale/mirror/rotate pipeline actually ran.
    pub fn pipeline_runs(&self) -> u64 {
        self.pipeline_runs
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
