//! Shared source images.
//!
//! Decoded images are wrapped in [`SourceImage`]: an immutable,
//! reference-counted RGBA buffer with a process-unique id. Visual parts and
//! transform cache entries share the buffer instead of copying pixels; the
//! id is the image's identity in cache keys.
//!
//! [`TrainAssets`] carves the head, body and tail out of one sprite sheet.
//! Every failure here is fatal for construction: the engine is never built
//! from a partially loaded set of images.

use image::RgbaImage;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::geometry::{Rect, Size};
use crate::resources::petconfig::CropRects;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Errors raised while building the engine's images.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The image file is missing or could not be decoded.
    #[error("Failed to load image {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },
    /// A crop rectangle is empty or leaves the image bounds.
    #[error(
        "Crop rectangle ({}, {}, {}x{}) lies outside the {}x{} image",
        .rect.x, .rect.y, .rect.w, .rect.h, .image.w, .image.h
    )]
    CropOutOfBounds { rect: Rect, image: Size },
}

/// Immutable shared image with a stable identity.
#[derive(Clone, Debug)]
pub struct SourceImage {
    id: u64,
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            pixels: Arc::new(pixels),
        }
    }

    /// Identity used by the transform cache. Clones share it.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn size(&self) -> Size {
        Size::of_image(self.pixels.as_ref())
    }

    /// Decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| AssetError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let image = Self::new(img.to_rgba8());
        info!(
            "Loaded {} ({}x{})",
            path.display(),
            image.size().w,
            image.size().h
        );
        Ok(image)
    }

    /// Copy a sub-rectangle into a new source image.
    pub fn crop(&self, rect: Rect) -> Result<SourceImage, AssetError> {
        if !rect.fits_within(self.size()) {
            return Err(AssetError::CropOutOfBounds {
                rect,
                image: self.size(),
            });
        }
        let view = image::imageops::crop_imm(
            self.pixels.as_ref(),
            rect.x as u32,
            rect.y as u32,
            rect.w as u32,
            rect.h as u32,
        );
        Ok(Self::new(view.to_image()))
    }
}

/// Head, body and tail images cut from one sheet.
#[derive(Clone, Debug)]
pub struct TrainAssets {
    pub head: SourceImage,
    pub body: SourceImage,
    pub tail: SourceImage,
}

impl TrainAssets {
    pub fn from_sheet(sheet: &SourceImage, crops: &CropRects) -> Result<Self, AssetError> {
        let assets = Self {
            head: sheet.crop(crops.head)?,
            body: sheet.crop(crops.body)?,
            tail: sheet.crop(crops.tail)?,
        };
        debug!(
            "Cropped train parts: head {:?}, body {:?}, tail {:?}",
            assets.head.size(),
            assets.body.size(),
            assets.tail.size()
        );
        Ok(assets)
    }

    pub fn load(path: impl AsRef<Path>, crops: &CropRects) -> Result<Self, AssetError> {
        let sheet = SourceImage::open(path)?;
        Self::from_sheet(&sheet, crops)
    }

    /// Part images for a train: the head alone when `carriages` is zero,
    /// otherwise head, `carriages` bodies and the tail, left to right.
    pub fn parts(&self, carriages: usize) -> Vec<SourceImage> {
        if carriages == 0 {
            return vec![self.head.clone()];
        }
        let mut parts = Vec::with_capacity(carriages + 2);
        parts.push(self.head.clone());
        parts.extend(std::iter::repeat_n(self.body.clone(), carriages));
        parts.push(self.tail.clone());
        parts
    }
}
