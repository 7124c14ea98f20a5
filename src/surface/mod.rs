//! # Drawing Surface
//!
//! An owned RGBA raster with an optional base image underneath freehand
//! strokes.
//!
//! ## Lifecycle
//!
//! - [`DrawingSurface::set_base_image`] clears the raster and, when an image
//!   is given, returns a [`PendingLoad`]. The caller loads the image however
//!   it likes (usually asynchronously) and hands the result back through
//!   [`DrawingSurface::complete_load`]. Until then the background shows. A
//!   load that fails is simply dropped; a load for a base image that has
//!   since been replaced is ignored.
//! - [`DrawingSurface::resize`] reallocates the raster and redraws the base
//!   image stretched to the new size. Strokes drawn so far are lost.
//! - [`DrawingSurface::clear`] drops all strokes and redraws the base image.
//!
//! ## Example
//!
//! ```
//! use tiabela::surface::{DrawingSurface, PointerEvent, Point};
//!
//! let mut surface = DrawingSurface::new(200, 100);
//! surface.handle(PointerEvent::Down(Point::new(10.0, 50.0)));
//! surface.handle(PointerEvent::Move(Point::new(190.0, 50.0)));
//! surface.handle(PointerEvent::Up);
//!
//! // Default brush is #ef4444, 6px wide
//! assert_eq!(surface.pixel(100, 50).0, [0xef, 0x44, 0x44, 255]);
//! ```

pub mod fill;
pub mod input;
pub mod stroke;

pub use input::{InputEvent, PointerEvent, SurfaceRect, TouchPoint};
pub use stroke::Point;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops, imageops::FilterType};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::assets::BaseImage;
use crate::catalog::{self, BACKGROUND};
use crate::error::StudioError;

/// Drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Paint with the selected color
    #[default]
    Brush,
    /// Paint with the background color
    Eraser,
    /// Flood-fill the clicked region with the selected color
    Bucket,
}

/// Brush settings applied to the next stroke segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub color: Rgba<u8>,
    pub tool: Tool,
    /// Stroke width in pixels, always positive
    pub width: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: catalog::parse_color(catalog::DEFAULT_COLOR).unwrap_or(Rgba([0, 0, 0, 255])),
            tool: Tool::Brush,
            width: catalog::DEFAULT_LINE_WIDTH,
        }
    }
}

impl Brush {
    /// The color strokes are actually painted with.
    pub fn effective_color(&self, background: Rgba<u8>) -> Rgba<u8> {
        match self.tool {
            Tool::Eraser => background,
            Tool::Brush | Tool::Bucket => self.color,
        }
    }
}

/// Identifies one base-image assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// A base image waiting to be loaded and painted.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    token: LoadToken,
    image: BaseImage,
}

impl PendingLoad {
    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn image(&self) -> &BaseImage {
        &self.image
    }
}

/// Ephemeral state of one pointer-down-to-pointer-up gesture.
#[derive(Debug, Clone, Copy)]
struct StrokeSession {
    last: Point,
}

/// Owned raster with a base image and freehand strokes.
pub struct DrawingSurface {
    raster: RgbaImage,
    background: Rgba<u8>,
    brush: Brush,
    base_image: Option<BaseImage>,
    /// Decoded base image, once its load has completed
    decoded: Option<DynamicImage>,
    /// Bumped on every base-image change
    epoch: u64,
    stroke: Option<StrokeSession>,
}

impl DrawingSurface {
    /// Create a surface filled with the background color.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RgbaImage::from_pixel(width, height, BACKGROUND),
            background: BACKGROUND,
            brush: Brush::default(),
            base_image: None,
            decoded: None,
            epoch: 0,
            stroke: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like `RgbaImage`.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.raster.get_pixel(x, y)
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn base_image(&self) -> Option<&BaseImage> {
        self.base_image.as_ref()
    }

    /// True once the current base image has been painted.
    pub fn is_base_loaded(&self) -> bool {
        self.decoded.is_some()
    }

    /// True while a stroke gesture is in progress.
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Replace the base image.
    ///
    /// Setting the same reference again is a no-op. Otherwise the raster is
    /// reset to the background and, if an image is given, a load request is
    /// returned for the caller to resolve.
    pub fn set_base_image(&mut self, image: Option<BaseImage>) -> Option<PendingLoad> {
        if image == self.base_image {
            return None;
        }

        self.epoch += 1;
        self.base_image = image;
        self.decoded = None;
        self.stroke = None;
        self.redraw();

        self.base_image.clone().map(|image| PendingLoad {
            token: LoadToken(self.epoch),
            image,
        })
    }

    /// Paint a loaded base image, stretched to the raster.
    ///
    /// Returns false (and changes nothing) if the token belongs to a base
    /// image that is no longer current.
    pub fn complete_load(&mut self, token: LoadToken, image: DynamicImage) -> bool {
        if token.0 != self.epoch || self.base_image.is_none() {
            return false;
        }
        self.decoded = Some(image);
        self.redraw();
        true
    }

    /// Reallocate the raster at the new container size.
    ///
    /// The base image is redrawn stretched to the new dimensions; strokes are
    /// not preserved.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.raster = RgbaImage::new(width, height);
        self.stroke = None;
        self.redraw();
    }

    /// Drop all strokes, keeping the base image.
    pub fn clear(&mut self) {
        self.stroke = None;
        self.redraw();
    }

    /// Background fill plus the decoded base image, if any.
    fn redraw(&mut self) {
        for pixel in self.raster.pixels_mut() {
            *pixel = self.background;
        }

        let (width, height) = self.raster.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        if let Some(decoded) = &self.decoded {
            let stretched = imageops::resize(&decoded.to_rgba8(), width, height, FilterType::Triangle);
            for (dst, src) in self.raster.pixels_mut().zip(stretched.pixels()) {
                *dst = composite_over(*src, *dst);
            }
        }
    }

    /// Apply one normalized input event.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(p) => self.pointer_down(p),
            PointerEvent::Move(p) => self.pointer_move(p),
            PointerEvent::Up | PointerEvent::Leave => self.pointer_up(),
        }
    }

    /// Apply a raw host event; touch coordinates are normalized first.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if let Some(event) = event.normalize() {
            self.handle(event);
        }
    }

    /// Begin a stroke at `p`. With the bucket tool, fill the region instead.
    pub fn pointer_down(&mut self, p: Point) {
        if self.brush.tool == Tool::Bucket {
            self.stroke = None;
            if p.x.is_finite() && p.y.is_finite() && p.x >= 0.0 && p.y >= 0.0 {
                fill::flood_fill(
                    &mut self.raster,
                    p.x as u32,
                    p.y as u32,
                    self.brush.color,
                    fill::FILL_TOLERANCE,
                );
            }
            return;
        }
        self.stroke = Some(StrokeSession { last: p });
    }

    /// Extend the active stroke to `p` and commit the segment.
    pub fn pointer_move(&mut self, p: Point) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let color = self.brush.effective_color(self.background);
        stroke::stamp_segment(&mut self.raster, stroke.last, p, self.brush.width, color);
        stroke.last = p;
    }

    /// End the active stroke, if any.
    pub fn pointer_up(&mut self) {
        self.stroke = None;
    }

    /// Encode the current raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, StudioError> {
        encode_png(&self.raster)
    }
}

/// Encode a raster as PNG.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, StudioError> {
    let mut out = Cursor::new(Vec::new());
    raster
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| StudioError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

/// Source-over compositing onto an opaque destination.
fn composite_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => src,
        0 => dst,
        alpha => {
            let a = alpha as u32;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([0xef, 0x44, 0x44, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    fn stroke(surface: &mut DrawingSurface, from: (f32, f32), to: (f32, f32)) {
        surface.handle(PointerEvent::Down(Point::new(from.0, from.1)));
        surface.handle(PointerEvent::Move(Point::new(to.0, to.1)));
        surface.handle(PointerEvent::Up);
    }

    #[test]
    fn test_new_surface_is_background() {
        let surface = DrawingSurface::new(8, 4);
        assert_eq!((surface.width(), surface.height()), (8, 4));
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
    }

    #[test]
    fn test_move_without_down_paints_nothing() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.handle(PointerEvent::Move(Point::new(16.0, 16.0)));
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
    }

    #[test]
    fn test_down_alone_paints_nothing() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.handle(PointerEvent::Down(Point::new(16.0, 16.0)));
        assert!(surface.is_stroking());
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
    }

    #[test]
    fn test_up_without_stroke_is_noop() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.handle(PointerEvent::Up);
        surface.handle(PointerEvent::Leave);
        assert!(!surface.is_stroking());
    }

    #[test]
    fn test_leave_ends_stroke() {
        let mut surface = DrawingSurface::new(64, 64);
        surface.handle(PointerEvent::Down(Point::new(5.0, 5.0)));
        surface.handle(PointerEvent::Leave);
        surface.handle(PointerEvent::Move(Point::new(60.0, 60.0)));
        assert_eq!(surface.pixel(30, 30), BACKGROUND);
    }

    #[test]
    fn test_polyline_stroke_commits_each_segment() {
        let mut surface = DrawingSurface::new(64, 64);
        surface.handle(PointerEvent::Down(Point::new(10.0, 10.0)));
        surface.handle(PointerEvent::Move(Point::new(50.0, 10.0)));
        surface.handle(PointerEvent::Move(Point::new(50.0, 50.0)));
        assert_eq!(surface.pixel(30, 10), RED);
        assert_eq!(surface.pixel(50, 30), RED);
        // The closing edge was never drawn
        assert_eq!(surface.pixel(30, 30), BACKGROUND);
    }

    #[test]
    fn test_eraser_paints_background() {
        let mut surface = DrawingSurface::new(64, 64);
        stroke(&mut surface, (0.0, 32.0), (64.0, 32.0));
        assert_eq!(surface.pixel(20, 32), RED);

        surface.set_brush(Brush {
            tool: Tool::Eraser,
            ..surface.brush()
        });
        stroke(&mut surface, (0.0, 32.0), (64.0, 32.0));
        assert_eq!(surface.pixel(20, 32), BACKGROUND);
    }

    #[test]
    fn test_bucket_fills_region() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.set_brush(Brush {
            color: BLUE,
            tool: Tool::Bucket,
            width: 6,
        });
        surface.handle(PointerEvent::Down(Point::new(3.0, 3.0)));
        assert!(!surface.is_stroking());
        assert!(surface.raster().pixels().all(|p| p == &BLUE));
    }

    #[test]
    fn test_bucket_ignores_non_finite_seed() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.set_brush(Brush {
            color: BLUE,
            tool: Tool::Bucket,
            width: 6,
        });
        surface.handle(PointerEvent::Down(Point::new(f32::NAN, 3.0)));
        surface.handle_input(&InputEvent::PointerDown { x: f32::NAN, y: f32::NAN });
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
    }

    #[test]
    fn test_base_image_waits_for_load() {
        let mut surface = DrawingSurface::new(40, 20);
        let pending = surface
            .set_base_image(Some(BaseImage::url("https://example.com/a.png")))
            .unwrap();
        assert!(!surface.is_base_loaded());
        assert_eq!(surface.pixel(10, 10), BACKGROUND);

        assert!(surface.complete_load(pending.token(), solid(4, 4, BLUE)));
        assert!(surface.is_base_loaded());
        assert!(surface.raster().pixels().all(|p| p == &BLUE));
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut surface = DrawingSurface::new(40, 20);
        let first = surface
            .set_base_image(Some(BaseImage::url("https://example.com/a.png")))
            .unwrap();
        let second = surface
            .set_base_image(Some(BaseImage::url("https://example.com/b.png")))
            .unwrap();

        assert!(!surface.complete_load(first.token(), solid(4, 4, BLUE)));
        assert_eq!(surface.pixel(0, 0), BACKGROUND);
        assert!(surface.complete_load(second.token(), solid(4, 4, RED)));
        assert_eq!(surface.pixel(0, 0), RED);
    }

    #[test]
    fn test_same_base_image_is_noop() {
        let mut surface = DrawingSurface::new(16, 16);
        let image = BaseImage::url("https://example.com/a.png");
        let pending = surface.set_base_image(Some(image.clone())).unwrap();
        surface.complete_load(pending.token(), solid(2, 2, BLUE));
        assert!(surface.set_base_image(Some(image)).is_none());
        assert!(surface.is_base_loaded());
    }

    #[test]
    fn test_removing_base_image_shows_background() {
        let mut surface = DrawingSurface::new(16, 16);
        let pending = surface
            .set_base_image(Some(BaseImage::url("https://example.com/a.png")))
            .unwrap();
        surface.complete_load(pending.token(), solid(2, 2, BLUE));
        assert!(surface.set_base_image(None).is_none());
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
        assert!(!surface.complete_load(pending.token(), solid(2, 2, BLUE)));
    }

    #[test]
    fn test_transparent_base_image_composites_over_background() {
        let mut surface = DrawingSurface::new(8, 8);
        let pending = surface
            .set_base_image(Some(BaseImage::url("https://example.com/t.png")))
            .unwrap();
        surface.complete_load(pending.token(), solid(2, 2, Rgba([0, 0, 0, 0])));
        assert!(surface.raster().pixels().all(|p| p == &BACKGROUND));
    }

    #[test]
    fn test_to_png_decodes_back() {
        let mut surface = DrawingSurface::new(24, 12);
        stroke(&mut surface, (0.0, 6.0), (24.0, 6.0));
        let png = surface.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (24, 12));
        assert_eq!(decoded.get_pixel(12, 6), &RED);
    }

    #[test]
    fn test_zero_sized_surface() {
        let mut surface = DrawingSurface::new(0, 0);
        let pending = surface
            .set_base_image(Some(BaseImage::url("https://example.com/a.png")))
            .unwrap();
        assert!(surface.complete_load(pending.token(), solid(2, 2, BLUE)));
        stroke(&mut surface, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(surface.raster().len(), 0);
    }
}
