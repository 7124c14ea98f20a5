//! Stroke rasterization.
//!
//! A segment is painted as a capsule: every pixel whose center lies within
//! `width / 2` of the segment gets the stroke color. Consecutive capsules
//! share their end discs, which gives round caps and round joins for free.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// A position in raster space, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
#[inline]
pub fn dist_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };

    let dx = p.x - (a.x + t * abx);
    let dy = p.y - (a.y + t * aby);
    dx * dx + dy * dy
}

/// Paint the segment `from`-`to` with the given width and color.
///
/// Pixels outside the raster are clipped.
pub fn stamp_segment(raster: &mut RgbaImage, from: Point, to: Point, width: u32, color: Rgba<u8>) {
    let (w, h) = raster.dimensions();
    if w == 0 || h == 0 || width == 0 {
        return;
    }

    let radius = width as f32 / 2.0;
    let radius_sq = radius * radius;

    // Bounding box of the capsule, clamped to the raster
    let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as i64;
    let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as i64;
    let max_x = ((from.x.max(to.x) + radius).ceil() as i64).min(w as i64 - 1);
    let max_y = ((from.y.max(to.y) + radius).ceil() as i64).min(h as i64 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if dist_sq_to_segment(center, from, to) <= radius_sq {
                raster.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
