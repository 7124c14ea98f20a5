//! Bucket fill.

use image::{Rgba, RgbaImage};

/// Per-channel difference still treated as "the same color".
///
/// Stretched line art has soft edges; a small tolerance keeps the fill from
/// leaking through them while still covering slightly noisy interiors.
pub const FILL_TOLERANCE: u8 = 32;

fn similar(a: &Rgba<u8>, b: &Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(&x, &y)| x.abs_diff(y) <= tolerance)
}

/// Flood-fill the 4-connected region around `(x, y)` with `color`.
///
/// Scanline fill: each seed grows into a horizontal span, and only one seed
/// per run of fillable pixels is queued on the rows above and below, so the
/// work stack stays proportional to the number of spans rather than pixels.
///
/// Returns the number of pixels changed. Seeds outside the raster and
/// regions already painted in `color` are no-ops.
pub fn flood_fill(raster: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, tolerance: u8) -> usize {
    let (width, height) = raster.dimensions();
    if x >= width || y >= height {
        return 0;
    }

    let target = *raster.get_pixel(x, y);
    if target == color {
        return 0;
    }

    let index = |px: u32, py: u32| py as usize * width as usize + px as usize;
    let fillable = |raster: &RgbaImage, visited: &[bool], px: u32, py: u32| {
        !visited[index(px, py)] && similar(raster.get_pixel(px, py), &target, tolerance)
    };

    let mut visited = vec![false; width as usize * height as usize];
    let mut stack = vec![(x, y)];
    let mut filled = 0;

    while let Some((sx, sy)) = stack.pop() {
        if !fillable(raster, &visited, sx, sy) {
            continue;
        }

        let mut left = sx;
        while left > 0 && fillable(raster, &visited, left - 1, sy) {
            left -= 1;
        }
        let mut right = sx;
        while right + 1 < width && fillable(raster, &visited, right + 1, sy) {
            right += 1;
        }

        for px in left..=right {
            visited[index(px, sy)] = true;
            raster.put_pixel(px, sy, color);
        }
        filled += (right - left + 1) as usize;

        let above = sy.checked_sub(1);
        let below = (sy + 1 < height).then_some(sy + 1);
        for ny in [above, below].into_iter().flatten() {
            let mut in_run = false;
            for px in left..=right {
                if fillable(raster, &visited, px, ny) {
                    if !in_run {
                        stack.push((px, ny));
                        in_run = true;
                    }
                } else {
                    in_run = false;
                }
            }
        }
    }

    filled
}
