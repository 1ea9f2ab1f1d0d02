//! Default avatar: a grey head-and-shoulders silhouette on a light disc.

use std::io::Cursor;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

pub const DEFAULT_SIZE: u32 = 128;

const BACKGROUND: Rgba<u8> = Rgba([0xe6, 0xe6, 0xe6, 0xff]);
const SILHOUETTE: Rgba<u8> = Rgba([0x9b, 0x9b, 0x9b, 0xff]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Geometry as fractions of the image size.
const HEAD_CENTER_Y: f64 = 0.34;
const HEAD_RADIUS: f64 = 0.14;
const SHOULDER_LEFT: f64 = 0.22;
const SHOULDER_RIGHT: f64 = 0.78;
const SHOULDER_TOP: f64 = 0.58;
const SHOULDER_BOTTOM: f64 = 0.86;
const SHOULDER_THICKNESS: f64 = 0.06;

pub fn render(size: u32) -> RgbaImage {
    let s = size as f64;
    RgbaImage::from_fn(size, size, |x, y| {
        // Sample at pixel centres.
        let px = x as f64 + 0.5;
        let py = y as f64 + 0.5;
        if !in_circle(px, py, s / 2.0, s / 2.0, s / 2.0) {
            TRANSPARENT
        } else if in_circle(px, py, s / 2.0, s * HEAD_CENTER_Y, s * HEAD_RADIUS) || in_shoulders(px, py, s) {
            SILHOUETTE
        } else {
            BACKGROUND
        }
    })
}

fn in_circle(px: f64, py: f64, cx: f64, cy: f64, r: f64) -> bool {
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= r * r
}

/// Region between two quadratic curves sharing end points at the bottom
/// corners, bulging up towards `SHOULDER_TOP`. Both control points sit at the
/// horizontal midpoint, so x is linear in the curve parameter.
fn in_shoulders(px: f64, py: f64, s: f64) -> bool {
    let left = s * SHOULDER_LEFT;
    let right = s * SHOULDER_RIGHT;
    if px < left || px > right {
        return false;
    }
    let t = (px - left) / (right - left);
    let bottom = s * SHOULDER_BOTTOM;
    let quad = |control: f64| {
        let u = 1.0 - t;
        u * u * bottom + 2.0 * u * t * control + t * t * bottom
    };
    let upper = quad(s * SHOULDER_TOP);
    let lower = quad(s * (SHOULDER_TOP + SHOULDER_THICKNESS));
    py >= upper && py <= lower
}

pub fn png(size: u32) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(render(size))
        .write_to(&mut buf, ImageOutputFormat::Png)
        .context("Failed to encode default avatar")?;
    Ok(buf.into_inner())
}

/// `data:image/png;base64,...` ready for an `<img src>`.
pub fn data_url(size: u32) -> Result<String> {
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png(size)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_are_transparent() {
        let img = render(DEFAULT_SIZE);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(DEFAULT_SIZE - 1, DEFAULT_SIZE - 1), TRANSPARENT);
    }

    #[test]
    fn test_head_and_background() {
        let img = render(DEFAULT_SIZE);
        // Head centre at (64, 43.5)
        assert_eq!(*img.get_pixel(64, 43), SILHOUETTE);
        // Between head and shoulders, off-centre
        assert_eq!(*img.get_pixel(20, 64), BACKGROUND);
    }

    #[test]
    fn test_shoulder_band() {
        let img = render(DEFAULT_SIZE);
        // At x = 64 the upper curve sits at 0.72*128 = 92.2 and the lower at 96.0
        assert_eq!(*img.get_pixel(64, 93), SILHOUETTE);
        assert_eq!(*img.get_pixel(64, 90), BACKGROUND);
        assert_eq!(*img.get_pixel(64, 100), BACKGROUND);
    }

    #[test]
    fn test_data_url_is_png() {
        let url = data_url(32).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
