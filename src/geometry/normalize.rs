use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::animation::model::{Frame, Pixels};
use crate::foundation::error::{GifSquareError, GifSquareResult};

/// Default maximum side of an output frame.
pub const DEFAULT_MAX_DIM: u32 = 1024;

/// Pad every frame to a square anchored at the origin, then downscale anything larger than
/// `max_dim` to exactly `max_dim x max_dim` with Lanczos-3.
///
/// Frames that are already square and within bounds keep their pixel representation. Every
/// frame's origin is reset to `(0, 0)`.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn normalize_geometry(frames: &mut [Frame], max_dim: u32) -> GifSquareResult<()> {
    if max_dim == 0 {
        return Err(GifSquareError::validation("max dimension must be > 0"));
    }

    for frame in frames.iter_mut() {
        if !frame.is_square() {
            let side = frame.width().max(frame.height());
            let padded = pad_to_square(&frame.to_rgba(), side);
            frame.set_pixels(Pixels::Explicit(padded));
        }

        let side = frame.width();
        if side > max_dim {
            tracing::debug!(from = side, to = max_dim, "downscaling frame");
            let resized = downscale(&frame.to_rgba(), max_dim);
            frame.set_pixels(Pixels::Explicit(resized));
        }

        frame.x = 0;
        frame.y = 0;
    }
    Ok(())
}

/// Copy `src` onto a transparent `side x side` canvas with its top-left corner at `(0, 0)`.
///
/// The copy overwrites destination pixels. The canvas is fully transparent, so drawing the
/// source over it yields the source pixels unchanged and no blending is performed.
pub fn pad_to_square(src: &RgbaImage, side: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(side, side);
    imageops::replace(&mut canvas, src, 0, 0);
    canvas
}

/// Resample a square image to exactly `side x side` with a Lanczos-3 filter.
///
/// Filtering runs on premultiplied alpha so transparent neighbours do not darken edge colors.
pub fn downscale(src: &RgbaImage, side: u32) -> RgbaImage {
    let mut premul = src.clone();
    premultiply_rgba8_in_place(&mut premul);
    let mut out = imageops::resize(&premul, side, side, FilterType::Lanczos3);
    unpremultiply_rgba8_in_place(&mut out);
    out
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        // Lanczos ringing can push a channel above alpha.
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/normalize.rs"]
mod tests;
