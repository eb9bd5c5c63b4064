use std::io::Write;

use image::RgbaImage;
use image::imageops;

use crate::animation::model::resolve_indexed;
use crate::assemble::frames::{AssembledAnimation, DisposeOp, FrameDescriptor, FrameImage};
use crate::foundation::core::{BlendMode, LoopCount, Palette};
use crate::foundation::error::{GifSquareError, GifSquareResult};

/// Encoder contract: serialize assembled frames into an output stream.
pub trait FrameSink {
    fn encode(&mut self, anim: &AssembledAnimation, out: &mut dyn Write) -> GifSquareResult<()>;
}

/// Deflate effort used for the output stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Store without compression.
    None,
    /// Fast compression.
    Fast,
    /// Balanced speed and size.
    Default,
    /// Smallest output (zlib level 9 equivalent).
    #[default]
    Best,
}

impl CompressionLevel {
    fn to_png_compression(self) -> png::Compression {
        match self {
            Self::None => png::Compression::NoCompression,
            Self::Fast => png::Compression::Fast,
            Self::Default => png::Compression::Balanced,
            Self::Best => png::Compression::High,
        }
    }
}

/// Animated PNG writer.
///
/// Frames are written as indexed color when every frame references one identical palette,
/// otherwise as RGBA8.
#[derive(Clone, Debug, Default)]
pub struct ApngSink {
    compression: CompressionLevel,
}

impl ApngSink {
    pub fn new(compression: CompressionLevel) -> Self {
        Self { compression }
    }
}

impl FrameSink for ApngSink {
    fn encode(&mut self, anim: &AssembledAnimation, out: &mut dyn Write) -> GifSquareResult<()> {
        let (canvas_w, canvas_h) = canvas_size(anim)?;
        // The first frame is the default image and has to cover the whole canvas.
        let first_covers_canvas = anim
            .frames
            .first()
            .is_some_and(|d| (d.x_offset, d.y_offset, d.width, d.height) == (0, 0, canvas_w, canvas_h));
        let palette = anim.shared_palette().filter(|_| first_covers_canvas);

        let mut encoder = png::Encoder::new(out, canvas_w, canvas_h);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(self.compression.to_png_compression());
        match palette {
            Some(p) => {
                encoder.set_color(png::ColorType::Indexed);
                let (plte, trns) = split_palette(p);
                encoder.set_palette(plte);
                encoder.set_trns(trns);
            }
            None => encoder.set_color(png::ColorType::Rgba),
        }
        encoder.set_animated(anim.frames.len() as u32, num_plays(anim.loop_count))?;

        let mut writer = encoder.write_header()?;
        for (i, d) in anim.frames.iter().enumerate() {
            let (data, width, height, x, y) = match (palette, &d.image) {
                (Some(_), FrameImage::Indexed { indices, .. }) => {
                    (indices.clone(), d.width, d.height, d.x_offset, d.y_offset)
                }
                _ if i == 0 && !first_covers_canvas => {
                    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
                    imageops::replace(
                        &mut canvas,
                        &descriptor_rgba(d),
                        i64::from(d.x_offset),
                        i64::from(d.y_offset),
                    );
                    (canvas.into_raw(), canvas_w, canvas_h, 0, 0)
                }
                _ => (
                    descriptor_rgba(d).into_raw(),
                    d.width,
                    d.height,
                    d.x_offset,
                    d.y_offset,
                ),
            };

            writer.reset_frame_position()?;
            writer.set_frame_dimension(width, height)?;
            writer.set_frame_position(x, y)?;
            writer.set_frame_delay(d.delay_num, d.delay_den)?;
            writer.set_dispose_op(dispose_op(d.dispose))?;
            writer.set_blend_op(blend_op(d.blend))?;
            writer.write_image_data(&data)?;
        }
        writer.finish()?;
        Ok(())
    }
}

/// Smallest canvas containing every frame at its offset.
fn canvas_size(anim: &AssembledAnimation) -> GifSquareResult<(u32, u32)> {
    if anim.frames.is_empty() {
        return Err(GifSquareError::encode("cannot encode an animation without frames"));
    }
    let (mut w, mut h) = (0u32, 0u32);
    for (i, d) in anim.frames.iter().enumerate() {
        let right = d.x_offset.checked_add(d.width);
        let bottom = d.y_offset.checked_add(d.height);
        let (Some(right), Some(bottom)) = (right, bottom) else {
            return Err(GifSquareError::encode(format!(
                "frame {i} extent overflows the canvas"
            )));
        };
        w = w.max(right);
        h = h.max(bottom);
    }
    Ok((w, h))
}

fn descriptor_rgba(d: &FrameDescriptor) -> RgbaImage {
    match &d.image {
        FrameImage::Rgba(img) => img.clone(),
        FrameImage::Indexed { indices, palette } => {
            resolve_indexed(d.width, d.height, indices, palette)
        }
    }
}

/// PLTE (RGB triples) and tRNS (alpha per entry) payloads.
fn split_palette(palette: &Palette) -> (Vec<u8>, Vec<u8>) {
    let mut plte = Vec::with_capacity(palette.len() * 3);
    let mut trns = Vec::with_capacity(palette.len());
    for c in palette.colors() {
        plte.extend_from_slice(&[c.r, c.g, c.b]);
        trns.push(c.a);
    }
    (plte, trns)
}

/// APNG `num_plays`: 0 loops forever; a stream without a loop count plays once.
fn num_plays(loop_count: LoopCount) -> u32 {
    match loop_count {
        LoopCount::Infinite => 0,
        LoopCount::Finite(n) => u32::from(n.max(1)),
    }
}

fn dispose_op(op: DisposeOp) -> png::DisposeOp {
    match op {
        DisposeOp::None => png::DisposeOp::None,
        DisposeOp::Background => png::DisposeOp::Background,
        DisposeOp::Previous => png::DisposeOp::Previous,
    }
}

fn blend_op(mode: BlendMode) -> png::BlendOp {
    match mode {
        BlendMode::Source => png::BlendOp::Source,
        BlendMode::Over => png::BlendOp::Over,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/apng_sink.rs"]
mod tests;
