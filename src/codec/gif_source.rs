use std::io::Read;
use std::sync::Arc;

use crate::animation::model::{Animation, Frame};
use crate::foundation::core::{Color, Delay, DisposalMode, LoopCount, Palette};
use crate::foundation::error::{GifSquareError, GifSquareResult};

/// Decoder contract: turn an encoded animation into indexed frames.
pub trait FrameSource {
    /// Decode every frame of the stream, in display order.
    fn decode(&self, reader: &mut dyn Read) -> GifSquareResult<Animation>;
}

/// GIF decoder producing one indexed [`Frame`] per image block.
///
/// The transparent index, when present, is stored as `(0, 0, 0, 0)` in that frame's palette.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifSource;

impl FrameSource for GifSource {
    fn decode(&self, reader: &mut dyn Read) -> GifSquareResult<Animation> {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = opts.read_info(reader)?;
        let global = decoder.global_palette().map(<[u8]>::to_vec);

        let mut frames = Vec::new();
        while let Some(block) = decoder.read_next_frame()? {
            let idx = frames.len();
            let table = block
                .palette
                .as_deref()
                .or(global.as_deref())
                .ok_or_else(|| GifSquareError::decode(format!("frame {idx} has no color table")))?;
            let palette = palette_from_table(table, block.transparent)?;

            let frame = Frame::indexed(
                u32::from(block.width),
                u32::from(block.height),
                block.buffer.to_vec(),
                Arc::new(palette),
            )
            .map_err(|e| GifSquareError::decode(format!("frame {idx}: {e}")))?
            .with_origin(u32::from(block.left), u32::from(block.top))
            .with_delay(Delay::hundredths(block.delay))
            .with_disposal(disposal_mode(block.dispose));
            frames.push(frame);
        }

        if frames.is_empty() {
            return Err(GifSquareError::decode("animation has no frames"));
        }

        let loop_count = match decoder.repeat() {
            gif::Repeat::Infinite => LoopCount::Infinite,
            gif::Repeat::Finite(n) => LoopCount::Finite(n),
        };
        Ok(Animation::new(frames, loop_count))
    }
}

/// Build a palette from packed RGB triples.
///
/// A transparent index past the end of the table grows the palette with transparent entries
/// up to and including that index.
pub fn palette_from_table(table: &[u8], transparent: Option<u8>) -> GifSquareResult<Palette> {
    let mut colors: Vec<Color> = table
        .chunks_exact(3)
        .map(|rgb| Color::opaque(rgb[0], rgb[1], rgb[2]))
        .collect();
    if let Some(t) = transparent.map(usize::from) {
        if colors.len() <= t {
            colors.resize(t + 1, Color::transparent());
        }
        colors[t] = Color::transparent();
    }
    Palette::new(colors)
}

fn disposal_mode(method: gif::DisposalMethod) -> DisposalMode {
    match method {
        gif::DisposalMethod::Any | gif::DisposalMethod::Keep => DisposalMode::None,
        gif::DisposalMethod::Background => DisposalMode::Background,
        gif::DisposalMethod::Previous => DisposalMode::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/gif_source.rs"]
mod tests;
