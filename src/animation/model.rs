use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::{Color, Delay, DisposalMode, LoopCount, Palette};
use crate::foundation::error::{GifSquareError, GifSquareResult};

/// Pixel storage of a single frame.
#[derive(Clone, Debug)]
pub enum Pixels {
    /// One palette index per pixel, row-major.
    Indexed {
        indices: Vec<u8>,
        palette: Arc<Palette>,
    },
    /// Straight-alpha RGBA8 per pixel.
    Explicit(RgbaImage),
}

impl Pixels {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }

    pub fn palette(&self) -> Option<&Arc<Palette>> {
        match self {
            Self::Indexed { palette, .. } => Some(palette),
            Self::Explicit(_) => None,
        }
    }
}

/// One frame of an animation: a rectangular pixel buffer plus timing metadata.
#[derive(Clone, Debug)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    width: u32,
    height: u32,
    pixels: Pixels,
    pub delay: Delay,
    pub disposal: DisposalMode,
}

impl Frame {
    /// Build an indexed frame; every index must address an entry of `palette`.
    pub fn indexed(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Arc<Palette>,
    ) -> GifSquareResult<Self> {
        check_dims(width, height, indices.len())?;
        if let Some(&bad) = indices
            .iter()
            .find(|&&idx| usize::from(idx) >= palette.len())
        {
            return Err(GifSquareError::validation(format!(
                "pixel index {bad} is outside a palette of {} entries",
                palette.len()
            )));
        }
        Ok(Self::from_parts(
            width,
            height,
            Pixels::Indexed { indices, palette },
        ))
    }

    /// Build an explicit-color frame from an RGBA8 buffer.
    pub fn explicit(img: RgbaImage) -> GifSquareResult<Self> {
        let (width, height) = img.dimensions();
        check_dims(width, height, (width as usize) * (height as usize))?;
        Ok(Self::from_parts(width, height, Pixels::Explicit(img)))
    }

    fn from_parts(width: u32, height: u32, pixels: Pixels) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            pixels,
            delay: Delay::default(),
            disposal: DisposalMode::None,
        }
    }

    pub fn with_origin(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_disposal(mut self, disposal: DisposalMode) -> Self {
        self.disposal = disposal;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    pub fn palette(&self) -> Option<&Arc<Palette>> {
        self.pixels.palette()
    }

    /// Swap in a new buffer; dimensions follow the buffer for explicit pixels.
    pub(crate) fn set_pixels(&mut self, pixels: Pixels) {
        if let Pixels::Explicit(img) = &pixels {
            (self.width, self.height) = img.dimensions();
        }
        self.pixels = pixels;
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut Pixels {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Pixels {
        self.pixels
    }

    /// Resolve every pixel to a straight-alpha RGBA8 image.
    pub fn to_rgba(&self) -> RgbaImage {
        match &self.pixels {
            Pixels::Explicit(img) => img.clone(),
            Pixels::Indexed { indices, palette } => {
                resolve_indexed(self.width, self.height, indices, palette)
            }
        }
    }
}

pub(crate) fn resolve_indexed(
    width: u32,
    height: u32,
    indices: &[u8],
    palette: &Palette,
) -> RgbaImage {
    let mut raw = Vec::with_capacity(indices.len() * 4);
    for &idx in indices {
        // Indices are validated against the palette at construction.
        let c = palette.get(idx).unwrap_or(Color::transparent());
        raw.extend_from_slice(&c.to_array());
    }
    RgbaImage::from_raw(width, height, raw).unwrap_or_else(|| RgbaImage::new(width, height))
}

fn check_dims(width: u32, height: u32, len: usize) -> GifSquareResult<()> {
    if width == 0 || height == 0 {
        return Err(GifSquareError::validation(
            "frame width/height must be non-zero",
        ));
    }
    let expected = (width as usize) * (height as usize);
    if len != expected {
        return Err(GifSquareError::validation(format!(
            "frame buffer holds {len} pixels, expected {width}x{height}={expected}"
        )));
    }
    Ok(())
}

/// Ordered frames sharing one loop count.
#[derive(Clone, Debug, Default)]
pub struct Animation {
    pub frames: Vec<Frame>,
    pub loop_count: LoopCount,
}

impl Animation {
    pub fn new(frames: Vec<Frame>, loop_count: LoopCount) -> Self {
        Self { frames, loop_count }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `true` when every frame is indexed and all share one `Arc<Palette>`.
    pub fn shares_one_palette(&self) -> bool {
        let mut palettes = self.frames.iter().map(Frame::palette);
        let Some(Some(first)) = palettes.next() else {
            return false;
        };
        palettes.all(|p| p.is_some_and(|p| Arc::ptr_eq(p, first)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/model.rs"]
mod tests;
