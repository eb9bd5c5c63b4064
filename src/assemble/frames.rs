use std::sync::Arc;

use image::RgbaImage;

use crate::animation::model::{Animation, Frame, Pixels};
use crate::foundation::core::{BlendMode, DisposalMode, LoopCount, Palette};

/// Pixel payload handed to a [`FrameSink`](crate::FrameSink).
#[derive(Clone, Debug)]
pub enum FrameImage {
    Indexed {
        indices: Vec<u8>,
        palette: Arc<Palette>,
    },
    Rgba(RgbaImage),
}

/// Per-frame output record: pixels, placement and timing.
#[derive(Clone, Debug)]
pub struct FrameDescriptor {
    pub image: FrameImage,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub delay_num: u16,
    pub delay_den: u16,
    pub dispose: DisposeOp,
    pub blend: BlendMode,
}

/// Output disposal operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisposeOp {
    None,
    Background,
    Previous,
}

impl From<DisposalMode> for DisposeOp {
    fn from(mode: DisposalMode) -> Self {
        match mode {
            DisposalMode::None => Self::None,
            DisposalMode::Background => Self::Background,
            DisposalMode::Previous => Self::Previous,
        }
    }
}

/// Ordered descriptors plus the loop count, ready for encoding.
#[derive(Clone, Debug)]
pub struct AssembledAnimation {
    pub frames: Vec<FrameDescriptor>,
    pub loop_count: LoopCount,
}

impl AssembledAnimation {
    /// Palette shared by every frame, when all frames are indexed against identical palettes.
    pub fn shared_palette(&self) -> Option<&Arc<Palette>> {
        let mut palettes = self.frames.iter().map(|d| match &d.image {
            FrameImage::Indexed { palette, .. } => Some(palette),
            FrameImage::Rgba(_) => None,
        });
        let first = palettes.next()??;
        palettes
            .all(|p| p.is_some_and(|p| Arc::ptr_eq(p, first) || p == first))
            .then_some(first)
    }
}

/// Build one descriptor per frame, in order.
pub fn assemble(anim: Animation) -> AssembledAnimation {
    AssembledAnimation {
        frames: anim.frames.into_iter().map(describe).collect(),
        loop_count: anim.loop_count,
    }
}

fn describe(frame: Frame) -> FrameDescriptor {
    let (width, height) = (frame.width(), frame.height());
    let (x_offset, y_offset) = (frame.x, frame.y);
    let delay = frame.delay;
    let dispose = DisposeOp::from(frame.disposal);
    let image = match frame.into_pixels() {
        Pixels::Indexed { indices, palette } => FrameImage::Indexed { indices, palette },
        Pixels::Explicit(img) => FrameImage::Rgba(img),
    };
    FrameDescriptor {
        image,
        width,
        height,
        x_offset,
        y_offset,
        delay_num: delay.num,
        delay_den: delay.den(),
        dispose,
        blend: BlendMode::Over,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/frames.rs"]
mod tests;
