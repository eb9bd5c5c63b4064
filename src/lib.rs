//! gifsquare converts GIF animations into square, size-bounded animated PNGs.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: `GIF bytes -> Animation` of indexed frames ([`GifSource`])
//! 2. **Unify**: promote to RGBA, merge palettes, or pass through ([`unify_palettes`])
//! 3. **Normalize**: pad to a square anchored at the origin, Lanczos-3 downscale above the
//!    configured maximum ([`normalize_geometry`])
//! 4. **Assemble**: ordered frame descriptors plus loop count ([`assemble`])
//! 5. **Encode**: APNG output ([`ApngSink`])
//!
//! Processing is sequential and fail-fast: [`convert_dir`] stops at the first error.
#![forbid(unsafe_code)]

mod animation;
mod assemble;
mod codec;
mod foundation;
mod geometry;
mod palette;
mod pipeline;

pub use animation::model::{Animation, Frame, Pixels};
pub use assemble::frames::{
    AssembledAnimation, DisposeOp, FrameDescriptor, FrameImage, assemble,
};
pub use codec::apng_sink::{ApngSink, CompressionLevel, FrameSink};
pub use codec::gif_source::{FrameSource, GifSource, palette_from_table};
pub use foundation::core::{
    BlendMode, Color, DELAY_DENOMINATOR, Delay, DisposalMode, LoopCount, MAX_PALETTE_LEN, Palette,
};
pub use foundation::error::{GifSquareError, GifSquareResult};
pub use geometry::normalize::{DEFAULT_MAX_DIM, downscale, normalize_geometry, pad_to_square};
pub use palette::analyze::{BoundedColorSet, exceeds_color_budget, needs_unification};
pub use palette::builder::{PaletteBuilder, Slot, color_distance};
pub use palette::unify::{
    UnifyReport, UnifyStrategy, merge_palettes, promote_to_rgba, unify_palettes,
};
pub use pipeline::{
    BatchStats, ConvertOpts, ConvertReport, OUTPUT_SUFFIX, convert_bytes, convert_dir,
    convert_file, convert_stream, list_gif_files, normalize_animation, output_path_for,
};
