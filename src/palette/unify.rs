use std::sync::Arc;

use crate::animation::model::{Frame, Pixels, resolve_indexed};
use crate::palette::analyze::{exceeds_color_budget, needs_unification};
use crate::palette::builder::{PaletteBuilder, Slot};

/// Path chosen by [`unify_palettes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnifyStrategy {
    /// More than 256 distinct colors: every frame becomes explicit RGBA.
    Promote,
    /// Palettes differ but fit in 256 entries: merged into one shared palette.
    Unify,
    /// Frames already share one identical palette (or nothing to do).
    PassThrough,
}

/// Outcome of a unification run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnifyReport {
    pub strategy: UnifyStrategy,
    /// Entries in the shared palette; `None` after promotion.
    pub palette_len: Option<usize>,
    /// Source palette entries that had no slot left and were mapped to the nearest entry.
    pub approximated: usize,
}

/// Promote, merge or leave the frame palettes so the animation can be written with one color
/// model.
///
/// Merging is order dependent: entries are appended in frame order, so when the shared palette
/// fills up it is the later frames whose colors get approximated.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn unify_palettes(frames: &mut [Frame]) -> UnifyReport {
    let report = if exceeds_color_budget(frames) {
        promote_to_rgba(frames);
        UnifyReport {
            strategy: UnifyStrategy::Promote,
            palette_len: None,
            approximated: 0,
        }
    } else if needs_unification(frames) {
        merge_palettes(frames)
    } else {
        UnifyReport {
            strategy: UnifyStrategy::PassThrough,
            palette_len: frames.first().and_then(Frame::palette).map(|p| p.len()),
            approximated: 0,
        }
    };

    tracing::debug!(strategy = ?report.strategy, palette_len = ?report.palette_len, "palettes resolved");
    if report.approximated > 0 {
        tracing::warn!(
            approximated = report.approximated,
            "shared palette full; colors mapped to nearest entries"
        );
    }
    report
}

/// Replace every indexed buffer by RGBA resolved through the frame's own palette.
pub fn promote_to_rgba(frames: &mut [Frame]) {
    for frame in frames {
        let (w, h) = (frame.width(), frame.height());
        let rgba = match frame.pixels() {
            Pixels::Indexed { indices, palette } => resolve_indexed(w, h, indices, palette),
            Pixels::Explicit(_) => continue,
        };
        frame.set_pixels(Pixels::Explicit(rgba));
    }
}

/// Merge all frame palettes into the first frame's palette and remap pixel indices.
///
/// Callers must only pass indexed frames whose combined distinct colors were checked against
/// the budget; overflow still succeeds through nearest-entry approximation.
pub fn merge_palettes(frames: &mut [Frame]) -> UnifyReport {
    let Some(seed) = frames.first().and_then(Frame::palette) else {
        return UnifyReport {
            strategy: UnifyStrategy::PassThrough,
            palette_len: None,
            approximated: 0,
        };
    };
    let mut builder = PaletteBuilder::seeded(seed);
    let mut approximated = 0;

    for frame in frames.iter_mut().skip(1) {
        let Pixels::Indexed { indices, palette } = frame.pixels_mut() else {
            continue;
        };
        let map: Vec<u8> = palette
            .colors()
            .iter()
            .map(|&c| {
                let slot = builder.insert(c);
                if matches!(slot, Slot::Approximated(_)) {
                    approximated += 1;
                }
                slot.index()
            })
            .collect();
        for idx in indices.iter_mut() {
            *idx = map[usize::from(*idx)];
        }
    }

    let shared = Arc::new(builder.finish());
    for frame in frames.iter_mut() {
        if let Pixels::Indexed { palette, .. } = frame.pixels_mut() {
            *palette = Arc::clone(&shared);
        }
    }

    UnifyReport {
        strategy: UnifyStrategy::Unify,
        palette_len: Some(shared.len()),
        approximated,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/unify.rs"]
mod tests;
