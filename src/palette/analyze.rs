use std::collections::HashSet;
use std::sync::Arc;

use crate::animation::model::{Frame, Pixels};
use crate::foundation::core::{Color, MAX_PALETTE_LEN};

/// Set of distinct colors that stops growing once it holds more than `cap` entries.
///
/// Only the "exceeded" bit matters past the cap, so the exact count is never tracked.
#[derive(Debug)]
pub struct BoundedColorSet {
    seen: HashSet<Color>,
    cap: usize,
}

impl BoundedColorSet {
    pub fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(cap + 1),
            cap,
        }
    }

    /// Insert `color`; returns `true` once the set holds more than `cap` colors.
    pub fn insert(&mut self, color: Color) -> bool {
        if !self.exceeded() {
            self.seen.insert(color);
        }
        self.exceeded()
    }

    pub fn exceeded(&self) -> bool {
        self.seen.len() > self.cap
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// `true` when the frames reference more than 256 distinct colors in total.
///
/// Indexed frames contribute their palette entries (frame order, then entry order); explicit
/// frames contribute every pixel.
pub fn exceeds_color_budget(frames: &[Frame]) -> bool {
    let mut set = BoundedColorSet::new(MAX_PALETTE_LEN);
    for frame in frames {
        let exceeded = match frame.pixels() {
            Pixels::Indexed { palette, .. } => {
                palette.colors().iter().any(|&c| set.insert(c))
            }
            Pixels::Explicit(img) => img.pixels().any(|px| set.insert(Color::from_array(px.0))),
        };
        if exceeded {
            return true;
        }
    }
    false
}

/// `true` when the indexed frames do not already share one identical palette.
///
/// Pairwise comparison is O(frames^2 * palette_len). Palettes are capped at 256 entries and
/// animations are short, so this is preferred over hashing each palette.
pub fn needs_unification(frames: &[Frame]) -> bool {
    let mut palettes = Vec::with_capacity(frames.len());
    for frame in frames {
        match frame.palette() {
            Some(p) => palettes.push(p),
            None => return false,
        }
    }
    let Some(first) = palettes.first() else {
        return false;
    };

    let expected_len = first.len();
    if palettes.iter().any(|p| p.len() != expected_len) {
        return true;
    }

    for (i, a) in palettes.iter().enumerate() {
        for (j, b) in palettes.iter().enumerate() {
            if i == j || Arc::ptr_eq(a, b) {
                continue;
            }
            let same = a
                .colors()
                .iter()
                .zip(b.colors())
                .all(|(ca, cb)| ca == cb);
            if !same {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[path = "../../tests/unit/palette/analyze.rs"]
mod tests;
