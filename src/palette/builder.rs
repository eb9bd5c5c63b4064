use crate::foundation::core::{Color, MAX_PALETTE_LEN, Palette};

/// How a source palette entry landed in the shared palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// An identical color was already present.
    Existing(u8),
    /// The color was appended.
    Appended(u8),
    /// The palette was full; the index of the closest entry.
    Approximated(u8),
}

impl Slot {
    pub fn index(self) -> u8 {
        match self {
            Self::Existing(i) | Self::Appended(i) | Self::Approximated(i) => i,
        }
    }
}

/// Sum of squared per-channel differences over R, G, B and A.
pub fn color_distance(a: Color, b: Color) -> u32 {
    let d = |x: u8, y: u8| {
        let v = i32::from(x) - i32::from(y);
        (v * v) as u32
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b) + d(a.a, b.a)
}

/// Shared palette under construction during unification.
///
/// Owned by one unification run; frames only see the result after [`PaletteBuilder::finish`].
#[derive(Clone, Debug, Default)]
pub struct PaletteBuilder {
    colors: Vec<Color>,
}

impl PaletteBuilder {
    /// Seed the builder with the entries of an existing palette.
    pub fn seeded(palette: &Palette) -> Self {
        Self {
            colors: palette.colors().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= MAX_PALETTE_LEN
    }

    pub fn position(&self, color: Color) -> Option<u8> {
        self.colors
            .iter()
            .position(|&c| c == color)
            .map(|i| i as u8)
    }

    /// Index of the entry closest to `color`; ties resolve to the lowest index.
    pub fn nearest(&self, color: Color) -> Option<u8> {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|&(i, &c)| (color_distance(c, color), i))
            .map(|(i, _)| i as u8)
    }

    /// Exact match, else append, else nearest entry.
    pub fn insert(&mut self, color: Color) -> Slot {
        if let Some(i) = self.position(color) {
            return Slot::Existing(i);
        }
        if !self.is_full() {
            self.colors.push(color);
            return Slot::Appended((self.colors.len() - 1) as u8);
        }
        // A full builder is never empty, so `nearest` always yields an index here.
        Slot::Approximated(self.nearest(color).unwrap_or(0))
    }

    pub fn finish(self) -> Palette {
        // `insert` never grows past MAX_PALETTE_LEN and seeds come from valid palettes.
        Palette::new(self.colors).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/builder.rs"]
mod tests;
