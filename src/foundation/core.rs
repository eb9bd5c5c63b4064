use crate::foundation::error::{GifSquareError, GifSquareResult};

/// Largest palette an indexed frame may reference.
pub const MAX_PALETTE_LEN: usize = 256;

/// Fixed denominator for frame delays (hundredths of a second, the GIF timing unit).
pub const DELAY_DENOMINATOR: u16 = 100;

/// Straight-alpha RGBA8 color.
///
/// Equality is exact over all four channels, so two fully transparent colors with different
/// RGB values are distinct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }
}

/// Ordered color table addressed by pixel indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> GifSquareResult<Self> {
        if colors.len() > MAX_PALETTE_LEN {
            return Err(GifSquareError::validation(format!(
                "palette has {} entries, at most {MAX_PALETTE_LEN} allowed",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Color> {
        self.colors.get(usize::from(index)).copied()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// Frame display time as `num / DELAY_DENOMINATOR` seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delay {
    pub num: u16,
}

impl Delay {
    pub fn hundredths(num: u16) -> Self {
        Self { num }
    }

    pub fn den(self) -> u16 {
        DELAY_DENOMINATOR
    }
}

/// How the canvas region of a frame is treated before the next frame renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisposalMode {
    #[default]
    None,
    Background,
    Previous,
}

/// How a frame's pixels combine with the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    Source,
    #[default]
    Over,
}

/// Number of times an animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopCount {
    #[default]
    Infinite,
    Finite(u16),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
