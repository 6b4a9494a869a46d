use crate::grid::Pixel;

/// The most colors a single pixel can blend, one per neighbor.
pub const MAX_BLEND_INPUTS: usize = 8;

/// A fixed-capacity list of colors waiting to be blended together.
#[derive(Debug, Clone)]
pub struct BlendList {
    colors: [Pixel; MAX_BLEND_INPUTS],
    len: usize,
}

impl BlendList {
    pub fn new() -> Self {
        Self {
            colors: [Pixel::default(); MAX_BLEND_INPUTS],
            len: 0,
        }
    }

    /// Adds a color to the list. Colors past the capacity are ignored, which
    /// can only happen when a caller pushes more than one color per neighbor.
    pub fn push(&mut self, color: Pixel) {
        debug_assert!(self.len < MAX_BLEND_INPUTS, "BlendList is full");

        if self.len < MAX_BLEND_INPUTS {
            self.colors[self.len] = color;
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Pixel] {
        &self.colors[..self.len]
    }

    /// Blends the collected colors, or returns `None` if there are none.
    pub fn blend(&self) -> Option<Pixel> {
        if self.is_empty() {
            None
        } else {
            Some(blend(self.as_slice()))
        }
    }
}

impl Default for BlendList {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages each color channel of `colors`, rounding down. Alpha is ignored
/// and the result is always fully opaque.
///
/// `colors` must not be empty.
pub fn blend(colors: &[Pixel]) -> Pixel {
    debug_assert!(!colors.is_empty(), "cannot blend an empty list of colors");

    let mut sum = (0u32, 0u32, 0u32);

    for color in colors {
        sum.0 += color.r as u32;
        sum.1 += color.g as u32;
        sum.2 += color.b as u32;
    }

    let count = colors.len() as u32;

    Pixel::new(
        (sum.0 / count) as u8,
        (sum.1 / count) as u8,
        (sum.2 / count) as u8,
        u8::MAX,
    )
}
