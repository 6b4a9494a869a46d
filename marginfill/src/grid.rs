//! Row-major containers for pixels and per-pixel flags.

use thiserror::Error;

/// A position in a grid, as `(x, y)`.
pub type Position = (u32, u32);

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The same color with alpha set to fully opaque.
    #[inline]
    pub fn opaque(self) -> Self {
        Self { a: u8::MAX, ..self }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("RGBA8 buffer for a {width}x{height} image must be {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

const STRIDE: usize = 4;

/// A 2D image stored row-major, one [`Pixel`] per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: (u32, u32),
    pixels: Vec<Pixel>,
}

impl Grid {
    pub fn new(size: (u32, u32), fill: Pixel) -> Self {
        Self {
            size,
            pixels: vec![fill; area(size)],
        }
    }

    pub fn new_empty(size: (u32, u32)) -> Self {
        Self::new(size, Pixel::default())
    }

    /// Builds a grid from tightly packed RGBA8 bytes, the layout PNG decoders
    /// hand out.
    pub fn from_rgba8<D: AsRef<[u8]>>(size: (u32, u32), data: D) -> Result<Self, GridError> {
        let data = data.as_ref();
        let expected = area(size) * STRIDE;

        if data.len() != expected {
            return Err(GridError::BufferSize {
                width: size.0,
                height: size.1,
                expected,
                actual: data.len(),
            });
        }

        let pixels = data
            .chunks_exact(STRIDE)
            .map(|chunk| Pixel::new(chunk[0], chunk[1], chunk[2], chunk[3]))
            .collect();

        Ok(Self { size, pixels })
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * STRIDE);

        for pixel in &self.pixels {
            data.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }

        data
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.0
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.1
    }

    pub fn get_pixel(&self, pos: Position) -> Pixel {
        self.pixels[index(self.size, pos)]
    }

    pub fn set_pixel(&mut self, pos: Position, pixel: Pixel) {
        let index = index(self.size, pos);
        self.pixels[index] = pixel;
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        positions(self.size)
    }
}

/// A flag per position. Flags can only ever be raised, never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: (u32, u32),
    data: Vec<bool>,
}

impl Mask {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            data: vec![false; area(size)],
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn get(&self, pos: Position) -> bool {
        self.data[index(self.size, pos)]
    }

    #[inline]
    pub fn set(&mut self, pos: Position) {
        let index = index(self.size, pos);
        self.data[index] = true;
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }

    pub fn all_set(&self) -> bool {
        self.data.iter().all(|&set| set)
    }

    /// Whether every flag raised in `other` is also raised here.
    pub fn contains(&self, other: &Mask) -> bool {
        self.size == other.size
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&ours, &theirs)| ours || !theirs)
    }
}

pub(crate) fn positions(size: (u32, u32)) -> impl Iterator<Item = Position> {
    let (w, h) = size;
    (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
}

fn area(size: (u32, u32)) -> usize {
    size.0 as usize * size.1 as usize
}

fn index(size: (u32, u32), pos: Position) -> usize {
    assert!(pos.0 < size.0);
    assert!(pos.1 < size.1);

    pos.0 as usize + pos.1 as usize * size.0 as usize
}
