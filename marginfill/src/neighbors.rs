use crate::grid::Position;

/// Which image edges wrap around to the opposite side.
///
/// Tiling textures need their margin to continue across the seam, so the
/// neighbors of a pixel on the left edge include pixels on the right edge when
/// `x` is set, and likewise for `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tiling {
    pub x: bool,
    pub y: bool,
}

impl Tiling {
    pub const NONE: Tiling = Tiling { x: false, y: false };
    pub const BOTH: Tiling = Tiling { x: true, y: true };

    pub fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }
}

// Row offset outer, column offset inner.
const OFFSETS: &[(i64, i64)] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// An iterator of the positions adjacent to `pos`, including diagonals.
///
/// Offsets that land outside of the image are wrapped onto the opposite edge
/// for tiled axes and dropped for the others. Each axis is resolved on its
/// own, so a corner pixel with only `x` tiled still has its wrapped
/// horizontal neighbors but none above or below the image.
pub fn neighbors(
    pos: Position,
    size: (u32, u32),
    tiling: Tiling,
) -> impl Iterator<Item = Position> {
    let (x, y) = pos;

    OFFSETS.iter().filter_map(move |&(x_offset, y_offset)| {
        let x_source = resolve_axis(x as i64 + x_offset, size.0, tiling.x)?;
        let y_source = resolve_axis(y as i64 + y_offset, size.1, tiling.y)?;

        Some((x_source, y_source))
    })
}

fn resolve_axis(value: i64, len: u32, wrap: bool) -> Option<u32> {
    let len = len as i64;

    if value >= 0 && value < len {
        Some(value as u32)
    } else if wrap {
        Some(value.rem_euclid(len) as u32)
    } else {
        None
    }
}
