//! Builds the starting state for growing a margin: which pixels are already
//! opaque, and which transparent pixels border them.

use std::collections::HashSet;

use crate::{
    grid::{Grid, Mask, Position},
    neighbors::{neighbors, Tiling},
    settings::AlphaThreshold,
};

/// The output of [`seed`].
#[derive(Debug, Clone)]
pub struct Seed {
    /// A copy of the source with every pixel's alpha forced to opaque.
    pub image: Grid,

    /// Pixels whose source alpha met the threshold.
    pub mask: Mask,

    /// Transparent pixels with at least one opaque neighbor.
    pub frontier: HashSet<Position>,
}

pub fn seed(source: &Grid, threshold: AlphaThreshold, tiling: Tiling) -> Seed {
    let size = source.size();
    let mut image = Grid::new_empty(size);
    let mut mask = Mask::new(size);

    for pos in source.positions() {
        let pixel = source.get_pixel(pos);

        if threshold.is_opaque(pixel.a) {
            mask.set(pos);
        }

        image.set_pixel(pos, pixel.opaque());
    }

    // The mask has to be complete before we can tell which pixels border it.
    let frontier: HashSet<Position> = source
        .positions()
        .filter(|&pos| !mask.get(pos))
        .filter(|&pos| neighbors(pos, size, tiling).any(|neighbor| mask.get(neighbor)))
        .collect();

    log::trace!(
        "Seeded {}x{} image: {} opaque pixels, {} on the frontier",
        size.0,
        size.1,
        mask.count_set(),
        frontier.len()
    );

    Seed {
        image,
        mask,
        frontier,
    }
}
