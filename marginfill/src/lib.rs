//! Marginfill fills the transparent parts of an image with colors grown
//! outward from its opaque parts. It was built for Pixmargin, a tool that
//! prepares game textures so that filtering and mipmapping don't bleed garbage
//! colors from transparent pixels into visible edges.
//!
//! The margin grows one ring of pixels at a time. Each new pixel is the average
//! of the neighbors that were already opaque, so colors spread from the
//! nearest visible content. Either axis can be tiled, in which case the margin
//! continues across that edge onto the opposite side.
//!
//! ## Example
//! ```
//! use marginfill::{extend_margin, Grid, MarginSettings, NeverCancel, Pixel, Tiling};
//!
//! // A transparent image with a single red pixel in the corner.
//! let mut image = Grid::new((16, 16), Pixel::new(0, 0, 0, 0));
//! image.set_pixel((0, 0), Pixel::new(255, 0, 0, 255));
//!
//! let settings = MarginSettings::new().tiling(Tiling::new(true, true));
//! let (output, report) = extend_margin(&image, &settings, &NeverCancel);
//!
//! assert_eq!(report.remaining, 0);
//! assert_eq!(output.get_pixel((8, 8)), Pixel::new(255, 0, 0, 255));
//! ```

mod blend;
mod effect;
mod expand;
mod frontier;
mod grid;
mod neighbors;
mod settings;

pub use blend::*;
pub use effect::*;
pub use expand::*;
pub use frontier::*;
pub use grid::*;
pub use neighbors::*;
pub use settings::*;
