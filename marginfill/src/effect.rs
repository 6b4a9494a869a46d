//! The contract between an image host and an effect it runs.
//!
//! A host calls [`Effect::pre_render`] once with the whole image, then
//! [`Effect::render`] once per region. Hosts are free to render regions in
//! parallel, which is why effects that need to see the whole image at once do
//! their work in `pre_render`.

use crate::{
    expand::{Cancel, FillReport, Wavefront},
    grid::Grid,
    settings::MarginSettings,
};

/// A rectangular region of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: (u32, u32),
    pub size: (u32, u32),
}

impl Rect {
    pub fn new(pos: (u32, u32), size: (u32, u32)) -> Self {
        Self { pos, size }
    }

    pub fn max(&self) -> (u32, u32) {
        (self.pos.0 + self.size.0, self.pos.1 + self.size.1)
    }

    /// Splits an image of the given size into row-major tiles of at most
    /// `tile_size`. Tiles on the right and bottom edges are clipped.
    pub fn tiles(image_size: (u32, u32), tile_size: (u32, u32)) -> impl Iterator<Item = Rect> {
        let tile_size = (tile_size.0.max(1), tile_size.1.max(1));
        let columns = (image_size.0 + tile_size.0 - 1) / tile_size.0;
        let rows = (image_size.1 + tile_size.1 - 1) / tile_size.1;

        (0..rows).flat_map(move |row| {
            (0..columns).map(move |column| {
                let pos = (column * tile_size.0, row * tile_size.1);
                let size = (
                    tile_size.0.min(image_size.0 - pos.0),
                    tile_size.1.min(image_size.1 - pos.1),
                );

                Rect { pos, size }
            })
        })
    }
}

pub trait Effect {
    /// Runs once before any region is rendered, with access to the whole
    /// image.
    fn pre_render(&mut self, dst: &mut Grid, src: &Grid, cancel: &dyn Cancel);

    /// Renders one region of `dst`.
    fn render(&mut self, dst: &mut Grid, src: &Grid, rect: Rect);
}

/// Extends the opaque margin of an image. See [`extend_margin`].
///
/// [`extend_margin`]: crate::extend_margin
#[derive(Debug, Clone)]
pub struct ExtendMargin {
    settings: MarginSettings,
    last_report: Option<FillReport>,
}

impl ExtendMargin {
    pub fn new(settings: MarginSettings) -> Self {
        Self {
            settings,
            last_report: None,
        }
    }

    pub fn settings(&self) -> &MarginSettings {
        &self.settings
    }

    /// The report from the most recent `pre_render`, if there was one.
    pub fn last_report(&self) -> Option<FillReport> {
        self.last_report
    }
}

impl Effect for ExtendMargin {
    // Growing the margin can't be split into regions, since every ring
    // depends on the one before it. All of the work happens here.
    fn pre_render(&mut self, dst: &mut Grid, src: &Grid, cancel: &dyn Cancel) {
        let mut wavefront = Wavefront::new(src, &self.settings);
        let report = wavefront.run(cancel);

        *dst = wavefront.into_image();
        self.last_report = Some(report);
    }

    fn render(&mut self, _dst: &mut Grid, _src: &Grid, _rect: Rect) {}
}

/// Runs `effect` over `src` the way an image host would: one `pre_render`,
/// then one `render` per tile.
pub fn apply_effect<E: Effect + ?Sized>(
    effect: &mut E,
    src: &Grid,
    cancel: &dyn Cancel,
    tile_size: (u32, u32),
) -> Grid {
    let mut dst = src.clone();

    effect.pre_render(&mut dst, src, cancel);

    let mut regions = 0;
    for rect in Rect::tiles(src.size(), tile_size) {
        effect.render(&mut dst, src, rect);
        regions += 1;
    }

    log::trace!("Rendered {} regions", regions);

    dst
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{expand::NeverCancel, grid::Pixel, neighbors::Tiling, FillStatus};

    #[test]
    fn tiles_cover_image() {
        let tiles: Vec<_> = Rect::tiles((5, 3), (2, 2)).collect();

        assert_eq!(
            tiles,
            vec![
                Rect::new((0, 0), (2, 2)),
                Rect::new((2, 0), (2, 2)),
                Rect::new((4, 0), (1, 2)),
                Rect::new((0, 2), (2, 1)),
                Rect::new((2, 2), (2, 1)),
                Rect::new((4, 2), (1, 1)),
            ]
        );

        let area: u32 = tiles.iter().map(|rect| rect.size.0 * rect.size.1).sum();
        assert_eq!(area, 15);
        assert_eq!(tiles[5].max(), (5, 3));
    }

    #[test]
    fn single_tile() {
        let tiles: Vec<_> = Rect::tiles((4, 4), (64, 64)).collect();

        assert_eq!(tiles, vec![Rect::new((0, 0), (4, 4))]);
    }

    #[derive(Default)]
    struct Recorder {
        pre_renders: usize,
        regions: Vec<Rect>,
    }

    impl Effect for Recorder {
        fn pre_render(&mut self, _dst: &mut Grid, _src: &Grid, _cancel: &dyn Cancel) {
            assert!(self.regions.is_empty());
            self.pre_renders += 1;
        }

        fn render(&mut self, _dst: &mut Grid, _src: &Grid, rect: Rect) {
            self.regions.push(rect);
        }
    }

    #[test]
    fn host_order() {
        let src = Grid::new_empty((3, 3));
        let mut recorder = Recorder::default();

        apply_effect(&mut recorder, &src, &NeverCancel, (2, 2));

        assert_eq!(recorder.pre_renders, 1);
        assert_eq!(recorder.regions.len(), 4);
    }

    #[test]
    fn extend_margin_effect() {
        let mut src = Grid::new((4, 4), Pixel::new(0, 0, 0, 0));
        src.set_pixel((0, 0), Pixel::new(80, 90, 100, 255));

        let settings = MarginSettings::new().tiling(Tiling::BOTH);
        let mut effect = ExtendMargin::new(settings);
        assert!(effect.last_report().is_none());

        let dst = apply_effect(&mut effect, &src, &NeverCancel, (1, 1));

        assert_eq!(dst, Grid::new((4, 4), Pixel::new(80, 90, 100, 255)));

        let report = effect.last_report().unwrap();
        assert_eq!(report.status, FillStatus::Complete);
        assert_eq!(report.filled, 15);
    }
}
