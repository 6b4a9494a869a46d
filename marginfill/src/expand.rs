//! Grows the opaque region of an image one ring of pixels at a time.
//!
//! Every pixel on the frontier takes the average color of its neighbors that
//! were opaque as of the previous iteration. New colors are staged and only
//! committed once the whole frontier has been visited, so the order pixels are
//! visited in never changes the result. That dependency on the previous
//! iteration is also why this runs on a single thread.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    blend::BlendList,
    frontier::{seed, Seed},
    grid::{Grid, Mask, Position},
    neighbors::{neighbors, Tiling},
    settings::MarginSettings,
};

/// A signal, polled once per iteration, that asks the expansion to stop.
pub trait Cancel {
    fn is_cancelled(&self) -> bool;
}

/// A `Cancel` that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancel for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancel for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F> Cancel for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// The frontier ran dry. Every pixel reachable from an opaque pixel has
    /// been filled.
    Complete,

    /// The caller asked to stop. The image holds every iteration committed
    /// before that.
    Cancelled,

    /// The configured iteration limit was reached first.
    IterationLimit,
}

/// A summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub status: FillStatus,

    /// How many iterations were committed.
    pub iterations: u32,

    /// How many pixels were given a new color.
    pub filled: usize,

    /// How many pixels are still below the alpha threshold.
    pub remaining: usize,

    /// The largest number of neighbors any single pixel was blended from.
    pub highest_blend_count: usize,
}

/// What happened during a single call to [`Wavefront::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    /// Pixels that received a color and became opaque.
    pub filled: usize,

    /// Size of the frontier for the next iteration.
    pub next_frontier: usize,
}

/// The state of a margin being grown.
///
/// `Wavefront` is active while its frontier is non-empty and done once it is
/// empty. Each [`step`](Wavefront::step) commits exactly one iteration.
#[derive(Debug)]
pub struct Wavefront {
    tiling: Tiling,
    max_iterations: Option<u32>,
    image: Grid,
    mask: Mask,
    frontier: HashSet<Position>,

    // Colors computed this iteration, committed after the whole frontier has
    // been blended. Only positions listed in `staged` are meaningful.
    staging: Grid,
    staged: Vec<Position>,

    iterations: u32,
    filled: usize,
    highest_blend_count: usize,
}

impl Wavefront {
    pub fn new(source: &Grid, settings: &MarginSettings) -> Self {
        let Seed {
            image,
            mask,
            frontier,
        } = seed(source, settings.alpha_threshold, settings.tiling);

        Self {
            tiling: settings.tiling,
            max_iterations: settings.max_iterations,
            staging: Grid::new_empty(image.size()),
            staged: Vec::new(),
            image,
            mask,
            frontier,
            iterations: 0,
            filled: 0,
            highest_blend_count: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn image(&self) -> &Grid {
        &self.image
    }

    pub fn into_image(self) -> Grid {
        self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn frontier(&self) -> &HashSet<Position> {
        &self.frontier
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Advances the margin by one ring of pixels. Does nothing once done.
    pub fn step(&mut self) -> StepSummary {
        if self.is_done() {
            return StepSummary {
                filled: 0,
                next_frontier: 0,
            };
        }

        let size = self.image.size();
        let mut candidates = HashSet::new();
        let mut blend_list = BlendList::new();

        self.staged.clear();

        for &pos in &self.frontier {
            blend_list.clear();

            for neighbor in neighbors(pos, size, self.tiling) {
                if self.mask.get(neighbor) {
                    blend_list.push(self.image.get_pixel(neighbor));
                } else {
                    candidates.insert(neighbor);
                }
            }

            // A frontier pixel with no opaque neighbors stays transparent for
            // now. It will come back around as someone else's candidate once
            // one of its neighbors fills in.
            if let Some(color) = blend_list.blend() {
                self.staging.set_pixel(pos, color);
                self.staged.push(pos);
                self.highest_blend_count = self.highest_blend_count.max(blend_list.len());
            }
        }

        for &pos in &self.staged {
            self.image.set_pixel(pos, self.staging.get_pixel(pos));
            self.mask.set(pos);
        }

        let mask = &self.mask;
        self.frontier = candidates
            .into_iter()
            .filter(|&pos| !mask.get(pos))
            .collect();

        let filled = self.staged.len();
        self.iterations += 1;
        self.filled += filled;

        log::trace!(
            "Iteration {}: filled {} pixels, {} on the next frontier",
            self.iterations,
            filled,
            self.frontier.len()
        );

        StepSummary {
            filled,
            next_frontier: self.frontier.len(),
        }
    }

    /// Steps until the frontier is empty, `cancel` fires, or the iteration
    /// limit is reached.
    pub fn run(&mut self, cancel: &dyn Cancel) -> FillReport {
        let status = loop {
            if self.is_done() {
                break FillStatus::Complete;
            }

            if cancel.is_cancelled() {
                log::debug!("Cancelled after {} iterations", self.iterations);
                break FillStatus::Cancelled;
            }

            if let Some(max_iterations) = self.max_iterations {
                if self.iterations >= max_iterations {
                    break FillStatus::IterationLimit;
                }
            }

            self.step();
        };

        let report = self.report(status);

        log::debug!(
            "Filled {} pixels in {} iterations ({} still transparent, up to {} neighbors blended)",
            report.filled,
            report.iterations,
            report.remaining,
            report.highest_blend_count
        );

        report
    }

    fn report(&self, status: FillStatus) -> FillReport {
        let (w, h) = self.image.size();
        let area = w as usize * h as usize;

        FillReport {
            status,
            iterations: self.iterations,
            filled: self.filled,
            remaining: area - self.mask.count_set(),
            highest_blend_count: self.highest_blend_count,
        }
    }
}

/// Grows a margin around the opaque parts of `source`, returning a fully
/// opaque copy of it.
///
/// Pixels whose alpha is at or above the threshold keep their color. Every
/// other pixel that can be reached from one of them is given a blend of the
/// colors closest to it.
pub fn extend_margin(
    source: &Grid,
    settings: &MarginSettings,
    cancel: &dyn Cancel,
) -> (Grid, FillReport) {
    let mut wavefront = Wavefront::new(source, settings);
    let report = wavefront.run(cancel);

    (wavefront.into_image(), report)
}
