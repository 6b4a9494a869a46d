use std::{
    convert::TryFrom,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context};
use fs_err as fs;
use marginfill::{
    apply_effect, AlphaThreshold, ExtendMargin, FillReport, FillStatus, MarginSettings, Tiling,
};

use crate::{
    deadline::Deadline,
    image::{decode_png, encode_png},
    options::{ExtendOptions, MarginOptions, RunLimitOptions},
};

// The size of regions handed to the effect after the margin is grown.
const RENDER_TILE_SIZE: (u32, u32) = (256, 256);

pub fn extend(options: ExtendOptions) -> anyhow::Result<()> {
    let settings = margin_settings(&options.margin)?;
    let output = options.output.as_ref().unwrap_or(&options.input);

    extend_file(&options.input, output, settings, &options.limits)?;

    Ok(())
}

fn margin_settings(options: &MarginOptions) -> anyhow::Result<MarginSettings> {
    let alpha_threshold = AlphaThreshold::try_from(options.alpha_threshold)?;

    Ok(MarginSettings::new()
        .alpha_threshold(alpha_threshold)
        .tiling(Tiling::new(options.tile_x, options.tile_y)))
}

/// Reads the PNG at `input`, grows its margin, and writes the result to
/// `output`, creating any missing parent folders.
pub(crate) fn extend_file(
    input: &Path,
    output: &Path,
    settings: MarginSettings,
    limits: &RunLimitOptions,
) -> anyhow::Result<FillReport> {
    let settings = settings.max_iterations(limits.max_iterations);

    let reader = BufReader::new(fs::File::open(input)?);
    let source =
        decode_png(reader).with_context(|| format!("Couldn't decode {}", input.display()))?;

    log::debug!(
        "Extending margin of {} ({}x{}) with alpha threshold {}",
        input.display(),
        source.width(),
        source.height(),
        settings.alpha_threshold
    );

    let deadline = Deadline::from_timeout(limits.timeout)?;
    let mut effect = ExtendMargin::new(settings);
    let image = apply_effect(&mut effect, &source, &deadline, RENDER_TILE_SIZE);

    let report = effect
        .last_report()
        .ok_or_else(|| anyhow!("Margin effect produced no report for {}", input.display()))?;

    log_report(input, &report);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = BufWriter::new(fs::File::create(output)?);
    encode_png(&image, &mut file)
        .with_context(|| format!("Couldn't encode {}", output.display()))?;
    file.flush()?;

    log::trace!("Wrote {}", output.display());

    Ok(report)
}

fn log_report(input: &Path, report: &FillReport) {
    match report.status {
        FillStatus::Complete => {
            log::info!(
                "{}: filled {} pixels in {} iterations",
                input.display(),
                report.filled,
                report.iterations
            );

            if report.remaining > 0 {
                log::warn!(
                    "{}: {} pixels had no opaque pixels to grow from and were left as-is",
                    input.display(),
                    report.remaining
                );
            }
        }
        FillStatus::Cancelled => {
            log::warn!(
                "{}: timed out after {} iterations, writing partial margin ({} pixels still transparent)",
                input.display(),
                report.iterations,
                report.remaining
            );
        }
        FillStatus::IterationLimit => {
            log::info!(
                "{}: stopped at the iteration limit of {} ({} pixels still transparent)",
                input.display(),
                report.iterations,
                report.remaining
            );
        }
    }
}
