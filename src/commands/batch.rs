use std::{
    collections::BTreeMap,
    env,
    path::{Path, PathBuf},
    ptr,
};

use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use marginfill::{FillStatus, MarginSettings};
use walkdir::WalkDir;

use crate::{
    commands::extend::extend_file,
    data::{Config, CONFIG_FILENAME},
    options::BatchOptions,
};

pub fn batch(options: BatchOptions) -> anyhow::Result<()> {
    let project_path = match options.project_path {
        Some(path) => path,
        None => env::current_dir()?,
    };

    let config = match Config::read_from_folder_or_file(&project_path) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => bail!(
            "Couldn't find {} at {}",
            CONFIG_FILENAME,
            project_path.display()
        ),
        Err(err) => return Err(err.into()),
    };

    log::info!("Processing project \"{}\"", config.name);

    let inputs = discover_inputs(&config)?;
    if inputs.is_empty() {
        log::warn!("No images matched any inputs in {}", config.file_path.display());
        return Ok(());
    }

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {msg}"));

    let mut incomplete = 0;

    for (relative_path, settings) in &inputs {
        progress.set_message(relative_path.display().to_string());

        let input_path = config.folder().join(relative_path);
        let output_path = config.output_path(relative_path);

        let report = extend_file(&input_path, &output_path, *settings, &options.limits)
            .with_context(|| format!("Couldn't process {}", relative_path.display()))?;

        if report.status != FillStatus::Complete {
            incomplete += 1;
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    log::info!(
        "Processed {} images ({} stopped early)",
        inputs.len(),
        incomplete
    );

    Ok(())
}

/// Finds every file matched by the config's inputs, paired with the settings
/// of the first input that matched it. Paths are relative to the config's
/// folder.
fn discover_inputs(config: &Config) -> anyhow::Result<BTreeMap<PathBuf, MarginSettings>> {
    let folder = config.folder();
    let mut inputs = BTreeMap::new();

    for input in &config.inputs {
        let search_root = folder.join(input.glob.search_root());

        if !search_root.exists() {
            log::debug!(
                "Skipping \"{}\", {} does not exist",
                input.glob,
                search_root.display()
            );
            continue;
        }

        for entry in WalkDir::new(&search_root) {
            let entry = entry?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(folder) {
                Ok(relative) => relative,
                Err(_) => continue,
            };

            if is_output(config, relative_path) || inputs.contains_key(relative_path) {
                continue;
            }

            // Earlier inputs take priority over this one.
            match config.input_for(relative_path) {
                Some(matched) if ptr::eq(matched, input) => {
                    log::trace!("Found input {}", relative_path.display());
                    inputs.insert(relative_path.to_owned(), input.settings()?);
                }
                _ => {}
            }
        }
    }

    Ok(inputs)
}

// Results written under the project folder shouldn't be picked up again as
// inputs on the next run.
fn is_output(config: &Config, relative_path: &Path) -> bool {
    match &config.output_dir {
        Some(output_dir) => relative_path.starts_with(output_dir),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::process;

    use fs_err as fs;
    use marginfill::{Grid, Pixel, Tiling};

    use crate::image::{decode_png, encode_png};
    use crate::options::RunLimitOptions;

    fn write_png(path: &Path, image: &Grid) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        encode_png(image, fs::File::create(path).unwrap()).unwrap();
    }

    #[test]
    fn processes_project() {
        let folder = env::temp_dir().join(format!("pixmargin-batch-{}", process::id()));
        fs::create_dir_all(&folder).unwrap();

        fs::write(
            folder.join(CONFIG_FILENAME),
            r#"
                name = "batch-test"
                output-dir = "build"

                [[inputs]]
                glob = "tiles/**/*.png"
                tile-x = true
                tile-y = true

                [[inputs]]
                glob = "**/*.png"
                alpha-threshold = 255
            "#,
        )
        .unwrap();

        let mut tile = Grid::new((5, 1), Pixel::new(0, 0, 0, 0));
        tile.set_pixel((0, 0), Pixel::new(200, 0, 0, 255));
        write_png(&folder.join("tiles/grass.png"), &tile);

        let mut icon = Grid::new((3, 3), Pixel::new(0, 0, 0, 0));
        icon.set_pixel((1, 1), Pixel::new(0, 0, 200, 254));
        write_png(&folder.join("ui/icon.png"), &icon);

        fs::write(folder.join("ui/notes.txt"), "not an image").unwrap();

        let config = Config::read_from_folder(&folder).unwrap();
        let inputs = discover_inputs(&config).unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[Path::new("tiles/grass.png")].tiling, Tiling::BOTH);
        assert_eq!(inputs[Path::new("ui/icon.png")].alpha_threshold.get(), 255);

        batch(BatchOptions {
            project_path: Some(folder.clone()),
            limits: RunLimitOptions {
                timeout: None,
                max_iterations: None,
            },
        })
        .unwrap();

        let grass = fs::File::open(folder.join("build/tiles/grass.png")).unwrap();
        let grass = decode_png(grass).unwrap();
        assert_eq!(grass, Grid::new((5, 1), Pixel::new(200, 0, 0, 255)));

        // Below the threshold, so nothing seeds the margin.
        let icon = fs::File::open(folder.join("build/ui/icon.png")).unwrap();
        let icon = decode_png(icon).unwrap();
        assert_eq!(icon.get_pixel((1, 1)), Pixel::new(0, 0, 200, 255));
        assert_eq!(icon.get_pixel((0, 0)), Pixel::new(0, 0, 0, 255));

        // A second run doesn't treat its own output as input.
        let config = Config::read_from_folder(&folder).unwrap();
        assert_eq!(discover_inputs(&config).unwrap().len(), 2);

        fs::remove_dir_all(&folder).unwrap();
    }
}
