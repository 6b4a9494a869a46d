use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Fills transparent pixels in textures with nearby colors")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times.
    #[structopt(long = "verbose", short, global = true, parse(from_occurrences))]
    pub verbosity: u8,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Extend the margin of a single PNG image.
    Extend(ExtendOptions),

    /// Extend the margin of every image matched by a pixmargin.toml project.
    Batch(BatchOptions),
}

#[derive(Debug, StructOpt)]
pub struct MarginOptions {
    /// Pixels with at least this much alpha keep their color and seed the
    /// margin. Must be between 1 and 255.
    #[structopt(long, default_value = "1")]
    pub alpha_threshold: u32,

    /// Wrap the margin across the left and right edges of the image.
    #[structopt(long)]
    pub tile_x: bool,

    /// Wrap the margin across the top and bottom edges of the image.
    #[structopt(long)]
    pub tile_y: bool,
}

#[derive(Debug, StructOpt)]
pub struct RunLimitOptions {
    /// Give up after this many seconds, keeping whatever margin has been
    /// grown so far.
    #[structopt(long)]
    pub timeout: Option<f64>,

    /// Stop after growing the margin this many pixels outward.
    #[structopt(long)]
    pub max_iterations: Option<u32>,
}

#[derive(Debug, StructOpt)]
pub struct ExtendOptions {
    /// The path to the PNG image to read.
    pub input: PathBuf,

    /// Where to write the resulting image. Defaults to overwriting the input.
    #[structopt(long, short)]
    pub output: Option<PathBuf>,

    #[structopt(flatten)]
    pub margin: MarginOptions,

    #[structopt(flatten)]
    pub limits: RunLimitOptions,
}

#[derive(Debug, StructOpt)]
pub struct BatchOptions {
    /// The path to a pixmargin.toml file, or a folder containing one. Defaults
    /// to the current working directory.
    pub project_path: Option<PathBuf>,

    #[structopt(flatten)]
    pub limits: RunLimitOptions,
}
