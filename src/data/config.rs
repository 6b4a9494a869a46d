use std::{
    convert::TryFrom,
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use marginfill::{AlphaThreshold, MarginSettings, ThresholdError, Tiling};
use serde::Deserialize;
use thiserror::Error;

use crate::glob::Glob;

pub static CONFIG_FILENAME: &str = "pixmargin.toml";

/// Configuration for a batch of images, contained in a pixmargin.toml file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// The name of the project, currently only used in logging.
    pub name: String,

    /// If set, processed images are written under this folder, keeping their
    /// path relative to the config. Otherwise, images are overwritten in
    /// place.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Groups of images and the settings to process them with.
    #[serde(default)]
    pub inputs: Vec<InputConfig>,

    /// The path that this config came from. Paths from this config should be
    /// relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Config {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let folder_path = folder_path.as_ref();
        let file_path = &folder_path.join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path)?;

        let mut config = Self::parse(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        config.file_path = path.to_owned();

        for input in &config.inputs {
            input.settings()?;
        }

        Ok(config)
    }

    fn parse(contents: &[u8]) -> Result<Self, toml::de::Error> {
        toml::from_slice(contents)
    }

    /// The path that paths in this Config should be considered relative to.
    pub fn folder(&self) -> &Path {
        match self.file_path.parent() {
            Some(parent) => parent,
            None => Path::new("."),
        }
    }

    /// The first group of inputs whose glob matches `relative_path`, which
    /// should be relative to [`folder`](Config::folder).
    pub fn input_for(&self, relative_path: &Path) -> Option<&InputConfig> {
        self.inputs
            .iter()
            .find(|input| input.glob.is_match(relative_path))
    }

    /// Where the processed copy of the image at `relative_path` goes.
    pub fn output_path(&self, relative_path: &Path) -> PathBuf {
        match &self.output_dir {
            Some(output_dir) => self.folder().join(output_dir).join(relative_path),
            None => self.folder().join(relative_path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct InputConfig {
    /// A glob that will match all files that should be considered for this
    /// group of inputs.
    pub glob: Glob,

    /// The lowest alpha that keeps a pixel's color. Must be between 1 and
    /// 255.
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u32,

    /// Whether the margin should wrap across the left and right edges.
    #[serde(default)]
    pub tile_x: bool,

    /// Whether the margin should wrap across the top and bottom edges.
    #[serde(default)]
    pub tile_y: bool,
}

impl InputConfig {
    pub fn settings(&self) -> Result<MarginSettings, ConfigError> {
        let alpha_threshold =
            AlphaThreshold::try_from(self.alpha_threshold).map_err(|source| {
                ConfigError::Threshold {
                    glob: self.glob.to_string(),
                    source,
                }
            })?;

        Ok(MarginSettings::new()
            .alpha_threshold(alpha_threshold)
            .tiling(Tiling::new(self.tile_x, self.tile_y)))
    }
}

fn default_alpha_threshold() -> u32 {
    AlphaThreshold::default().get().into()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error deserializing TOML from path {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid settings for inputs matching \"{glob}\": {source}")]
    Threshold {
        glob: String,
        source: ThresholdError,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
