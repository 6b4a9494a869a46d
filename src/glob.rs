//! A glob that can be read from pixmargin.toml and knows which folder it can
//! match inside.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use globset::{Glob as InnerGlob, GlobMatcher};
use serde::{de::Error as _, Deserialize, Deserializer};

pub use globset::Error;

#[derive(Debug, Clone)]
pub struct Glob {
    inner: InnerGlob,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(glob: &str) -> Result<Self, Error> {
        let inner = InnerGlob::new(glob)?;
        let matcher = inner.compile_matcher();

        Ok(Glob { inner, matcher })
    }

    pub fn is_match<P: AsRef<Path>>(&self, path: P) -> bool {
        self.matcher.is_match(path)
    }

    /// The longest leading part of the glob that contains no pattern syntax.
    /// Every path this glob matches lives under it, so there's no reason to
    /// walk anything else.
    pub fn search_root(&self) -> PathBuf {
        literal_prefix(Path::new(self.inner.glob()))
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Glob {}

impl<'de> Deserialize<'de> for Glob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let glob = String::deserialize(deserializer)?;

        Glob::new(&glob).map_err(D::Error::custom)
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(f)
    }
}

// Characters that might start glob pattern syntax. Escapes like `[*]` count as
// patterns too, which only means we search a bit more than we need to.
//
// Glob syntax described here: https://docs.rs/globset/0.4.4/globset/#syntax
const PATTERN_CHARACTERS: &[char] = &['*', '?', '{', '}', '[', ']'];

fn literal_prefix(glob_path: &Path) -> PathBuf {
    glob_path
        .iter()
        .take_while(|component| match component.to_str() {
            Some(component) => !component.contains(PATTERN_CHARACTERS),
            None => true,
        })
        .collect()
}
