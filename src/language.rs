use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::ConfigError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// An embedded word list.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(name: &str) -> Result<Self, ConfigError> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| ConfigError::UnknownWordList {
                name: name.to_string(),
                available: Self::available().join(", "),
            })?;

        // Every file under src/lang is checked in as UTF-8 JSON
        let contents = file.contents_utf8().unwrap_or_default();

        serde_json::from_str(contents).map_err(|source| ConfigError::MalformedWordList {
            name: name.to_string(),
            source,
        })
    }

    /// Names of every embedded list, sorted.
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = LANG_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// `count` words drawn with replacement, so short lists can fill long prompts.
    pub fn random_words<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count)
            .filter_map(|_| self.words.choose(rng).cloned())
            .collect()
    }
}
