use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_NUMBER_OF_WORDS: usize = 25;
pub const DEFAULT_NUMBER_OF_SECS: u64 = 60;
pub const DEFAULT_WORD_LIST: &str = "english";

/// User defaults. Command line flags win over anything set here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub number_of_words: usize,
    pub number_of_secs: u64,
    pub word_list: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_words: DEFAULT_NUMBER_OF_WORDS,
            number_of_secs: DEFAULT_NUMBER_OF_SECS,
            word_list: DEFAULT_WORD_LIST.to_string(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

/// Reads `config.json` from the platform config directory. Never writes it.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "retype") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("retype_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(mut cfg) => {
                if cfg.number_of_secs == 0 {
                    warn!(
                        path = %self.path.display(),
                        "number_of_secs must be at least 1, using the default"
                    );
                    cfg.number_of_secs = DEFAULT_NUMBER_OF_SECS;
                }
                cfg
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring malformed config");
                Config::default()
            }
        }
    }
}
