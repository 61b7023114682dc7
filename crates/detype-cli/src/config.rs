//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use detype::FormatOptions;
use serde::Deserialize;
use std::fs;

use crate::runner::CliError;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "detype.config.json";

/// Contents of `detype.config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetypeConfig {
    /// Remove `@ts-ignore` and `@ts-expect-error` comments.
    pub remove_ts_comments: bool,

    /// Options passed to prettier.
    pub prettier_options: FormatOptions,

    /// Glob patterns to ignore when walking a directory.
    pub ignore: Vec<String>,
}

impl DetypeConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| CliError::Config {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }

    /// Loads `detype.config.json` from `dir`, if there is one.
    pub fn find(dir: &Utf8Path) -> Result<Option<(Utf8PathBuf, Self)>, CliError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(|config| Some((path, config)))
    }
}
