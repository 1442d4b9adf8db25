// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! `slim-rs.toml` loading. Every binary owns one `[<name>]` section of the
//! shared file.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "slim-rs.toml";
const CONFIG_DIR_NAME: &str = "slim-rs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Config file {} has no [{section}] section", path.display())]
    MissingSection { path: PathBuf, section: &'static str },
}

/// Default locations, most specific first: working directory, the user
/// config directory, then `/etc`.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths.push(Path::new("/etc").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    paths
}

fn read_section<T: DeserializeOwned>(
    path: &Path,
    section: &str,
) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
    match table.remove(section) {
        Some(value) => value
            .try_into()
            .map(Some)
            .map_err(|e: toml::de::Error| parse_error(format!("[{}]: {}", section, e))),
        None => Ok(None),
    }
}

/// A configuration stored as one section of `slim-rs.toml`.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section name, e.g. `"slim-bridge"`.
    const SECTION: &'static str;

    /// Load the section from `path`; the section must be present.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        read_section(path, Self::SECTION)?.ok_or_else(|| ConfigError::MissingSection {
            path: path.to_path_buf(),
            section: Self::SECTION,
        })
    }

    /// Load the section from the first existing file in `paths` that has
    /// it. Files without the section are skipped.
    fn load_from_paths(paths: &[PathBuf]) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        for path in paths.iter().filter(|path| path.exists()) {
            if let Some(cfg) = read_section(path, Self::SECTION)? {
                return Ok(Some((cfg, path.clone())));
            }
        }
        Ok(None)
    }

    /// [`ConfigFile::load_from_paths`] over [`search_paths`], falling back
    /// to the defaults when no file has the section.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Ok(match Self::load_from_paths(&search_paths())? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Self::default(), None),
        })
    }
}
