// src/infra/paths.rs — Config file location
//
// VISITLOG_HOME overrides everything. Otherwise the platform config
// directory is used (e.g. ~/.config/visitlog on Linux).

use directories::ProjectDirs;
use std::path::PathBuf;

/// Returns the VISITLOG_HOME override, if set.
fn visitlog_home() -> Option<PathBuf> {
    std::env::var_os("VISITLOG_HOME").map(PathBuf::from)
}

/// Configuration directory, if one can be determined.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = visitlog_home() {
        return Some(home);
    }
    ProjectDirs::from("", "", "visitlog").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default config file path.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
