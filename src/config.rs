//! Optional configuration file, merged under CLI flags
//!
//! Searched in order: `./.uncloakrc`, `./.uncloak.json`, `~/.uncloakrc`,
//! `~/.uncloak.json`, then the platform config directory
//! (`uncloak/config.json`). A missing file means defaults; a malformed
//! file is a warning, never a fatal error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::{DEFAULT_DEPTH, DEFAULT_WORKERS};

pub fn default_exclude_dirs() -> Vec<String> {
    [".git", "node_modules", "__pycache__", ".venv", "venv"]
        .map(String::from)
        .to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub recursive: bool,
    pub ignore_case: bool,
    pub workers: usize,
    pub depth: usize,
    pub verbose: bool,
    pub context: usize,
    pub before_context: usize,
    pub after_context: usize,
    pub use_regex: bool,
    pub json_output: bool,
    pub exclude_dirs: Vec<String>,
    pub entropy_threshold: f64,
    pub magic_filter: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            ignore_case: false,
            workers: DEFAULT_WORKERS,
            depth: DEFAULT_DEPTH,
            verbose: false,
            context: 0,
            before_context: 10,
            after_context: 30,
            use_regex: false,
            json_output: false,
            exclude_dirs: default_exclude_dirs(),
            entropy_threshold: 0.0,
            magic_filter: Vec::new(),
        }
    }
}

impl FileConfig {
    /// Load from the first config file found, falling back to defaults.
    ///
    /// Runs before logging is initialised, so problems are reported
    /// straight to stderr rather than through `tracing`.
    pub fn load() -> Self {
        let Some(path) = Self::find_file() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "uncloak: ignoring malformed config {}: {err}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("uncloak: could not read config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    fn find_file() -> Option<PathBuf> {
        let mut candidates = vec![PathBuf::from(".uncloakrc"), PathBuf::from(".uncloak.json")];
        if let Some(dirs) = directories::BaseDirs::new() {
            candidates.push(dirs.home_dir().join(".uncloakrc"));
            candidates.push(dirs.home_dir().join(".uncloak.json"));
            candidates.push(dirs.config_dir().join("uncloak").join("config.json"));
        }
        candidates.into_iter().find(|p| p.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_engine() {
        let config = FileConfig::default();
        assert_eq!(config.workers, 10);
        assert_eq!(config.depth, 2);
        assert_eq!(config.before_context, 10);
        assert_eq!(config.after_context, 30);
        assert!(config.exclude_dirs.contains(&".git".to_string()));
    }

    #[test]
    fn partial_json_fills_the_rest_with_defaults() {
        let config: FileConfig =
            serde_json::from_str(r#"{"depth": 4, "exclude_dirs": ["target"]}"#).unwrap();
        assert_eq!(config.depth, 4);
        assert_eq!(config.exclude_dirs, vec!["target".to_string()]);
        assert_eq!(config.workers, 10);
    }
}
