//! Configuration management.
//!
//! Settings are read from a YAML file with a `defaults` section (intensity,
//! worker count, backend) and a `benchmark` section (sizes, worker counts).
//! Missing files or keys fall back to built-in defaults.

mod defaults;

pub use defaults::{default_worker_count, BenchmarkSettings, ProcessingDefaults, MAX_AUTO_WORKERS};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::benchmark::BenchmarkPlan;
use crate::error::{Result, VintageError};

/// Environment variable that points at a config file.
pub const CONFIG_ENV_VAR: &str = "VINTAGE_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["vintage.yml", "vintage.yaml"];

/// Loaded configuration together with where it came from and any problems found.
pub struct ConfigHandle {
    pub config: VintageConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Complete configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VintageConfig {
    pub defaults: ProcessingDefaults,
    pub benchmark: BenchmarkSettings,
}

impl VintageConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self.benchmark.sanitize();
        self
    }

    /// Parse and sanitize a YAML document.
    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<VintageConfig>(contents).map(VintageConfig::sanitize)
    }

    /// Benchmark matrix described by this configuration.
    pub fn benchmark_plan(&self) -> BenchmarkPlan {
        BenchmarkPlan {
            sizes: self.benchmark.sizes.clone(),
            thread_counts: self.benchmark.thread_counts.clone(),
            intensity: self.benchmark.intensity.unwrap_or(self.defaults.intensity),
        }
    }

    /// Commented YAML document holding the built-in defaults.
    pub fn default_yaml() -> Result<String> {
        let body = serde_yaml::to_string(&VintageConfig::default())
            .map_err(|e| VintageError::Encode(format!("failed to serialize config: {}", e)))?;
        Ok(format!(
            "# vintage configuration\n\
             #\n\
             # defaults.threads: omit or null to use the number of CPUs (max {})\n\
             # defaults.backend: native | managed\n\
             # benchmark.intensity: omit to reuse defaults.intensity\n\
             {}",
            MAX_AUTO_WORKERS, body
        ))
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_config(custom_path: Option<&Path>) -> ConfigHandle {
    let mut warnings = Vec::new();

    for candidate in config_candidates(custom_path) {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match VintageConfig::from_yaml(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return ConfigHandle {
                        config,
                        source: Some(source),
                        warnings,
                    };
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No config found; using built-in defaults.".to_string());
    ConfigHandle {
        config: VintageConfig::default(),
        source: None,
        warnings,
    }
}

/// Get list of config file candidates to try, most specific first.
fn config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(dir) = user_config_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(dir.join(name));
        }
    }

    candidates
}

/// `~/vintage`, where `vintage init` writes its file by default.
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("vintage"))
}

static CONFIG_HANDLE: OnceLock<ConfigHandle> = OnceLock::new();
static LOG_CONFIG_ONCE: Once = Once::new();

/// Access the global configuration, loading it on first use.
///
/// `custom_path` only takes effect on the first call.
pub fn config_handle(custom_path: Option<&Path>) -> &'static ConfigHandle {
    CONFIG_HANDLE.get_or_init(|| load_config(custom_path))
}

/// Log the config source and warnings the first time it is requested.
pub fn log_config_usage() {
    LOG_CONFIG_ONCE.call_once(|| {
        let Some(handle) = CONFIG_HANDLE.get() else {
            return;
        };
        match &handle.source {
            Some(source) => info!("Loaded config from {}", source.display()),
            None => info!("Using built-in config defaults"),
        }
        for warning in &handle.warnings {
            warn!("Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::benchmark::ImageSize;

    #[test]
    fn test_defaults() {
        let config = VintageConfig::default();
        assert_eq!(config.defaults.intensity, 0.5);
        assert_eq!(config.defaults.backend, Backend::Native);
        assert!(config.defaults.worker_count() >= 1);
        assert!(config.defaults.worker_count() <= MAX_AUTO_WORKERS);
        let plan = config.benchmark_plan();
        assert_eq!(plan.sizes.len(), 3);
        assert_eq!(plan.thread_counts, vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(plan.intensity, 0.5);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config =
            VintageConfig::from_yaml("defaults:\n  backend: managed\n  threads: 3\n").unwrap();
        assert_eq!(config.defaults.backend, Backend::Managed);
        assert_eq!(config.defaults.worker_count(), 3);
        assert_eq!(config.defaults.intensity, 0.5);
        assert_eq!(config.benchmark, BenchmarkSettings::default());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let yaml = "\
defaults:
  intensity: 4.0
  threads: 0
benchmark:
  sizes:
    - { width: 0, height: 10 }
    - { width: 640, height: 480 }
  thread_counts: [0, 2]
  intensity: -1.0
";
        let config = VintageConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.defaults.intensity, 1.0);
        assert_eq!(config.defaults.threads, Some(1));
        assert_eq!(config.benchmark.sizes, vec![ImageSize::new(640, 480)]);
        assert_eq!(config.benchmark.thread_counts, vec![2]);
        assert_eq!(config.benchmark_plan().intensity, 0.0);
    }

    #[test]
    fn test_empty_lists_fall_back() {
        let config =
            VintageConfig::from_yaml("benchmark:\n  sizes: []\n  thread_counts: []\n").unwrap();
        assert_eq!(config.benchmark, BenchmarkSettings::default());
    }

    #[test]
    fn test_benchmark_intensity_falls_back_to_defaults() {
        let config = VintageConfig::from_yaml("defaults:\n  intensity: 0.8\n").unwrap();
        assert_eq!(config.benchmark_plan().intensity, 0.8);
    }

    #[test]
    fn test_load_from_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "defaults:\n  intensity: 0.25\n").unwrap();

        let handle = load_config(Some(&path));
        assert_eq!(handle.config.defaults.intensity, 0.25);
        assert!(handle.source.is_some());
    }

    #[test]
    fn test_invalid_file_records_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "defaults: [this is not a map").unwrap();

        let handle = load_config(Some(&path));
        assert!(handle
            .warnings
            .iter()
            .any(|w| w.contains("Failed to parse config")));
    }

    #[test]
    fn test_default_yaml_round_trips() {
        let yaml = VintageConfig::default_yaml().unwrap();
        assert!(yaml.starts_with("# vintage configuration"));
        let parsed = VintageConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, VintageConfig::default());
    }
}
