//! User configuration
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/tracetty/config.toml` on Linux). Every field in the file is
//! optional; whatever is present is merged over [`Config::default`].
//!
//! ```toml
//! backend_url = "http://localhost:8000"
//! language = "python"
//! speed_ms = 500
//! request_timeout_secs = 30
//!
//! [generator]
//! array_size = 10
//! array_kind = "sorted"
//! graph_nodes = 6
//! directed = false
//! traversal = "dfs"
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::generator::{ArrayKind, TraversalFamily};
use crate::playback::DEFAULT_SPEED_MS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const APP_DIR: &str = "tracetty";

/// Platform config file location
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Directory for logs and other runtime files
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".tracetty"))
}

pub fn log_file_path() -> PathBuf {
    data_dir().join("logs").join("tracetty.log")
}

/// Defaults for the test input generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub array_size: usize,
    pub array_kind: ArrayKind,
    pub graph_nodes: usize,
    pub directed: bool,
    pub traversal: TraversalFamily,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            array_size: 10,
            array_kind: ArrayKind::Sorted,
            graph_nodes: 6,
            directed: false,
            traversal: TraversalFamily::Dfs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub language: String,
    pub speed_ms: u64,
    pub request_timeout: Duration,
    pub generator: GeneratorSettings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: "http://localhost:8000".to_string(),
            language: "python".to_string(),
            speed_ms: DEFAULT_SPEED_MS,
            request_timeout: Duration::from_secs(30),
            generator: GeneratorSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlGeneratorConfig {
    array_size: Option<usize>,
    array_kind: Option<ArrayKind>,
    graph_nodes: Option<usize>,
    directed: Option<bool>,
    traversal: Option<TraversalFamily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    backend_url: Option<String>,
    language: Option<String>,
    speed_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    generator: Option<TomlGeneratorConfig>,
}

impl Config {
    /// Load from the platform config path, falling back to defaults when the
    /// file is missing or invalid
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TomlConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Config::default().merge(file)
    }

    fn merge(mut self, file: TomlConfig) -> ConfigResult<Self> {
        if let Some(url) = file.backend_url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue("backend_url is empty".into()));
            }
            self.backend_url = url;
        }
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(speed) = file.speed_ms {
            self.speed_ms = speed;
        }
        if let Some(secs) = file.request_timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidValue(
                    "request_timeout_secs must be positive".into(),
                ));
            }
            self.request_timeout = Duration::from_secs(secs);
        }

        if let Some(generator) = file.generator {
            let g = &mut self.generator;
            if let Some(size) = generator.array_size {
                g.array_size = size;
            }
            if let Some(kind) = generator.array_kind {
                g.array_kind = kind;
            }
            if let Some(nodes) = generator.graph_nodes {
                g.graph_nodes = nodes;
            }
            if let Some(directed) = generator.directed {
                g.directed = directed;
            }
            if let Some(traversal) = generator.traversal {
                g.traversal = traversal;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let (_dir, path) = write(
            r#"
backend_url = "http://trace.local:9000"
speed_ms = 250

[generator]
array_kind = "random"
directed = true
"#,
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url, "http://trace.local:9000");
        assert_eq!(config.speed_ms, 250);
        assert_eq!(config.language, "python");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.generator.array_kind, ArrayKind::Random);
        assert!(config.generator.directed);
        assert_eq!(config.generator.graph_nodes, 6);
        assert_eq!(config.generator.traversal, TraversalFamily::Dfs);
    }

    #[test]
    fn empty_file_is_default() {
        let (_dir, path) = write("");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        let (_dir, path) = write("request_timeout_secs = 0\n");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));

        let (_dir, path) = write("[generator]\ntraversal = \"astar\"\n");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));

        let (_dir, path) = write("colour = \"red\"\n");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load_from(Path::new("/no/such/tracetty.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
