use crate::{
    error::{Error, Result},
    types::MarkerSpec,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: &[&str] = &[".implgen.json", "implgen.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Short name of the marker attribute
    pub marker: String,
    /// Appended to every unit identifier
    pub output_extension: String,
    /// Emit non-async stubs for members whose return type is not Task-like
    /// instead of reporting them
    pub allow_synchronous_members: bool,
    pub parallel: bool,
    /// Extra `simple name → namespace` bindings for types declared outside the sources
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub known_types: BTreeMap<String, String>,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: MarkerSpec::default().short_name().to_string(),
            output_extension: ".g.cs".to_string(),
            allow_synchronous_members: false,
            parallel: false,
            known_types: BTreeMap::new(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 256,
            dir: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    /// Nearest config file above `start_path`, or defaults when there is none
    pub fn load_or_default(start_path: &Path) -> Result<Self> {
        match Self::find_config_file(start_path) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Self::load_from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn marker_spec(&self) -> MarkerSpec {
        MarkerSpec::new(&self.marker)
    }

    pub fn validate(&self) -> Result<()> {
        if self.marker.trim().is_empty() {
            return Err(Error::ConfigError("marker must not be empty".to_string()));
        }
        if !self.output_extension.starts_with('.') {
            return Err(Error::ConfigError(format!(
                "output_extension must start with '.', got {:?}",
                self.output_extension
            )));
        }
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(Error::ConfigError(
                "cache.capacity must be positive when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
