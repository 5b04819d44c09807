use covenant_compiler_html::CompileOptions;
use covenant_layout::{EstimatorMetrics, HeuristicEstimator, PageGeometry, Paginator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "covenant.config.json";

/// Covenant configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Document kind used by `init` when none is given
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Height estimator constants
    #[serde(default)]
    pub estimator: EstimatorMetrics,

    /// Page capacities
    #[serde(default)]
    pub geometry: PageGeometry,

    /// HTML output options
    #[serde(default)]
    pub html: CompileOptions,
}

fn default_kind() -> String {
    "other".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn paginator(&self) -> Paginator<HeuristicEstimator> {
        Paginator::with_estimator(HeuristicEstimator::new(self.estimator), self.geometry)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            estimator: EstimatorMetrics::default(),
            geometry: PageGeometry::default(),
            html: CompileOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "kind": "lease",
            "geometry": { "firstPageCapacity": 500 },
            "html": { "pretty": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.kind, "lease");
        assert_eq!(config.geometry.first_page_capacity, 500);
        assert_eq!(config.geometry.page_capacity, 950);
        assert!(!config.html.pretty);
        assert_eq!(config.html.indent, "  ");
        assert_eq!(config.estimator, EstimatorMetrics::default());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.kind, "other");
        assert_eq!(config.geometry, PageGeometry::default());
        assert!(config.html.pretty);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.kind, "other");
    }
}
