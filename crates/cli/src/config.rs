use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use toolscope_protocol::{parse_json_or_toml, RetrieveOptions};
use toolscope_vector_store::HashingEmbedder;

pub const CONFIG_ENV: &str = "TOOLSCOPE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "toolscope.toml";

/// Settings file for the `toolscope` binary. JSON and TOML are both accepted.
///
/// ```toml
/// catalog = "tools.toml"
/// index_path = ".toolscope/index.json"
/// dimensions = 384
///
/// [retrieval]
/// match_count = 5
/// match_threshold = 0.2
/// strict = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    pub dimensions: usize,
    pub retrieval: RetrieveOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            index_path: None,
            dimensions: HashingEmbedder::DEFAULT_DIMENSION,
            retrieval: RetrieveOptions::default(),
        }
    }
}

impl Config {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = parse_json_or_toml(bytes)?;
        let config: Self = serde_json::from_value(value).context("invalid config")?;
        config.retrieval.validate()?;
        Ok(config)
    }

    /// Reads a config file. Relative paths inside it resolve against the
    /// file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_bytes(&bytes)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.catalog = config.catalog.map(|p| rebase(base, p));
            config.index_path = config.index_path.map(|p| rebase(base, p));
        }
        Ok(config)
    }

    /// Explicit path, then `TOOLSCOPE_CONFIG`, then `./toolscope.toml` when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            log::debug!("Using {DEFAULT_CONFIG_FILE} from the working directory");
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_bytes(b"").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dimensions, 384);
        assert_eq!(config.retrieval.match_count, 12);
    }

    #[test]
    fn parses_toml() {
        let raw = br#"
dimensions = 64

[retrieval]
match_count = 3
strict = true
"#;
        let config = Config::from_bytes(raw).unwrap();
        assert_eq!(config.dimensions, 64);
        assert_eq!(config.retrieval.match_count, 3);
        assert!(config.retrieval.strict);
        assert_eq!(config.retrieval.match_threshold, 0.0);
    }

    #[test]
    fn parses_json() {
        let raw = br#"{"catalog": "tools.json", "retrieval": {"match_threshold": 0.25}}"#;
        let config = Config::from_bytes(raw).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("tools.json")));
        assert_eq!(config.retrieval.match_threshold, 0.25);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_bytes(b"colour = \"blue\"").is_err());
        assert!(Config::from_bytes(b"[retrieval]\nlimit = 3").is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = Config::from_bytes(b"[retrieval]\nmatch_threshold = 1.5").unwrap_err();
        assert!(format!("{err:#}").contains("match_threshold"));
        assert!(Config::from_bytes(b"[retrieval]\nmatch_threshold = nan").is_err());
    }

    #[test]
    fn file_paths_resolve_against_the_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toolscope.toml");
        fs::write(&path, "catalog = \"tools.toml\"\nindex_path = \"/abs/index.json\"").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.catalog, Some(dir.path().join("tools.toml")));
        assert_eq!(config.index_path, Some(PathBuf::from("/abs/index.json")));
    }
}
