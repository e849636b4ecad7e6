//! Persisted CLI state: which graph file `kgl` queries against.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub graph: Option<String>,
}

impl Config {
    fn path() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .context("failed to determine cache directory")?
            .join("kgl");
        Ok(dir.join("current.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn set_graph(path: &str) -> Result<()> {
        let config_path = Self::path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let config = Config {
            graph: Some(path.to_string()),
        };
        let text = serde_json::to_string_pretty(&config)?;
        std::fs::write(&config_path, text)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_graph() {
        assert_eq!(Config::default().graph, None);
    }
}
