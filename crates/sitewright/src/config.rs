//! Optional `sitewright.toml` configuration.
//!
//! A missing file means defaults; a malformed file is an error. CLI flags
//! override whatever the file provides.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub serve: ServeSection,
    #[serde(default)]
    pub deploy: DeploySection,
}

#[derive(Debug, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_src")]
    pub src: String,
    #[serde(default = "default_dist")]
    pub dist: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            src: default_src(),
            dist: default_dist(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServeSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeploySection {
    /// Publish remote; `remote.origin.url` is detected when unset.
    pub remote: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            remote: None,
            branch: default_branch(),
        }
    }
}

fn default_src() -> String {
    "src".to_string()
}

fn default_dist() -> String {
    "dist".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_branch() -> String {
    sitewright_pipeline::DEFAULT_BRANCH.to_string()
}

/// Load configuration from `path` if it exists.
///
/// Returns an error if the file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load(Path::new("does-not-exist.toml")).unwrap();

        assert_eq!(config.paths.src, "src");
        assert_eq!(config.paths.dist, "dist");
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.deploy.branch, "gh-pages");
        assert!(config.deploy.remote.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sitewright.toml");
        fs::write(
            &path,
            "[paths]\nsrc = \"site\"\n\n[deploy]\nremote = \"git@example.com:site.git\"\n",
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.paths.src, "site");
        assert_eq!(config.paths.dist, "dist");
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.deploy.remote.as_deref(), Some("git@example.com:site.git"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sitewright.toml");
        fs::write(&path, "[paths\nsrc = ").unwrap();

        assert!(load(&path).is_err());
    }
}
