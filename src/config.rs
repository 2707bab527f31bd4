//! @ai:module:intent Configuration for documentation generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api DocConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional config file name looked up in the policy directory.
pub const DEFAULT_CONFIG_FILE: &str = "policydoc.toml";

/// @ai:intent Settings for a documentation run
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocConfig {
    /// Destination of the generated document; `-` writes to stdout.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Base URL prefixed to each policy's relative path in source links.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_include_rego")]
    pub include_rego: bool,
    /// Abort the whole run when one policy fails to parse instead of skipping it.
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            url: None,
            include_rego: default_include_rego(),
            fail_on_error: false,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("policies.md")
}

fn default_include_rego() -> bool {
    true
}

impl DocConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// @ai:intent Parse configuration from TOML text
    /// @ai:effects pure
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Source link for a policy at a path relative to the policy root
    /// @ai:example (url=None, "pods/src.rego") -> "pods/src.rego"
    /// @ai:example (url=Some("https://git.example/p/"), "pods/src.rego") -> "https://git.example/p/pods/src.rego"
    /// @ai:effects pure
    pub fn source_url(&self, relative: &Path) -> String {
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match &self.url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), relative),
            None => relative,
        }
    }

    /// @ai:intent Whether the document goes to stdout rather than a file
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = DocConfig::from_toml("").unwrap();
        assert_eq!(config, DocConfig::default());
        assert_eq!(config.output, PathBuf::from("policies.md"));
        assert!(config.include_rego);
        assert!(!config.fail_on_error);
    }

    #[test]
    fn test_partial_toml() {
        let config = DocConfig::from_toml(
            r#"
url = "https://github.com/acme/policies/blob/main"
include_rego = false
"#,
        )
        .unwrap();

        assert_eq!(
            config.url.as_deref(),
            Some("https://github.com/acme/policies/blob/main")
        );
        assert!(!config.include_rego);
        assert_eq!(config.output, PathBuf::from("policies.md"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = DocConfig::from_toml("include_rego = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = DocConfig {
            url: Some("https://example.com".to_string()),
            fail_on_error: true,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(DocConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_source_url() {
        let relative = Path::new("pods").join("src.rego");
        assert_eq!(DocConfig::default().source_url(&relative), "pods/src.rego");

        let config = DocConfig {
            url: Some("https://git.example/p/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.source_url(&relative),
            "https://git.example/p/pods/src.rego"
        );
    }

    #[test]
    fn test_writes_to_stdout() {
        let config = DocConfig {
            output: PathBuf::from("-"),
            ..Default::default()
        };
        assert!(config.writes_to_stdout());
        assert!(!DocConfig::default().writes_to_stdout());
    }
}
