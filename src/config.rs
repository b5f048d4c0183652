//! Codec configuration
//!
//! Shared by the reader and the writer. Can be loaded from a YAML file:
//!
//! ```yaml
//! indent: 2
//! dependency_element: dependency
//! self_close: true
//! ```

use crate::{NuspecError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling how manifests are read and written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per nesting level in written XML (0 writes everything on one line)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Element name of each entry inside `<dependencies>`
    #[serde(default = "default_dependency_element")]
    pub dependency_element: String,

    /// Rewrite `<tag></tag>` as `<tag />` after encoding
    #[serde(default = "default_self_close")]
    pub self_close: bool,
}

fn default_indent() -> usize {
    2
}

fn default_dependency_element() -> String {
    "dependency".to_string()
}

fn default_self_close() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            dependency_element: default_dependency_element(),
            self_close: default_self_close(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        tracing::debug!(path = %path.display(), "Loading nuspec configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Check that the configured element names can appear in XML
    pub fn validate(&self) -> Result<()> {
        if !is_xml_name(&self.dependency_element) {
            return Err(NuspecError::Config(format!(
                "Invalid dependency element name: {:?}",
                self.dependency_element
            )));
        }
        Ok(())
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
