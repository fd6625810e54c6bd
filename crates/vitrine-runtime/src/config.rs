use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use vitrine_engine::{Registry, RegistryOptions};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "VITRINE_CONFIG";

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Forward `with` and `default` to list and map elements
    #[serde(default = "default_propagate")]
    pub propagate_to_elements: bool,
}

fn default_propagate() -> bool {
    true
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            propagate_to_elements: default_propagate(),
        }
    }
}

/// Presenter configuration
///
/// ```toml
/// [registry]
/// propagate_to_elements = true
///
/// [aliases]
/// "blog.post" = ["post", "article"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Canonical type tag -> alias names
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `VITRINE_CONFIG` if set, otherwise `vitrine.toml` in the working directory
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn options(&self) -> RegistryOptions {
        RegistryOptions {
            propagate_to_elements: self.registry.propagate_to_elements,
        }
    }

    pub fn set_aliases(&mut self, tag: impl Into<String>, aliases: Vec<String>) {
        self.aliases.insert(tag.into(), aliases);
    }

    /// Register every configured alias on `registry`.
    ///
    /// A table key that is itself listed as an alias elsewhere in the file is
    /// followed to its final tag first, so the result does not depend on the
    /// order in which keys are applied.
    pub fn apply_aliases(&self, registry: &Registry) {
        for (tag, aliases) in &self.aliases {
            let target = self.canonical_tag(tag);
            registry.aliases(target, aliases.iter().map(String::as_str));
        }
    }

    /// Follow configured aliases from `tag` to a tag that is not an alias.
    pub fn canonical_tag<'a>(&'a self, tag: &'a str) -> &'a str {
        let mut current = tag;
        let mut seen = BTreeSet::new();
        while let Some(next) = self.alias_target(current) {
            if !seen.insert(current) {
                tracing::warn!(tag, "alias cycle in presenter config");
                return tag;
            }
            current = next;
        }
        current
    }

    /// Table key listing `alias`; the last key wins, as when applied in order.
    fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases
            .iter()
            .filter(|(_, names)| names.iter().any(|name| name == alias))
            .map(|(tag, _)| tag.as_str())
            .next_back()
    }
}
