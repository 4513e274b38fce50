//! Subtree library configuration and loaders.
use std::env;

/// Configuration for a [`SubtreeLibrary`](crate::SubtreeLibrary).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LibraryConfig {
    /// How many eager inclusions may nest inside one resolution before it
    /// is rejected. Guards archetypes that (indirectly) include themselves.
    pub max_include_depth: usize,
}

impl LibraryConfig {
    pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

    pub const fn new(max_include_depth: usize) -> Self {
        Self { max_include_depth }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BT_MAX_INCLUDE_DEPTH` - Maximum eager inclusion depth (default: 32)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(depth) = read_var::<usize>(&lookup, "BT_MAX_INCLUDE_DEPTH") {
            config.max_include_depth = depth;
        }

        config
    }

    /// Load configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    #[cfg(feature = "loaders")]
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
        let config: LibraryConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse library config TOML: {}", e))?;

        Ok(config)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_INCLUDE_DEPTH)
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
