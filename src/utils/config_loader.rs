use crate::infrastructure::{ProbePolicy, DEFAULT_HELPER_SCRIPT};
use crate::utils::{ConfigError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "rn-bundler.json";
pub const DEFAULT_PACKAGE_NAME: &str = "react-native";

/// Settings file format (rn-bundler.json, next to the framework sources)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsFile {
    /// Package name aliased to the config directory (default: "react-native")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// Probed helper script, relative to the config directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_script: Option<String>,

    /// Node executable used to run the helper (default: "node")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_binary: Option<PathBuf>,

    /// "strict" (default) or "lenient"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_policy: Option<ProbePolicy>,
}

/// Values given on the command line; they win over the settings file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub package_name: Option<String>,
    pub helper_script: Option<String>,
    pub node_binary: Option<PathBuf>,
    pub probe_policy: Option<ProbePolicy>,
}

/// Fully merged settings the builder runs with
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Canonical, absolute directory of the framework sources
    pub config_dir: PathBuf,
    pub package_name: String,
    pub helper_script: String,
    pub node_binary: PathBuf,
    pub probe_policy: ProbePolicy,
}

impl Settings {
    /// Defaults for `config_dir`, ignoring any settings file
    pub fn for_dir(config_dir: &Path) -> Result<Self> {
        ConfigLoader::merge(config_dir, None, SettingsOverrides::default())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Read rn-bundler.json from `config_dir` if there is one
    pub fn load_from_file(config_dir: &Path) -> Result<Option<SettingsFile>> {
        let path = config_dir.join(SETTINGS_FILE);

        if !path.is_file() {
            Logger::debug(&format!("No {} found, using defaults", SETTINGS_FILE));
            return Ok(None);
        }

        Logger::debug(&format!("Loading settings from {}", path.display()));

        let content = std::fs::read_to_string(&path)?;
        let file: SettingsFile = serde_json::from_str(&content).map_err(|e| {
            ConfigError::settings(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Some(file))
    }

    /// Load the file from `config_dir` and merge it with `overrides`
    pub fn load(config_dir: &Path, overrides: SettingsOverrides) -> Result<Settings> {
        let file = Self::load_from_file(config_dir)?;
        Self::merge(config_dir, file, overrides)
    }

    /// CLI > settings file > defaults
    pub fn merge(
        config_dir: &Path,
        file: Option<SettingsFile>,
        overrides: SettingsOverrides,
    ) -> Result<Settings> {
        let config_dir = config_dir.canonicalize().map_err(|e| {
            ConfigError::settings(format!(
                "config directory {} is not accessible: {}",
                config_dir.display(),
                e
            ))
        })?;
        let base = file.unwrap_or_default();

        let package_name = overrides
            .package_name
            .or(base.package_name)
            .unwrap_or_else(|| DEFAULT_PACKAGE_NAME.to_string());
        if package_name.trim().is_empty() {
            return Err(ConfigError::settings("packageName must not be empty"));
        }

        Ok(Settings {
            config_dir,
            package_name,
            helper_script: overrides
                .helper_script
                .or(base.helper_script)
                .unwrap_or_else(|| DEFAULT_HELPER_SCRIPT.to_string()),
            node_binary: overrides
                .node_binary
                .or(base.node_binary)
                .unwrap_or_else(|| PathBuf::from("node")),
            probe_policy: overrides
                .probe_policy
                .or(base.probe_policy)
                .unwrap_or_default(),
        })
    }
}
