use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::convert::Infallible;

/// Fields the record doesn't model, kept so helper output round-trips untouched.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// Root configuration handed to the bundler.
///
/// `roots` and `project_root` are only present when the configuration came
/// out of the monorepo helper; `resolver.platforms` only in the standalone one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub extra_node_modules: BTreeMap<String, PathBuf>,
    pub serializer: SerializerConfig,
    pub resolver: ResolverConfig,
    pub transformer: TransformerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roots: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl BundlerConfig {
    /// Directory that imports of `package` are redirected to, if aliased.
    pub fn alias_for(&self, package: &str) -> Option<&Path> {
        self.extra_node_modules.get(package).map(PathBuf::as_path)
    }
}

/// What the monorepo helper receives: everything the standalone config has
/// except `resolver.platforms`, plus the search roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBundlerConfig {
    pub extra_node_modules: BTreeMap<String, PathBuf>,
    pub roots: Vec<PathBuf>,
    pub project_root: PathBuf,
    pub serializer: SerializerConfig,
    pub resolver: ResolverConfig,
    pub transformer: TransformerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializerConfig {
    #[serde(rename = "getModulesRunBeforeMainModule")]
    modules_run_before_main_module: Vec<PathBuf>,
    #[serde(rename = "getPolyfills")]
    polyfills: Vec<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl SerializerConfig {
    pub fn new(modules_run_before_main_module: Vec<PathBuf>, polyfills: Vec<String>) -> Self {
        Self {
            modules_run_before_main_module,
            polyfills,
            extra: ExtraFields::new(),
        }
    }

    /// Modules that execute before the application entry point, in order.
    pub fn get_modules_run_before_main_module(&self) -> &[PathBuf] {
        &self.modules_run_before_main_module
    }

    /// Polyfill specifiers exactly as the provider listed them.
    pub fn get_polyfills(&self) -> &[String] {
        &self.polyfills
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    pub haste_impl_module_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ResolverConfig {
    /// First platform in priority order for which a variant is available.
    ///
    /// Returns `None` when no platforms are configured or none match.
    pub fn preferred_platform(&self, available: &[Platform]) -> Option<Platform> {
        self.platforms
            .as_deref()?
            .iter()
            .find(|platform| available.contains(platform))
            .cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerConfig {
    pub asset_registry_path: PathBuf,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl TransformerConfig {
    pub fn new(asset_registry_path: PathBuf) -> Self {
        Self {
            asset_registry_path,
            extra: ExtraFields::new(),
        }
    }
}

/// Platform suffixes the resolver recognizes in file names such as `Button.win32.js`.
///
/// Identifiers outside the standalone set (a helper may list `windows` or
/// `web`) are kept as [`Platform::Other`] and serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Win32,
    Ios,
    Macos,
    Android,
    Uwp,
    Windesktop,
    Other(String),
}

impl Platform {
    /// Standalone resolution priority; earlier entries win.
    pub const PRIORITY: [Platform; 6] = [
        Platform::Win32,
        Platform::Ios,
        Platform::Macos,
        Platform::Android,
        Platform::Uwp,
        Platform::Windesktop,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Win32 => "win32",
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Android => "android",
            Platform::Uwp => "uwp",
            Platform::Windesktop => "windesktop",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        match name.as_str() {
            "win32" => Platform::Win32,
            "ios" => Platform::Ios,
            "macos" => Platform::Macos,
            "android" => Platform::Android,
            "uwp" => Platform::Uwp,
            "windesktop" => Platform::Windesktop,
            _ => Platform::Other(name),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from(s.to_string()))
    }
}

/// Deployment context detected by the probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Standalone,
    Monorepo { helper_script: PathBuf },
}

impl Environment {
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Standalone => "standalone",
            Environment::Monorepo { .. } => "monorepo",
        }
    }
}
