use crate::core::{interfaces::*, models::*};
use crate::infrastructure::{FrameworkPolyfills, FsEnvironmentProbe, ModuleLocator, NodeMonorepoHelper};
use crate::utils::{ConfigError, Logger, Result, Settings, Timer};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub const INITIALIZE_CORE: &str = "./Libraries/Core/InitializeCore";
pub const HASTE_IMPL: &str = "./jest/hasteImpl";
pub const ASSET_REGISTRY: &str = "./Libraries/Image/AssetRegistry";

static CONFIG: OnceCell<BundlerConfig> = OnceCell::new();

/// Assembles the bundler configuration for the framework checkout at `config_dir`
pub struct ConfigBuilder {
    config_dir: PathBuf,
    package_name: String,
    locator: ModuleLocator,
    probe: Arc<dyn EnvironmentProbe>,
    polyfills: Arc<dyn PolyfillProvider>,
    helper: Arc<dyn MonorepoHelper>,
}

impl ConfigBuilder {
    /// Builder wired to the real filesystem probe, polyfill list and Node helper
    pub fn new(settings: &Settings) -> Self {
        let locator = ModuleLocator::new(&settings.config_dir);

        Self {
            config_dir: settings.config_dir.clone(),
            package_name: settings.package_name.clone(),
            probe: Arc::new(FsEnvironmentProbe::new(
                &settings.config_dir,
                &settings.helper_script,
                settings.probe_policy,
            )),
            polyfills: Arc::new(FrameworkPolyfills::new(locator.clone())),
            helper: Arc::new(NodeMonorepoHelper::new(&settings.node_binary)),
            locator,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn EnvironmentProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_polyfills(mut self, polyfills: Arc<dyn PolyfillProvider>) -> Self {
        self.polyfills = polyfills;
        self
    }

    pub fn with_helper(mut self, helper: Arc<dyn MonorepoHelper>) -> Self {
        self.helper = helper;
        self
    }

    /// Probe once and produce the configuration for whichever branch applies
    pub fn build(&self) -> Result<BundlerConfig> {
        let _timer = Timer::start("bundler config");

        let environment = self.probe.probe()?;
        Logger::environment_detected(environment.label());

        let config = match &environment {
            Environment::Standalone => self.build_standalone()?,
            Environment::Monorepo { helper_script } => {
                let partial = self.build_partial()?;
                self.helper.create_config(helper_script, &partial)?
            }
        };

        Logger::config_ready(environment.label(), config.serializer.get_polyfills().len());
        Ok(config)
    }

    /// Complete configuration for a checkout outside the shared-tooling repo
    pub fn build_standalone(&self) -> Result<BundlerConfig> {
        let mut resolver = self.resolver_config()?;
        resolver.platforms = Some(Platform::PRIORITY.to_vec());

        Ok(BundlerConfig {
            extra_node_modules: self.extra_node_modules(),
            serializer: self.serializer_config()?,
            resolver,
            transformer: self.transformer_config()?,
            roots: None,
            project_root: None,
            extra: ExtraFields::new(),
        })
    }

    /// Input for the monorepo helper; platforms are left to the helper
    pub fn build_partial(&self) -> Result<PartialBundlerConfig> {
        Ok(PartialBundlerConfig {
            extra_node_modules: self.extra_node_modules(),
            roots: vec![self.config_dir.clone()],
            project_root: self.config_dir.clone(),
            serializer: self.serializer_config()?,
            resolver: self.resolver_config()?,
            transformer: self.transformer_config()?,
        })
    }

    // Imports of the framework package from inside its own tree must hit
    // these sources, never a second installed copy.
    fn extra_node_modules(&self) -> BTreeMap<String, PathBuf> {
        BTreeMap::from([(self.package_name.clone(), self.config_dir.clone())])
    }

    fn serializer_config(&self) -> Result<SerializerConfig> {
        let initialize_core = self.locator.resolve(INITIALIZE_CORE)?;
        let polyfills = self.polyfills.list()?;

        Ok(SerializerConfig::new(vec![initialize_core], polyfills))
    }

    fn resolver_config(&self) -> Result<ResolverConfig> {
        Ok(ResolverConfig {
            haste_impl_module_path: self.locator.resolve(HASTE_IMPL)?,
            platforms: None,
            extra: ExtraFields::new(),
        })
    }

    fn transformer_config(&self) -> Result<TransformerConfig> {
        Ok(TransformerConfig::new(self.locator.resolve(ASSET_REGISTRY)?))
    }
}

/// Build the process-wide configuration. Fails if it was already built.
///
/// Concurrent callers block while one of them builds; the probe and the
/// helper run at most once. A failed build leaves the slot empty.
pub fn initialize(builder: &ConfigBuilder) -> Result<&'static BundlerConfig> {
    let mut built_here = false;
    let config = CONFIG.get_or_try_init(|| {
        built_here = true;
        builder.build()
    })?;

    if !built_here {
        return Err(ConfigError::AlreadyInitialized);
    }
    Ok(config)
}

/// The configuration stored by [`initialize`], if it has run
pub fn current() -> Option<&'static BundlerConfig> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::StaticPolyfills;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    struct FixedProbe(Environment);

    impl EnvironmentProbe for FixedProbe {
        fn probe(&self) -> Result<Environment> {
            Ok(self.0.clone())
        }
    }

    /// Records each partial it receives and answers with a canned config
    struct RecordingHelper {
        calls: Mutex<Vec<(PathBuf, PartialBundlerConfig)>>,
        response: BundlerConfig,
    }

    impl MonorepoHelper for RecordingHelper {
        fn create_config(&self, script: &Path, partial: &PartialBundlerConfig) -> Result<BundlerConfig> {
            self.calls
                .lock()
                .unwrap()
                .push((script.to_path_buf(), partial.clone()));
            Ok(self.response.clone())
        }
    }

    fn framework_tree() -> (TempDir, Settings) {
        let dir = tempdir().unwrap();
        for file in [
            "Libraries/Core/InitializeCore.js",
            "Libraries/Image/AssetRegistry.js",
            "jest/hasteImpl.js",
        ] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let settings = Settings::for_dir(dir.path()).unwrap();
        (dir, settings)
    }

    fn builder(settings: &Settings, environment: Environment) -> ConfigBuilder {
        ConfigBuilder::new(settings)
            .with_probe(Arc::new(FixedProbe(environment)))
            .with_polyfills(Arc::new(StaticPolyfills(vec![
                "polyfill-a".to_string(),
                "polyfill-b".to_string(),
            ])))
    }

    #[test]
    fn test_standalone_branch() {
        let (_dir, settings) = framework_tree();
        let config = builder(&settings, Environment::Standalone).build().unwrap();

        assert_eq!(config.alias_for("react-native"), Some(settings.config_dir.as_path()));
        assert_eq!(config.resolver.platforms.as_deref(), Some(&Platform::PRIORITY[..]));
        assert_eq!(
            config.serializer.get_modules_run_before_main_module(),
            &[settings.config_dir.join("Libraries/Core/InitializeCore.js")]
        );
        assert_eq!(config.serializer.get_polyfills(), &["polyfill-a", "polyfill-b"]);
        assert!(config.resolver.haste_impl_module_path.is_file());
        assert!(config.transformer.asset_registry_path.is_file());
        assert_eq!(config.roots, None);
        assert_eq!(config.project_root, None);
    }

    #[test]
    fn test_monorepo_branch_returns_helper_output() {
        let (_dir, settings) = framework_tree();
        let mut response = builder(&settings, Environment::Standalone).build_standalone().unwrap();
        response.resolver.platforms = Some(vec![Platform::Android]);
        response.extra.insert("watchFolders".to_string(), serde_json::json!(["/repo/common"]));

        let helper = Arc::new(RecordingHelper {
            calls: Mutex::new(Vec::new()),
            response: response.clone(),
        });
        let script = PathBuf::from("/repo/scripts/metro-resources.js");
        let config = builder(&settings, Environment::Monorepo { helper_script: script.clone() })
            .with_helper(helper.clone())
            .build()
            .unwrap();

        assert_eq!(config, response);

        let calls = helper.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (called_script, partial) = &calls[0];
        assert_eq!(called_script, &script);
        assert_eq!(partial.roots, vec![settings.config_dir.clone()]);
        assert_eq!(partial.project_root, settings.config_dir);
        assert_eq!(partial.resolver.platforms, None);
        assert_eq!(partial.serializer.get_polyfills(), &["polyfill-a", "polyfill-b"]);
    }

    #[test]
    fn test_missing_fixed_module_aborts() {
        let (dir, settings) = framework_tree();
        fs::remove_file(dir.path().join("Libraries/Image/AssetRegistry.js")).unwrap();

        let err = builder(&settings, Environment::Standalone).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ModuleNotFound { ref request, .. } if request == ASSET_REGISTRY
        ));
    }

    #[test]
    fn test_helper_not_called_when_partial_fails() {
        let (dir, settings) = framework_tree();
        fs::remove_file(dir.path().join("jest/hasteImpl.js")).unwrap();

        let helper = Arc::new(RecordingHelper {
            calls: Mutex::new(Vec::new()),
            response: placeholder_config(),
        });
        let result = builder(
            &settings,
            Environment::Monorepo {
                helper_script: PathBuf::from("/repo/scripts/metro-resources.js"),
            },
        )
        .with_helper(helper.clone())
        .build();

        assert!(result.is_err());
        assert!(helper.calls.lock().unwrap().is_empty());
    }

    fn placeholder_config() -> BundlerConfig {
        BundlerConfig {
            extra_node_modules: BTreeMap::new(),
            serializer: SerializerConfig::new(Vec::new(), Vec::new()),
            resolver: ResolverConfig {
                haste_impl_module_path: PathBuf::new(),
                platforms: None,
                extra: ExtraFields::new(),
            },
            transformer: TransformerConfig::new(PathBuf::new()),
            roots: None,
            project_root: None,
            extra: ExtraFields::new(),
        }
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let (_dir, settings) = framework_tree();
        let first = builder(&settings, Environment::Standalone).build().unwrap();
        let second = builder(&settings, Environment::Standalone).build().unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
