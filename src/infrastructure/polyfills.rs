use crate::core::interfaces::PolyfillProvider;
use crate::infrastructure::ModuleLocator;
use crate::utils::Result;

/// Polyfills shipped with the framework, in injection order
pub const FRAMEWORK_POLYFILLS: [&str; 8] = [
    "./Libraries/polyfills/Object.es6.js",
    "./Libraries/polyfills/console.js",
    "./Libraries/polyfills/error-guard.js",
    "./Libraries/polyfills/Number.es6.js",
    "./Libraries/polyfills/String.prototype.es6.js",
    "./Libraries/polyfills/Array.prototype.es6.js",
    "./Libraries/polyfills/Array.es6.js",
    "./Libraries/polyfills/Object.es7.js",
];

/// The framework's own polyfill list, resolved to absolute paths
pub struct FrameworkPolyfills {
    locator: ModuleLocator,
}

impl FrameworkPolyfills {
    pub fn new(locator: ModuleLocator) -> Self {
        Self { locator }
    }
}

impl PolyfillProvider for FrameworkPolyfills {
    fn list(&self) -> Result<Vec<String>> {
        FRAMEWORK_POLYFILLS
            .iter()
            .map(|request| {
                self.locator
                    .resolve(request)
                    .map(|path| path.to_string_lossy().into_owned())
            })
            .collect()
    }
}

/// Fixed list of specifiers, passed through as given
#[derive(Debug, Clone, Default)]
pub struct StaticPolyfills(pub Vec<String>);

impl PolyfillProvider for StaticPolyfills {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ConfigError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_framework_polyfills_keep_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Libraries/polyfills")).unwrap();
        for request in FRAMEWORK_POLYFILLS {
            fs::write(dir.path().join(request), "").unwrap();
        }

        let provider = FrameworkPolyfills::new(ModuleLocator::new(dir.path()));
        let listed = provider.list().unwrap();

        assert_eq!(listed.len(), FRAMEWORK_POLYFILLS.len());
        assert!(listed[0].ends_with("Object.es6.js"));
        assert!(listed[1].ends_with("console.js"));
        assert!(listed[7].ends_with("Object.es7.js"));
    }

    #[test]
    fn test_missing_polyfill_fails() {
        let dir = tempdir().unwrap();
        let provider = FrameworkPolyfills::new(ModuleLocator::new(dir.path()));

        assert!(matches!(provider.list(), Err(ConfigError::ModuleNotFound { .. })));
    }
}
