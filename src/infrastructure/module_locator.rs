use crate::utils::{ConfigError, Logger, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = [".js", ".json", ".node"];
const INDEX_FILES: [&str; 2] = ["index.js", "index.json"];

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    main: Option<String>,
}

/// `require.resolve` for requests made from the framework's own directory
#[derive(Debug, Clone)]
pub struct ModuleLocator {
    base_dir: PathBuf,
}

impl ModuleLocator {
    /// `base_dir` should already be absolute; resolved paths inherit it.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve `request` (e.g. `./Libraries/Core/InitializeCore`) to an existing file
    pub fn resolve(&self, request: &str) -> Result<PathBuf> {
        let candidate = self.base_dir.join(request.trim_start_matches("./"));

        let resolved = Self::resolve_as_file(&candidate)
            .or_else(|| Self::resolve_as_directory(&candidate))
            .ok_or_else(|| ConfigError::module_not_found(request, &self.base_dir))?;

        Logger::module_resolved(request, &resolved);
        Ok(resolved)
    }

    fn resolve_as_file(path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        // Appended, not substituted: `Object.es6` must become `Object.es6.js`
        EXTENSIONS.iter().find_map(|ext| {
            let mut name = OsString::from(path.as_os_str());
            name.push(ext);
            let with_ext = PathBuf::from(name);
            with_ext.is_file().then_some(with_ext)
        })
    }

    fn resolve_as_directory(path: &Path) -> Option<PathBuf> {
        if !path.is_dir() {
            return None;
        }

        let manifest = path.join("package.json");
        if let Some(main) = Self::read_main_field(&manifest) {
            let entry = path.join(main);
            if let Some(resolved) =
                Self::resolve_as_file(&entry).or_else(|| Self::resolve_index(&entry))
            {
                return Some(resolved);
            }
        }

        Self::resolve_index(path)
    }

    fn resolve_index(dir: &Path) -> Option<PathBuf> {
        INDEX_FILES
            .iter()
            .map(|index| dir.join(index))
            .find(|index| index.is_file())
    }

    fn read_main_field(manifest: &Path) -> Option<String> {
        let content = std::fs::read_to_string(manifest).ok()?;
        let package: PackageJson = serde_json::from_str(&content).ok()?;
        package.main
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_resolves_with_appended_extension() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Libraries/polyfills/Object.es6.js"));

        let locator = ModuleLocator::new(dir.path());
        assert_eq!(
            locator.resolve("./Libraries/polyfills/Object.es6").unwrap(),
            dir.path().join("Libraries/polyfills/Object.es6.js")
        );
    }

    #[test]
    fn test_exact_file_wins() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("jest/hasteImpl"));
        touch(&dir.path().join("jest/hasteImpl.js"));

        let locator = ModuleLocator::new(dir.path());
        assert_eq!(
            locator.resolve("./jest/hasteImpl").unwrap(),
            dir.path().join("jest/hasteImpl")
        );
    }

    #[test]
    fn test_directory_main_and_index() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("with-main/lib/entry.js"));
        fs::write(
            dir.path().join("with-main/package.json"),
            r#"{ "main": "lib/entry" }"#,
        )
        .unwrap();
        touch(&dir.path().join("with-index/index.js"));

        let locator = ModuleLocator::new(dir.path());
        assert_eq!(
            locator.resolve("./with-main").unwrap(),
            dir.path().join("with-main/lib/entry.js")
        );
        assert_eq!(
            locator.resolve("./with-index").unwrap(),
            dir.path().join("with-index/index.js")
        );
    }

    #[test]
    fn test_main_naming_a_directory_uses_its_index() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("asset-registry/lib/index.js"));
        touch(&dir.path().join("asset-registry/index.js"));
        fs::write(
            dir.path().join("asset-registry/package.json"),
            r#"{ "main": "lib" }"#,
        )
        .unwrap();

        let locator = ModuleLocator::new(dir.path());
        assert_eq!(
            locator.resolve("./asset-registry").unwrap(),
            dir.path().join("asset-registry/lib/index.js")
        );
    }

    #[test]
    fn test_missing_module_is_an_error() {
        let dir = tempdir().unwrap();
        let locator = ModuleLocator::new(dir.path());

        let err = locator.resolve("./Libraries/Image/AssetRegistry").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ModuleNotFound { ref request, .. } if request == "./Libraries/Image/AssetRegistry"
        ));
    }
}
