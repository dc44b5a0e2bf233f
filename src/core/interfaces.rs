use crate::core::models::*;
use crate::utils::Result;
use std::path::Path;

/// Decides which deployment context the process runs in
pub trait EnvironmentProbe: Send + Sync {
    fn probe(&self) -> Result<Environment>;
}

/// Ordered polyfill specifiers; later entries may rely on earlier ones
pub trait PolyfillProvider: Send + Sync {
    fn list(&self) -> Result<Vec<String>>;
}

/// Shared-tooling factory that finishes a partial configuration
pub trait MonorepoHelper: Send + Sync {
    fn create_config(&self, script: &Path, partial: &PartialBundlerConfig) -> Result<BundlerConfig>;
}
