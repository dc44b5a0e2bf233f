use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed module request did not resolve to anything on disk.
    #[error("Cannot find module '{request}' from {}", .from.display())]
    ModuleNotFound { request: String, from: PathBuf },

    /// The environment probe hit something other than "not found".
    #[error("Failed to probe {}: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Monorepo helper failed: {0}")]
    Helper(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundler configuration was already initialized for this process")]
    AlreadyInitialized,
}

impl ConfigError {
    pub fn module_not_found(request: &str, from: impl Into<PathBuf>) -> Self {
        Self::ModuleNotFound {
            request: request.to_string(),
            from: from.into(),
        }
    }

    pub fn helper(message: impl Into<String>) -> Self {
        Self::Helper(message.into())
    }

    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }

    /// Format error with a hint for the startup failures users hit most
    pub fn format_detailed(&self) -> String {
        match self {
            ConfigError::ModuleNotFound { request, from } => format!(
                "❌ {}\n📁 Config directory: {}\n💡 Is '{}' present in the framework checkout?",
                self,
                from.display(),
                request.trim_start_matches("./")
            ),
            ConfigError::Probe { path, .. } => format!(
                "❌ {}\n💡 Fix the permissions on {} or pass --lenient-probe",
                self,
                path.display()
            ),
            _ => format!("❌ {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        ConfigError::Helper(err.to_string())
    }
}
