use crate::core::{interfaces::EnvironmentProbe, models::Environment};
use crate::utils::{ConfigError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Helper script probed for, relative to the config directory
pub const DEFAULT_HELPER_SCRIPT: &str = "../../scripts/metro-resources.js";

/// How filesystem errors other than "not found" are treated while probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Anything but `NotFound` aborts startup.
    #[default]
    Strict,
    /// Every error reads as "absent" and selects the standalone branch.
    Lenient,
}

/// Checks for the monorepo helper script next to the framework checkout.
///
/// Only a regular file counts as present; a directory at the probed path is
/// reported as standalone.
pub struct FsEnvironmentProbe {
    target: PathBuf,
    policy: ProbePolicy,
}

impl FsEnvironmentProbe {
    pub fn new(config_dir: &Path, helper_script: &str, policy: ProbePolicy) -> Self {
        Self {
            target: config_dir.join(helper_script),
            policy,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl EnvironmentProbe for FsEnvironmentProbe {
    fn probe(&self) -> Result<Environment> {
        Logger::probing(&self.target);

        match std::fs::metadata(&self.target) {
            Ok(meta) if meta.is_file() => Ok(Environment::Monorepo {
                helper_script: self.target.clone(),
            }),
            Ok(_) => {
                Logger::debug(&format!(
                    "{} exists but is not a file, treating as absent",
                    self.target.display()
                ));
                Ok(Environment::Standalone)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Environment::Standalone),
            Err(e) => match self.policy {
                ProbePolicy::Strict => Err(ConfigError::Probe {
                    path: self.target.clone(),
                    source: e,
                }),
                ProbePolicy::Lenient => {
                    Logger::warn(&format!(
                        "Could not probe {} ({}), assuming standalone",
                        self.target.display(),
                        e
                    ));
                    Ok(Environment::Standalone)
                }
            },
        }
    }
}
