use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Install the stderr subscriber. Safe to call more than once.
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rn_bundler_config=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn probing(target: &Path) {
        debug!("🔍 Probing for monorepo helper: {}", target.display());
    }

    pub fn environment_detected(label: &str) {
        info!("🧭 Environment: {}", label);
    }

    pub fn module_resolved(request: &str, resolved: &Path) {
        debug!("📦 {} -> {}", request, resolved.display());
    }

    pub fn delegating(script: &Path) {
        info!("🔗 Delegating final assembly to {}", script.display());
    }

    pub fn config_ready(branch: &str, polyfill_count: usize) {
        info!("✅ Bundler config ready ({} branch, {} polyfills)", branch, polyfill_count);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
