use rn_bundler_config::core::interfaces::EnvironmentProbe;
use rn_bundler_config::core::models::Environment;
use rn_bundler_config::core::services::{current, initialize, ConfigBuilder};
use rn_bundler_config::utils::{ConfigError, Result, Settings};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Slow standalone probe that counts how often it runs
struct CountingProbe {
    calls: AtomicUsize,
}

impl EnvironmentProbe for CountingProbe {
    fn probe(&self) -> Result<Environment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok(Environment::Standalone)
    }
}

// Own test binary: the configuration slot is process-wide.
#[test]
fn test_racing_initializers_build_once() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/standalone/react-native");
    let probe = Arc::new(CountingProbe {
        calls: AtomicUsize::new(0),
    });
    let builder = ConfigBuilder::new(&Settings::for_dir(&dir).unwrap()).with_probe(probe.clone());

    let callers = 8;
    let barrier = Barrier::new(callers);
    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    match initialize(&builder) {
                        Ok(_) => true,
                        Err(ConfigError::AlreadyInitialized) => false,
                        Err(other) => panic!("unexpected error: {}", other),
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|won| **won).count(), 1);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    assert!(current().is_some());
}
