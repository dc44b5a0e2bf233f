use crate::core::{interfaces::MonorepoHelper, models::*};
use crate::utils::{ConfigError, Logger, Result, Timer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs `createConfig` from the helper script given as the first argument.
///
/// Only the two serializer thunks are evaluated. RegExp values become
/// `{ source, flags }`; any other function-valued field cannot cross the
/// process boundary, so the bridge names it on stderr and exits with 2.
/// Stdout carries nothing but the result: helper output is sent to stderr.
const BRIDGE: &str = r#"
const emit = process.stdout.write.bind(process.stdout);
process.stdout.write = process.stderr.write.bind(process.stderr);
for (const level of ['log', 'info', 'debug']) {
  console[level] = console.error.bind(console);
}

function encode(value, path, unrepresentable) {
  if (typeof value === 'function') {
    unrepresentable.push(path);
    return undefined;
  }
  if (value instanceof RegExp) {
    return { source: value.source, flags: value.flags };
  }
  if (Array.isArray(value)) {
    return value.map((item, i) => encode(item, `${path}[${i}]`, unrepresentable));
  }
  if (value !== null && typeof value === 'object') {
    const out = {};
    for (const [key, item] of Object.entries(value)) {
      const encoded = encode(item, path ? `${path}.${key}` : key, unrepresentable);
      if (encoded !== undefined) {
        out[key] = encoded;
      }
    }
    return out;
  }
  return value;
}

function settle(serializer, key) {
  return typeof serializer[key] === 'function' ? serializer[key]() : serializer[key];
}

let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => { input += chunk; });
process.stdin.on('end', async () => {
  try {
    const helper = require(process.argv[1]);
    const partial = JSON.parse(input);
    const modules = partial.serializer.getModulesRunBeforeMainModule;
    const polyfills = partial.serializer.getPolyfills;
    partial.serializer.getModulesRunBeforeMainModule = () => modules;
    partial.serializer.getPolyfills = () => polyfills;

    const config = await helper.createConfig(partial);
    const serializer = config.serializer || {};
    const settled = {
      ...config,
      serializer: {
        ...serializer,
        getModulesRunBeforeMainModule: settle(serializer, 'getModulesRunBeforeMainModule'),
        getPolyfills: settle(serializer, 'getPolyfills'),
      },
    };

    const unrepresentable = [];
    const encoded = encode(settled, '', unrepresentable);
    if (unrepresentable.length > 0) {
      console.error(`cannot represent function-valued fields: ${unrepresentable.join(', ')}`);
      process.exitCode = 2;
      return;
    }
    emit(JSON.stringify(encoded));
  } catch (err) {
    console.error((err && err.stack) || String(err));
    process.exitCode = 1;
  }
});
"#;

/// Runs the shared-tooling helper script under Node
pub struct NodeMonorepoHelper {
    node_binary: PathBuf,
}

impl NodeMonorepoHelper {
    pub fn new(node_binary: impl Into<PathBuf>) -> Self {
        Self {
            node_binary: node_binary.into(),
        }
    }
}

impl MonorepoHelper for NodeMonorepoHelper {
    fn create_config(&self, script: &Path, partial: &PartialBundlerConfig) -> Result<BundlerConfig> {
        let _timer = Timer::start("monorepo helper");

        if !script.is_file() {
            return Err(ConfigError::module_not_found(
                &script.to_string_lossy(),
                script.parent().unwrap_or(script),
            ));
        }
        // require() needs an absolute path or it resolves against the bridge
        let script = script.canonicalize()?;
        Logger::delegating(&script);

        let input = serde_json::to_vec(partial)?;

        let mut child = Command::new(&self.node_binary)
            .arg("-e")
            .arg(BRIDGE)
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ConfigError::helper(format!(
                    "failed to start {}: {}",
                    self.node_binary.display(),
                    e
                ))
            })?;

        // A helper that dies on load closes stdin early; its exit status says why
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&input) {
                Logger::debug(&format!("Helper stdin closed early: {}", e));
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ConfigError::helper(format!(
                "{} exited with {}: {}",
                script.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let logged = String::from_utf8_lossy(&output.stderr);
        if !logged.trim().is_empty() {
            Logger::debug(&format!("Helper output: {}", logged.trim()));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            ConfigError::helper(format!("createConfig returned an unusable config: {}", e))
        })
    }
}
