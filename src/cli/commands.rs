use crate::core::{initialize, BundlerConfig, ConfigBuilder, EnvironmentProbe};
use crate::infrastructure::{FsEnvironmentProbe, ProbePolicy};
use crate::utils::{ConfigLoader, Logger, Result, Settings, SettingsOverrides};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rn-bundler-config")]
#[command(about = "Resolve the bundler configuration for a framework checkout")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved configuration as JSON
    Resolve {
        #[command(flatten)]
        target: TargetArgs,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show which environment the checkout is in
    Probe {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show a readable summary of the resolved configuration
    Info {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Framework source directory the configuration belongs to
    #[arg(short = 'd', long, default_value = ".")]
    pub config_dir: PathBuf,
    /// Package name aliased to the config directory
    #[arg(long)]
    pub package_name: Option<String>,
    /// Helper script to probe for, relative to the config directory
    #[arg(long)]
    pub helper_script: Option<String>,
    /// Node executable used to run the helper
    #[arg(long)]
    pub node: Option<PathBuf>,
    /// Treat probe errors as "helper absent" instead of failing
    #[arg(long)]
    pub lenient_probe: bool,
}

impl TargetArgs {
    fn settings(&self) -> Result<Settings> {
        let overrides = SettingsOverrides {
            package_name: self.package_name.clone(),
            helper_script: self.helper_script.clone(),
            node_binary: self.node.clone(),
            probe_policy: self.lenient_probe.then_some(ProbePolicy::Lenient),
        };
        ConfigLoader::load(&self.config_dir, overrides)
    }
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Resolve { target, pretty } => self.handle_resolve_command(&target, pretty),
            Commands::Probe { target } => self.handle_probe_command(&target),
            Commands::Info { target } => self.handle_info_command(&target),
        }
    }

    fn resolve(&self, target: &TargetArgs) -> Result<&'static BundlerConfig> {
        let settings = target.settings()?;
        initialize(&ConfigBuilder::new(&settings))
    }

    fn handle_resolve_command(&self, target: &TargetArgs, pretty: bool) -> Result<()> {
        let config = self.resolve(target)?;

        let json = if pretty {
            serde_json::to_string_pretty(config)?
        } else {
            serde_json::to_string(config)?
        };
        println!("{}", json);
        Ok(())
    }

    fn handle_probe_command(&self, target: &TargetArgs) -> Result<()> {
        let settings = target.settings()?;
        let probe = FsEnvironmentProbe::new(
            &settings.config_dir,
            &settings.helper_script,
            settings.probe_policy,
        );
        let environment = probe.probe()?;

        println!("{}", environment.label());
        Ok(())
    }

    fn handle_info_command(&self, target: &TargetArgs) -> Result<()> {
        let config = self.resolve(target)?;

        println!("\n  {}", "Bundler configuration".bright_cyan().bold());
        println!();
        for (package, dir) in &config.extra_node_modules {
            println!("  {} {} -> {}", "alias".bright_black(), package.bright_white(), dir.display());
        }
        for module in config.serializer.get_modules_run_before_main_module() {
            println!("  {} {}", "before main".bright_black(), module.display());
        }
        println!(
            "  {} {}",
            "polyfills".bright_black(),
            config.serializer.get_polyfills().len()
        );
        println!(
            "  {} {}",
            "haste impl".bright_black(),
            config.resolver.haste_impl_module_path.display()
        );
        match &config.resolver.platforms {
            Some(platforms) => {
                let names: Vec<&str> = platforms.iter().map(|p| p.as_str()).collect();
                println!("  {} {}", "platforms".bright_black(), names.join(", "));
            }
            None => println!("  {} {}", "platforms".bright_black(), "(helper default)".yellow()),
        }
        println!(
            "  {} {}",
            "asset registry".bright_black(),
            config.transformer.asset_registry_path.display()
        );
        if let Some(roots) = &config.roots {
            for root in roots {
                println!("  {} {}", "root".bright_black(), root.display());
            }
        }
        println!();
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
