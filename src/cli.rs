use std::path::{Path, PathBuf};

mod shell;
mod table;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use oni_planner::{Catalog, Config};
use shell::Shell;

/// Settings file read from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "oni-planner.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Path to a settings file [default: oni-planner.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        tracing::debug!(?config, "loaded configuration");

        let catalog = catalog_for(&config);

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        Shell::new(stdin.lock(), stdout.lock(), &catalog, &config).run()?;
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout belongs to the menu
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads the settings file.
///
/// An explicitly named file must exist. The default file is optional.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let (path, required) = path.map_or((Path::new(DEFAULT_CONFIG), false), |path| (path, true));
    if !required && !path.exists() {
        return Ok(Config::default());
    }

    Config::load(path).with_context(|| format!("failed to load settings from {}", path.display()))
}

fn catalog_for(config: &Config) -> Catalog {
    Catalog::builtin()
        .clone()
        .with_daily_need(config.daily_calories())
}
