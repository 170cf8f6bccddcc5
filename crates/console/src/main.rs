mod commands;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grailtracker_core::{load_config, load_config_from_env, AppContext, Config, ConfigError};

use commands::{execute, render_stats, Command, HELP};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting grailtracker v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("GRAIL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("grailtracker.toml"));

    let config = load_settings(&config_path)?;
    debug!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Effective configuration"
    );

    let mut context = AppContext::from_config(&config).context("Failed to start tracker")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut context, stdin.lock(), stdout.lock())?;

    info!("Shutting down");
    Ok(())
}

/// Load the config file, falling back to defaults plus environment when the
/// file does not exist.
fn load_settings(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            warn!("No config file at {:?}, using defaults", path);
            load_config_from_env().context("Failed to load config from environment")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config from {:?}", path)),
    }
}

/// Read commands line by line until `quit` or end of input.
fn run_session(
    context: &mut AppContext,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    writeln!(output, "{}", render_stats(context))?;
    writeln!(output, "type 'help' for commands")?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{}\n{}", message, HELP)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match execute(context, &command) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => {
                warn!(?command, error = %e, "Command failed");
                writeln!(output, "error: {}", e)?;
            }
        }
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use grailtracker_core::testing::fixtures;
    use tempfile::TempDir;

    fn write_setup(dir: &TempDir) -> PathBuf {
        fs::write(dir.path().join("items.csv"), fixtures::grail_csv()).unwrap();
        let config_path = dir.path().join("grailtracker.toml");
        fs::write(
            &config_path,
            format!(
                "[catalog]\npath = {:?}\n\n[store]\npath = {:?}\nsync_writes = false\n",
                dir.path().join("items.csv"),
                dir.path().join("found.db"),
            ),
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = write_setup(&dir);

        let config = load_settings(&config_path).unwrap();
        assert_eq!(config.store.path, dir.path().join("found.db"));
        assert!(!config.store.sync_writes);
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_load_settings_rejects_bad_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("grailtracker.toml");
        fs::write(&config_path, "[search]\nmax_results = \"lots\"\n").unwrap();

        assert!(load_settings(&config_path).is_err());
    }

    #[test]
    fn test_session_persists_marks() {
        let dir = TempDir::new().unwrap();
        let config = load_settings(&write_setup(&dir)).unwrap();

        let mut context = AppContext::from_config(&config).unwrap();
        let input = "found 524\n\nmissing 3\ndance\nquit\nfound 525\n";
        let mut output = Vec::new();
        run_session(&mut context, input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Guillaume's Face marked found"));
        assert!(text.contains("Item 3 is not marked found"));
        assert!(text.contains("unknown command 'dance'"));
        assert!(!text.contains("525"));
        drop(context);

        let context = AppContext::from_config(&config).unwrap();
        assert!(context.is_found(524));
        assert!(!context.is_found(525));
    }
}
