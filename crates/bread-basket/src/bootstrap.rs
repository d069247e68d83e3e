use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user application directory under `$HOME`.
const APP_DIR: &str = ".bread-basket";

/// File name looked for during data discovery.
pub const DATA_FILE: &str = "Bakery.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.bread-basket/`, or `./.bread-basket/` when there is no home directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default log destination for the dashboard.
pub fn default_log_file() -> PathBuf {
    app_dir().join("logs").join("bread-basket.log")
}

/// Ensure `~/.bread-basket/` and `~/.bread-basket/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log-level name onto an [`EnvFilter`] directive.
///
/// Falls back to `"info"` if the level string is not recognised.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, events are appended to that file (ANSI colours off);
/// otherwise they go to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the transaction CSV when `--data` was not given.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `./Bakery.csv`
/// 2. `~/.bread-basket/Bakery.csv`
pub fn discover_data_path() -> Option<PathBuf> {
    discover_in(Path::new("."), &app_dir())
}

fn discover_in(cwd: &Path, app_dir: &Path) -> Option<PathBuf> {
    [cwd.join(DATA_FILE), app_dir.join(DATA_FILE)]
        .into_iter()
        .find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
