mod bootstrap;

use std::sync::Arc;

use anyhow::{Context, Result};
use basket_core::settings::Settings;
use basket_runtime::data_manager::DataManager;
use basket_runtime::query::{build_snapshot, parse_filter, DashboardQuery, RawFilter};
use basket_ui::app::{self, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    // The dashboard owns the terminal, so its logs go to a file.
    let log_file = match (&settings.log_file, settings.is_report()) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(bootstrap::default_log_file()),
        (None, true) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Bread Basket v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let filter = parse_filter(&RawFilter {
        dayparts: settings.dayparts.clone(),
        day_type: settings.day_type.clone(),
        items: settings.items.clone(),
    })
    .context("invalid filter")?;
    let query = DashboardQuery::new(filter, usize::from(settings.top_n))?;

    let data_path = settings
        .data
        .clone()
        .or_else(bootstrap::discover_data_path)
        .with_context(|| {
            format!(
                "no {} found in the working directory or {}; pass --data <PATH>",
                bootstrap::DATA_FILE,
                bootstrap::app_dir().display()
            )
        })?;
    tracing::info!("Loading transactions from {}", data_path.display());

    let manager = Arc::new(DataManager::new(data_path));
    let dataset = {
        let manager = Arc::clone(&manager);
        tokio::task::spawn_blocking(move || manager.get_data()).await??
    };

    if settings.is_report() {
        let snapshot = build_snapshot(&dataset, &query);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    tracing::info!("Starting dashboard...");
    let app = App::new(dataset, query, &settings.theme);

    // The TUI exits on 'q' / Ctrl+C itself. The OS-level handler covers
    // signals delivered while the terminal is in raw mode.
    let ui = tokio::task::spawn_blocking(move || app.run());
    tokio::select! {
        result = ui => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            app::restore_terminal()?;
            // The blocking UI thread cannot be cancelled and would keep the
            // runtime alive on shutdown.
            std::process::exit(130);
        }
    }

    Ok(())
}
