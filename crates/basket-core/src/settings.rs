use clap::Parser;
use std::path::PathBuf;

/// Smallest and largest number of bars a chart may show.
pub const TOP_N_MIN: usize = 5;
pub const TOP_N_MAX: usize = 30;
pub const DEFAULT_TOP_N: usize = 15;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Market basket analysis of bakery transactions
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bread-basket",
    about = "Market basket analysis of bakery transactions",
    version
)]
pub struct Settings {
    /// Path to the transaction CSV (discovered if not specified)
    #[arg(long, env = "BREAD_BASKET_DATA")]
    pub data: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// Initial daypart filter (repeatable)
    #[arg(long = "daypart")]
    pub dayparts: Vec<String>,

    /// Initial day-type filter
    #[arg(long)]
    pub day_type: Option<String>,

    /// Initial item filter (repeatable)
    #[arg(long = "item")]
    pub items: Vec<String>,

    /// Number of top items / pairs to display (5-30)
    #[arg(
        long,
        default_value_t = DEFAULT_TOP_N as u16,
        value_parser = clap::value_parser!(u16).range(TOP_N_MIN as i64..=TOP_N_MAX as i64)
    )]
    pub top_n: u16,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply flag overrides.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// `true` when the JSON report should be printed instead of the TUI.
    pub fn is_report(&self) -> bool {
        self.view == "report"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
