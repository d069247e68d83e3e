use basket_core::models::Daypart;
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. If the variable is
/// absent or unparseable, `BackgroundType::Unknown` is returned.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| background_from_colorfgbg(&val))
        .unwrap_or(BackgroundType::Unknown)
}

fn background_from_colorfgbg(val: &str) -> Option<BackgroundType> {
    let bg = val.split(';').next_back()?.trim().parse::<u8>().ok()?;
    Some(if bg <= 6 {
        BackgroundType::Dark
    } else {
        BackgroundType::Light
    })
}

/// Every style the dashboard widgets draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,

    // ── Tabs ─────────────────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// Filled portion of a frequency bar.
    pub bar_fill: Style,
    /// Track behind the filled portion.
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Dayparts ─────────────────────────────────────────────────────────────
    pub daypart_morning: Style,
    pub daypart_afternoon: Style,
    pub daypart_evening: Style,
    pub daypart_night: Style,

    // ── Heatmap ──────────────────────────────────────────────────────────────
    pub heat_none: Style,
    pub heat_low: Style,
    pub heat_medium: Style,
    pub heat_high: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::LightYellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            bar_fill: Style::default().fg(Color::Yellow),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            daypart_morning: Style::default().fg(Color::Yellow),
            daypart_afternoon: Style::default().fg(Color::Green),
            daypart_evening: Style::default().fg(Color::Magenta),
            daypart_night: Style::default().fg(Color::Blue),

            heat_none: Style::default().fg(Color::DarkGray),
            heat_low: Style::default().fg(Color::Yellow),
            heat_medium: Style::default().fg(Color::LightRed),
            heat_high: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Dark text with saturated accents so charts stay legible on a
    /// white canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            bar_fill: Style::default().fg(Color::Red),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            daypart_morning: Style::default().fg(Color::Red),
            daypart_afternoon: Style::default().fg(Color::Green),
            daypart_evening: Style::default().fg(Color::Magenta),
            daypart_night: Style::default().fg(Color::Blue),

            heat_none: Style::default().fg(Color::Gray),
            heat_low: Style::default().fg(Color::Blue),
            heat_medium: Style::default().fg(Color::Magenta),
            heat_high: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Yellow),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::Gray),

            bar_fill: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            daypart_morning: Style::default().fg(Color::Yellow),
            daypart_afternoon: Style::default().fg(Color::Green),
            daypart_evening: Style::default().fg(Color::Magenta),
            daypart_night: Style::default().fg(Color::Blue),

            heat_none: Style::default().fg(Color::DarkGray),
            heat_low: Style::default().fg(Color::Green),
            heat_medium: Style::default().fg(Color::Yellow),
            heat_high: Style::default().fg(Color::Red),

            table_header: Style::default().fg(Color::Yellow),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    pub fn daypart_style(&self, daypart: Daypart) -> Style {
        match daypart {
            Daypart::Morning => self.daypart_morning,
            Daypart::Afternoon => self.daypart_afternoon,
            Daypart::Evening => self.daypart_evening,
            Daypart::Night => self.daypart_night,
        }
    }

    /// Heatmap cell style for `value` relative to the largest cell.
    ///
    /// * `0`           → `heat_none`
    /// * `< 1/3 max`   → `heat_low`
    /// * `< 2/3 max`   → `heat_medium`
    /// * otherwise     → `heat_high`
    pub fn heat_style(&self, value: u64, max: u64) -> Style {
        if value == 0 || max == 0 {
            return self.heat_none;
        }
        let ratio = value as f64 / max as f64;
        if ratio < 1.0 / 3.0 {
            self.heat_low
        } else if ratio < 2.0 / 3.0 {
            self.heat_medium
        } else {
            self.heat_high
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
