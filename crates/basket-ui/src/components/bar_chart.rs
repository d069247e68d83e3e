use basket_core::formatting::format_count;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Layout of a horizontal bar row.
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Display columns reserved for the label (padded or truncated to fit).
    pub label_width: usize,
    /// Display columns of the bar at the chart maximum.
    pub bar_width: usize,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label_width: 24,
            bar_width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── Label fitting ─────────────────────────────────────────────────────────────

/// Pad or truncate `label` to exactly `width` display columns.
///
/// Truncated labels end in `…`. Wide characters (CJK, emoji) are never split.
///
/// ```
/// use basket_ui::components::bar_chart::fit_label;
///
/// assert_eq!(fit_label("Bread", 7), "Bread  ");
/// assert_eq!(fit_label("Hot chocolate", 6), "Hot c…");
/// ```
pub fn fit_label(label: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let label_width = UnicodeWidthStr::width(label);
    if label_width <= width {
        return format!("{label}{}", " ".repeat(width - label_width));
    }

    let budget = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── FrequencyBar ──────────────────────────────────────────────────────────────

/// One labelled bar scaled against the largest value in its chart.
pub struct FrequencyBar<'a> {
    pub label: &'a str,
    pub value: u64,
    /// Value that maps to a full-width bar.
    pub max: u64,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> FrequencyBar<'a> {
    pub fn new(label: &'a str, value: u64, max: u64, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            max,
            style: theme.bar_fill,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of filled cells; at least one for any non-zero value.
    pub fn filled_cells(&self) -> usize {
        if self.max == 0 || self.value == 0 {
            return 0;
        }
        let ratio = (self.value as f64 / self.max as f64).min(1.0);
        ((ratio * self.config.bar_width as f64).round() as usize).max(1)
    }

    /// `<label> <filled><empty> <count>`
    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells();
        let empty = self.config.bar_width.saturating_sub(filled);

        Line::from(vec![
            Span::styled(
                format!("{} ", fit_label(self.label, self.config.label_width)),
                self.theme.label,
            ),
            Span::styled(self.config.filled_char.to_string().repeat(filled), self.style),
            Span::styled(
                self.config.empty_char.to_string().repeat(empty),
                self.theme.bar_empty,
            ),
            Span::styled(format!(" {}", format_count(self.value)), self.theme.bar_label),
        ])
    }
}

/// Render ranked `(label, count)` entries as bars scaled to the first entry.
pub fn bar_lines<'a>(
    entries: &'a [(String, u64)],
    style: Style,
    theme: &'a Theme,
    config: BarConfig,
) -> Vec<Line<'a>> {
    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0);
    entries
        .iter()
        .map(|(label, count)| {
            FrequencyBar::new(label, *count, max, theme)
                .with_style(style)
                .with_config(config)
                .to_line()
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
