use basket_core::formatting::{format_count, format_number};
use basket_core::models::LoadReport;
use basket_data::analysis::SummaryMetrics;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

// ── SummaryIndicator ──────────────────────────────────────────────────────────

/// Headline numbers for the current selection.
///
/// Format: `"Transactions: 9,465 │ Records: 20,507 │ Unique items: 94 │ Avg basket: 2.17"`
pub struct SummaryIndicator<'a> {
    pub summary: &'a SummaryMetrics,
    pub theme: &'a Theme,
}

impl<'a> SummaryIndicator<'a> {
    pub fn new(summary: &'a SummaryMetrics, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }

    pub fn to_line(&self) -> Line<'a> {
        let s = self.summary;
        let sep = || Span::styled(" │ ", self.theme.separator);
        Line::from(vec![
            Span::styled("Transactions: ", self.theme.label),
            Span::styled(format_count(s.total_transactions as u64), self.theme.value),
            sep(),
            Span::styled("Records: ", self.theme.label),
            Span::styled(format_count(s.total_records as u64), self.theme.value),
            sep(),
            Span::styled("Unique items: ", self.theme.label),
            Span::styled(format_count(s.unique_items as u64), self.theme.value),
            sep(),
            Span::styled("Avg basket: ", self.theme.label),
            Span::styled(format_number(s.avg_basket_size, 2), self.theme.value),
        ])
    }
}

// ── LoadNotice ────────────────────────────────────────────────────────────────

/// Warning about rows the loader skipped, or `None` when every row loaded.
pub struct LoadNotice<'a> {
    pub report: &'a LoadReport,
    pub theme: &'a Theme,
}

impl<'a> LoadNotice<'a> {
    pub fn new(report: &'a LoadReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }

    pub fn to_line(&self) -> Option<Line<'a>> {
        let r = self.report;
        if r.discarded_rows() == 0 {
            return None;
        }
        Some(Line::from(vec![
            Span::styled("⚠ ", self.theme.warning),
            Span::styled(
                format!(
                    "{} of {} rows skipped ({} bad timestamps, {} invalid)",
                    format_count(r.discarded_rows() as u64),
                    format_count(r.rows_read as u64),
                    format_count(r.discarded_timestamps as u64),
                    format_count(r.discarded_invalid as u64),
                ),
                self.theme.warning,
            ),
        ]))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
