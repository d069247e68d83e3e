use basket_core::models::TransactionFilter;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header rendering three lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A `=` separator as wide as `width`.
/// 3. The active filters in `[ daypart: … | day type: … | items: … | top N ]`
///    format.
pub struct Header<'a> {
    pub filter: &'a TransactionFilter,
    pub top_n: usize,
    pub width: u16,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(filter: &'a TransactionFilter, top_n: usize, width: u16, theme: &'a Theme) -> Self {
        Self {
            filter,
            top_n,
            width,
            theme,
        }
    }

    /// Human-readable summary of one filter field; `All` when unconstrained.
    fn describe<I, S>(values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        if joined.is_empty() {
            "All".to_string()
        } else {
            joined.join(", ")
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let dayparts = Self::describe(self.filter.dayparts.iter().map(|d| d.as_str()));
        let day_type = Self::describe(self.filter.day_type.iter().map(|t| t.as_str()));
        let items = Self::describe(self.filter.items.iter());

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" BREAD BASKET ANALYSIS ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(
                "=".repeat(self.width as usize),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ daypart: ", self.theme.label),
                Span::styled(dayparts, self.theme.value),
                Span::styled(" | day type: ", self.theme.label),
                Span::styled(day_type, self.theme.value),
                Span::styled(" | items: ", self.theme.label),
                Span::styled(items, self.theme.value),
                Span::styled(" | top ", self.theme.label),
                Span::styled(self.top_n.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::models::{DayType, Daypart};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count() {
        let theme = Theme::dark();
        let filter = TransactionFilter::all();
        assert_eq!(Header::new(&filter, 15, 60, &theme).to_lines().len(), 3);
    }

    #[test]
    fn test_header_title() {
        let theme = Theme::dark();
        let filter = TransactionFilter::all();
        let lines = Header::new(&filter, 15, 60, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("BREAD BASKET ANALYSIS"), "got: {title}");
        assert!(title.starts_with(SPARKLES));
    }

    #[test]
    fn test_header_separator_follows_width() {
        let theme = Theme::dark();
        let filter = TransactionFilter::all();
        let lines = Header::new(&filter, 15, 42, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 42);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_unfiltered() {
        let theme = Theme::dark();
        let filter = TransactionFilter::all();
        let lines = Header::new(&filter, 15, 60, &theme).to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ daypart: All | day type: All | items: All | top 15 ]"
        );
    }

    #[test]
    fn test_header_filtered() {
        let theme = Theme::dark();
        let filter = TransactionFilter::daypart(Daypart::Evening)
            .with_daypart(Daypart::Morning)
            .with_day_type(DayType::Weekday)
            .with_item("Coffee")
            .with_item("Bread");
        let lines = Header::new(&filter, 8, 60, &theme).to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ daypart: Morning, Evening | day type: Weekday | items: Bread, Coffee | top 8 ]"
        );
    }
}
