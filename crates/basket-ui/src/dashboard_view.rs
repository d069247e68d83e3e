//! Tabbed dashboard screen for Bread Basket.
//!
//! Every tab is drawn from one [`DashboardSnapshot`]; nothing here touches
//! the dataset. Line and table builders are public so they can be checked
//! without a terminal.

use basket_core::formatting::{format_count, format_number};
use basket_core::models::Daypart;
use basket_data::analysis::Heatmap;
use basket_runtime::query::DashboardSnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::app::Tab;
use crate::components::bar_chart::{bar_lines, fit_label, BarConfig, FrequencyBar};
use crate::components::header::Header;
use crate::components::metrics::{LoadNotice, SummaryIndicator};
use crate::themes::Theme;

/// Footer key help.
pub const KEY_HELP: &str =
    "Tab/←/→ switch  1-4 jump  d daypart  w day type  i/I item  +/- top N  c clear  q quit";

// ── Main render ───────────────────────────────────────────────────────────────

/// Draw the full dashboard: header, tab bar, metrics, active tab and footer.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    tab: Tab,
    theme: &Theme,
) {
    let notice = LoadNotice::new(&snapshot.load_report, theme).to_line();
    let metrics_height = if notice.is_some() { 2 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(metrics_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(
        &snapshot.query.filter,
        snapshot.query.top_n,
        area.width,
        theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    frame.render_widget(
        Tabs::new(titles)
            .select(tab.index())
            .style(theme.tab_inactive)
            .highlight_style(theme.tab_active)
            .divider(Span::styled("│", theme.separator)),
        chunks[1],
    );

    let mut metric_lines = vec![SummaryIndicator::new(&snapshot.summary, theme).to_line()];
    metric_lines.extend(notice);
    frame.render_widget(Paragraph::new(Text::from(metric_lines)), chunks[2]);

    if snapshot.summary.total_transactions == 0 {
        render_no_data(frame, chunks[3], theme);
    } else {
        match tab {
            Tab::ItemFrequency => render_item_frequency(frame, chunks[3], snapshot, theme),
            Tab::ItemPairs => render_item_pairs(frame, chunks[3], snapshot, theme),
            Tab::DaypartAnalysis => render_daypart_analysis(frame, chunks[3], snapshot, theme),
            Tab::DaypartComparison => {
                render_daypart_comparison(frame, chunks[3], snapshot, theme)
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(KEY_HELP, theme.dim))),
        chunks[4],
    );
}

/// Placeholder shown when the filters select no transactions.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No transactions match the current filters",
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled("Press 'c' to clear filters", theme.info)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(titled_block(" Bread Basket ", theme)),
        area,
    );
}

fn titled_block<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(title)
}

/// Bar config sized to the inner width of `area`.
fn bar_config(area: Rect, label_width: usize) -> BarConfig {
    // borders (2) + label gap (1) + count column (8)
    let bar_width = (area.width as usize).saturating_sub(label_width + 11).max(5);
    BarConfig {
        label_width,
        bar_width,
        ..BarConfig::default()
    }
}

// ── Item Frequency ────────────────────────────────────────────────────────────

fn render_item_frequency(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let lines = bar_lines(
        &snapshot.top_items,
        theme.bar_fill,
        theme,
        bar_config(area, 24),
    );
    let title = format!(" Top {} Items Sold ", snapshot.query.top_n);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(titled_block(title, theme)),
        area,
    );
}

// ── Item Pairs ────────────────────────────────────────────────────────────────

/// Ranked pair table: rank, both items and the number of shared transactions.
pub fn pairs_table<'a>(snapshot: &'a DashboardSnapshot, theme: &Theme) -> Table<'a> {
    let header = Row::new(
        ["#", "Item A", "Item B", "Transactions"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let rows: Vec<Row> = snapshot
        .top_pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(pair.first.as_str()),
                Cell::from(pair.second.as_str()),
                Cell::from(format_count(pair.count)),
            ])
            .style(style)
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(38),
            Constraint::Percentage(38),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .style(theme.text)
}

fn render_item_pairs(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let title = format!(" Top {} Item Pairs ", snapshot.query.top_n);
    if snapshot.top_pairs.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transaction holds two or more of the selected items",
            theme.dim,
        )))
        .block(titled_block(title, theme));
        frame.render_widget(msg, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    frame.render_widget(
        pairs_table(snapshot, theme).block(titled_block(title, theme)),
        cols[0],
    );

    let labelled: Vec<(String, u64)> = snapshot
        .top_pairs
        .iter()
        .map(|p| (p.label(), p.count))
        .collect();
    let max = labelled.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let config = bar_config(cols[1], 28);
    let lines: Vec<Line> = labelled
        .iter()
        .map(|(label, count)| {
            FrequencyBar::new(label, *count, max, theme)
                .with_config(config)
                .to_line()
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(titled_block(" Pair Frequency ", theme)),
        cols[1],
    );
}

// ── Daypart Analysis ──────────────────────────────────────────────────────────

/// One bar per daypart: distinct transactions, coloured by daypart.
pub fn daypart_volume_lines<'a>(
    snapshot: &'a DashboardSnapshot,
    theme: &'a Theme,
    config: BarConfig,
) -> Vec<Line<'a>> {
    let volume = &snapshot.daypart_volume;
    let max = volume.iter().map(|(_, c)| c).max().unwrap_or(0);
    volume
        .iter()
        .map(|(daypart, count)| {
            FrequencyBar::new(daypart.as_str(), count, max, theme)
                .with_style(theme.daypart_style(daypart))
                .with_config(config)
                .to_line()
        })
        .collect()
}

/// Average items per transaction for each daypart.
pub fn basket_size_lines<'a>(
    basket_by_daypart: &[(Daypart, f64)],
    theme: &'a Theme,
    config: BarConfig,
) -> Vec<Line<'a>> {
    let max = basket_by_daypart
        .iter()
        .map(|(_, avg)| *avg)
        .fold(0.0_f64, f64::max);

    basket_by_daypart
        .iter()
        .map(|(daypart, avg)| {
            let filled = if max > 0.0 {
                ((avg / max) * config.bar_width as f64).round() as usize
            } else {
                0
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", fit_label(daypart.as_str(), config.label_width)),
                    theme.label,
                ),
                Span::styled(
                    config.filled_char.to_string().repeat(filled),
                    theme.daypart_style(*daypart),
                ),
                Span::styled(
                    config
                        .empty_char
                        .to_string()
                        .repeat(config.bar_width.saturating_sub(filled)),
                    theme.bar_empty,
                ),
                Span::styled(format!(" {}", format_number(*avg, 2)), theme.bar_label),
            ])
        })
        .collect()
}

/// Top pairs of each daypart as a compact listing.
pub fn daypart_pair_lines<'a>(snapshot: &'a DashboardSnapshot, theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for entry in &snapshot.pairs_by_daypart {
        lines.push(Line::from(Span::styled(
            entry.daypart.as_str(),
            theme.daypart_style(entry.daypart),
        )));
        for pair in &entry.pairs {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", pair.label()), theme.text),
                Span::styled(format!("  {}", format_count(pair.count)), theme.dim),
            ]));
        }
    }
    lines
}

fn render_daypart_analysis(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    frame.render_widget(
        Paragraph::new(Text::from(daypart_volume_lines(
            snapshot,
            theme,
            bar_config(cols[0], 10),
        )))
        .block(titled_block(" Transactions by Daypart ", theme)),
        cols[0],
    );
    frame.render_widget(
        Paragraph::new(Text::from(basket_size_lines(
            &snapshot.basket_by_daypart,
            theme,
            bar_config(cols[1], 10),
        )))
        .block(titled_block(" Average Basket Size ", theme)),
        cols[1],
    );
    frame.render_widget(
        Paragraph::new(Text::from(daypart_pair_lines(snapshot, theme)))
            .wrap(Wrap { trim: false })
            .block(titled_block(" Top Pairs by Daypart ", theme)),
        rows[1],
    );
}

// ── Daypart Comparison ────────────────────────────────────────────────────────

/// Daypart × item table with cells shaded by sales volume.
pub fn heatmap_table<'a>(heatmap: &'a Heatmap, theme: &Theme) -> Table<'a> {
    const CELL_WIDTH: u16 = 9;

    let max = heatmap.max_cell();
    let mut header_cells = vec![Cell::from("Daypart").style(theme.table_header)];
    header_cells.extend(heatmap.items.iter().map(|item| {
        Cell::from(fit_label(item, CELL_WIDTH as usize).trim_end().to_string())
            .style(theme.table_header)
    }));

    let rows: Vec<Row> = heatmap
        .rows
        .iter()
        .map(|(daypart, cells)| {
            let mut row = vec![Cell::from(daypart.as_str()).style(theme.daypart_style(*daypart))];
            row.extend(
                cells
                    .iter()
                    .map(|v| Cell::from(format_count(*v)).style(theme.heat_style(*v, max))),
            );
            Row::new(row)
        })
        .collect();

    let mut widths = vec![Constraint::Length(10)];
    widths.extend(heatmap.items.iter().map(|_| Constraint::Length(CELL_WIDTH)));

    Table::new(rows, widths)
        .header(Row::new(header_cells))
        .style(theme.text)
}

fn render_daypart_comparison(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(area);

    let per_daypart = &snapshot.top_items_by_daypart;
    if !per_daypart.is_empty() {
        let constraints: Vec<Constraint> = per_daypart
            .iter()
            .map(|_| Constraint::Ratio(1, per_daypart.len() as u32))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(rows[0]);

        for (entry, col) in per_daypart.iter().zip(cols.iter()) {
            let lines = bar_lines(
                &entry.items,
                theme.daypart_style(entry.daypart),
                theme,
                bar_config(*col, 14),
            );
            let title = Span::styled(
                format!(" {} ", entry.daypart),
                theme.daypart_style(entry.daypart),
            );
            frame.render_widget(
                Paragraph::new(Text::from(lines)).block(titled_block(title, theme)),
                *col,
            );
        }
    }

    frame.render_widget(
        heatmap_table(&snapshot.heatmap, theme).block(titled_block(" Sales Heatmap ", theme)),
        rows[1],
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
