//! Main application state and TUI event loop for Bread Basket.
//!
//! [`App`] owns the theme, the active tab, the current query and the snapshot
//! built from it. Filter keys rebuild the snapshot from the shared dataset;
//! everything else only changes what is drawn.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use basket_core::models::{Dataset, DayType, Daypart, TransactionFilter};
use basket_core::settings::{TOP_N_MAX, TOP_N_MIN};
use basket_data::analysis::item_options;
use basket_runtime::query::{build_snapshot, DashboardQuery, DashboardSnapshot};

use crate::dashboard_view;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which dashboard tab is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ItemFrequency,
    ItemPairs,
    DaypartAnalysis,
    DaypartComparison,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::ItemFrequency,
        Tab::ItemPairs,
        Tab::DaypartAnalysis,
        Tab::DaypartComparison,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::ItemFrequency => "Item Frequency",
            Tab::ItemPairs => "Item Pairs",
            Tab::DaypartAnalysis => "Daypart Analysis",
            Tab::DaypartComparison => "Daypart Comparison",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// `'1'`..=`'4'` map to the tabs in order.
    pub fn from_digit(c: char) -> Option<Tab> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Tab::ALL.get(i).copied())
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    query: DashboardQuery,
    dataset: Arc<Dataset>,
    /// Sorted distinct item names the `i`/`I` keys cycle through.
    item_options: Vec<String>,
    snapshot: DashboardSnapshot,
}

impl App {
    pub fn new(dataset: Arc<Dataset>, query: DashboardQuery, theme_name: &str) -> Self {
        let snapshot = build_snapshot(&dataset, &query);
        let item_options = item_options(&dataset);
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::ItemFrequency,
            should_quit: false,
            query,
            dataset,
            item_options,
            snapshot,
        }
    }

    pub fn query(&self) -> &DashboardQuery {
        &self.query
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the calling thread. Callers on an async runtime should run this
    /// inside `spawn_blocking`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        restore_terminal()?;
        terminal.show_cursor()?;

        result
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, &self.snapshot, self.tab, &self.theme);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let before = self.query.clone();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.tab = tab;
                }
            }
            KeyCode::Char('d') => self.cycle_daypart(),
            KeyCode::Char('w') => self.cycle_day_type(),
            KeyCode::Char('i') => self.cycle_item(true),
            KeyCode::Char('I') => self.cycle_item(false),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_top_n(1),
            KeyCode::Char('-') => self.adjust_top_n(-1),
            KeyCode::Char('c') => self.query.filter = TransactionFilter::all(),
            _ => {}
        }

        if self.query != before {
            self.refresh();
        }
    }

    /// All → Morning → Afternoon → Evening → Night → All.
    ///
    /// A multi-daypart selection (from the command line) resets to All.
    fn cycle_daypart(&mut self) {
        let dayparts = &mut self.query.filter.dayparts;
        let next = match dayparts.len() {
            0 => Some(Daypart::ALL[0]),
            1 => dayparts.iter().next().and_then(|current| {
                let idx = Daypart::ALL.iter().position(|d| d == current)?;
                Daypart::ALL.get(idx + 1).copied()
            }),
            _ => None,
        };
        dayparts.clear();
        dayparts.extend(next);
    }

    /// All → Weekday → Weekend → All.
    fn cycle_day_type(&mut self) {
        self.query.filter.day_type = match self.query.filter.day_type {
            None => Some(DayType::Weekday),
            Some(DayType::Weekday) => Some(DayType::Weekend),
            Some(DayType::Weekend) => None,
        };
    }

    /// Step through the single-item filter in alphabetical order, passing
    /// through All at both ends.
    fn cycle_item(&mut self, forward: bool) {
        if self.item_options.is_empty() {
            return;
        }
        let items = &mut self.query.filter.items;
        let current = match items.len() {
            1 => items
                .iter()
                .next()
                .and_then(|item| self.item_options.iter().position(|o| o == item)),
            _ => None,
        };
        let last = self.item_options.len() - 1;
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) if i < last => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
        items.clear();
        if let Some(i) = next {
            items.insert(self.item_options[i].clone());
        }
    }

    fn adjust_top_n(&mut self, delta: isize) {
        let next = self.query.top_n.saturating_add_signed(delta);
        self.query.top_n = next.clamp(TOP_N_MIN, TOP_N_MAX);
    }

    fn refresh(&mut self) {
        tracing::debug!(filter = %self.query.filter, top_n = self.query.top_n, "query changed");
        self.snapshot = build_snapshot(&self.dataset, &self.query);
    }
}

/// Leave the alternate screen and raw mode.
///
/// Safe to call when the terminal was never switched; used by the binary when
/// an OS signal ends the process while the dashboard is up.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
