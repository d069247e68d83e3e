use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::FilterValidationError;

// ── Daypart / DayType ─────────────────────────────────────────────────────────

/// Coarse time-of-day bucket a purchase falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Daypart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Daypart {
    /// All dayparts in chart order.
    pub const ALL: [Daypart; 4] = [
        Daypart::Morning,
        Daypart::Afternoon,
        Daypart::Evening,
        Daypart::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Daypart::Morning => "Morning",
            Daypart::Afternoon => "Afternoon",
            Daypart::Evening => "Evening",
            Daypart::Night => "Night",
        }
    }
}

impl fmt::Display for Daypart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Daypart {
    type Err = FilterValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Daypart::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FilterValidationError::UnknownDaypart(trimmed.to_string()))
    }
}

/// Whether a purchase happened on a weekend or a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekend,
    Weekday,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekend, DayType::Weekday];

    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Weekend => "Weekend",
            DayType::Weekday => "Weekday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = FilterValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DayType::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FilterValidationError::UnknownDayType(trimmed.to_string()))
    }
}

// ── Transaction rows ──────────────────────────────────────────────────────────

/// One item line of a purchase. A purchase spans every row sharing
/// `transaction_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Purchase identifier; repeated once per item bought.
    pub transaction_id: u64,
    /// Item name, whitespace-trimmed.
    pub item: String,
    /// Local wall-clock time of the purchase.
    pub timestamp: NaiveDateTime,
    pub daypart: Daypart,
    pub day_type: DayType,
}

/// Canonical form of an item name: surrounding whitespace removed, case kept.
pub fn normalize_item(raw: &str) -> String {
    raw.trim().to_string()
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// A row the loader skipped, with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Diagnostics produced while loading the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows seen (header excluded).
    pub rows_read: usize,
    /// Rows that made it into the dataset.
    pub rows_loaded: usize,
    /// Rows dropped because `DateTime` could not be parsed.
    pub discarded_timestamps: usize,
    /// Rows dropped for a bad transaction number or a blank item.
    pub discarded_invalid: usize,
    /// Rows whose `Daypart` or `DayType` cell was present but unusable, so
    /// the label was derived from the timestamp instead.
    pub derived_labels: usize,
    pub row_errors: Vec<RowError>,
}

impl LoadReport {
    /// Total number of rows that were read but not loaded.
    pub fn discarded_rows(&self) -> usize {
        self.discarded_timestamps + self.discarded_invalid
    }
}

/// The immutable, in-memory transaction table.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Transaction>,
    report: LoadReport,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Wrap rows produced by the loader together with its report.
    pub fn new(rows: Vec<Transaction>, report: LoadReport, source: Option<PathBuf>) -> Self {
        Self {
            rows,
            report,
            source,
        }
    }

    /// Build a dataset from rows that did not come from a file.
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        let report = LoadReport {
            rows_read: rows.len(),
            rows_loaded: rows.len(),
            ..LoadReport::default()
        };
        Self::new(rows, report, None)
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Path of the file the rows were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows passing `filter`, in input order.
    pub fn filtered<'a>(
        &'a self,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.rows.iter().filter(move |row| filter.matches(row))
    }
}

// ── TransactionFilter ─────────────────────────────────────────────────────────

/// Row selection applied before every aggregation.
///
/// Fields combine with AND. Within `dayparts` and `items` any listed value
/// matches; an empty set or `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionFilter {
    pub dayparts: BTreeSet<Daypart>,
    pub day_type: Option<DayType>,
    pub items: BTreeSet<String>,
}

impl TransactionFilter {
    /// The filter that lets every row through.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn daypart(daypart: Daypart) -> Self {
        Self::all().with_daypart(daypart)
    }

    pub fn day_type(day_type: DayType) -> Self {
        Self::all().with_day_type(day_type)
    }

    pub fn item(item: &str) -> Self {
        Self::all().with_item(item)
    }

    pub fn with_daypart(mut self, daypart: Daypart) -> Self {
        self.dayparts.insert(daypart);
        self
    }

    pub fn with_day_type(mut self, day_type: DayType) -> Self {
        self.day_type = Some(day_type);
        self
    }

    /// Add an item; the name is trimmed the same way loaded rows are.
    pub fn with_item(mut self, item: &str) -> Self {
        self.items.insert(normalize_item(item));
        self
    }

    /// Same filter but restricted to exactly one daypart.
    pub fn only_daypart(&self, daypart: Daypart) -> Self {
        Self {
            dayparts: BTreeSet::from([daypart]),
            ..self.clone()
        }
    }

    /// Same filter with the daypart restriction lifted.
    pub fn any_daypart(&self) -> Self {
        Self {
            dayparts: BTreeSet::new(),
            ..self.clone()
        }
    }

    /// `true` when no field constrains anything.
    pub fn is_unfiltered(&self) -> bool {
        self.dayparts.is_empty() && self.day_type.is_none() && self.items.is_empty()
    }

    pub fn matches(&self, row: &Transaction) -> bool {
        (self.dayparts.is_empty() || self.dayparts.contains(&row.daypart))
            && self.day_type.map_or(true, |t| t == row.day_type)
            && (self.items.is_empty() || self.items.contains(&row.item))
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dayparts = if self.dayparts.is_empty() {
            "all".to_string()
        } else {
            self.dayparts
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        let day_type = self.day_type.map(|t| t.as_str()).unwrap_or("all");
        let items = if self.items.is_empty() {
            "all".to_string()
        } else {
            self.items.iter().cloned().collect::<Vec<_>>().join(",")
        };
        write!(f, "daypart={dayparts} day_type={day_type} items={items}")
    }
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Item → number of rows, enumerated in the order items were first seen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more row for `item`.
    pub fn add(&mut self, item: &str) {
        match self.index.get(item) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(item.to_string(), self.entries.len());
                self.entries.push((item.to_string(), 1));
            }
        }
    }

    /// Row count for `item`, zero when absent.
    pub fn get(&self, item: &str) -> u64 {
        self.index.get(item).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(item, c)| (item.as_str(), *c))
    }

    /// The `n` highest counts. Equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        // sort_by is stable, which gives the first-seen tie-break.
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

// ── Co-occurrence ─────────────────────────────────────────────────────────────

/// Two distinct items bought in the same transaction, with the number of
/// transactions that contained both. Stored with `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrencePair {
    pub first: String,
    pub second: String,
    pub count: u64,
}

impl CooccurrencePair {
    /// Display label, e.g. `"Bread + Coffee"`.
    pub fn label(&self) -> String {
        format!("{} + {}", self.first, self.second)
    }
}

/// Set of co-occurrence pairs keyed by their unordered item pair.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CooccurrenceTable {
    pairs: Vec<CooccurrencePair>,
    #[serde(skip)]
    index: HashMap<(String, String), usize>,
}

impl CooccurrenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Count one more transaction containing both `a` and `b`.
    ///
    /// Self pairs are ignored.
    pub fn increment(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        let key = Self::key(a, b);
        match self.index.get(&key) {
            Some(&i) => self.pairs[i].count += 1,
            None => {
                self.index.insert(key.clone(), self.pairs.len());
                self.pairs.push(CooccurrencePair {
                    first: key.0,
                    second: key.1,
                    count: 1,
                });
            }
        }
    }

    /// Transactions containing both items, in either argument order.
    pub fn count(&self, a: &str, b: &str) -> u64 {
        self.index
            .get(&Self::key(a, b))
            .map_or(0, |&i| self.pairs[i].count)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in the order they were first encountered.
    pub fn iter(&self) -> impl Iterator<Item = &CooccurrencePair> {
        self.pairs.iter()
    }

    /// The `n` most frequent pairs. Equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<CooccurrencePair> {
        let mut sorted = self.pairs.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted.truncate(n);
        sorted
    }
}

// ── DaypartBreakdown ──────────────────────────────────────────────────────────

/// Daypart → distinct transaction count. Always holds all four dayparts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaypartBreakdown {
    counts: BTreeMap<Daypart, u64>,
}

impl Default for DaypartBreakdown {
    fn default() -> Self {
        Self {
            counts: Daypart::ALL.into_iter().map(|d| (d, 0)).collect(),
        }
    }
}

impl DaypartBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, daypart: Daypart) {
        *self.counts.entry(daypart).or_insert(0) += 1;
    }

    pub fn get(&self, daypart: Daypart) -> u64 {
        self.counts.get(&daypart).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `true` when every daypart is zero.
    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// `(daypart, count)` in daypart order.
    pub fn iter(&self) -> impl Iterator<Item = (Daypart, u64)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: u64, item: &str, daypart: Daypart, day_type: DayType) -> Transaction {
        Transaction {
            transaction_id: id,
            item: item.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2016, 10, 30)
                .unwrap()
                .and_hms_opt(9, 58, 11)
                .unwrap(),
            daypart,
            day_type,
        }
    }

    #[test]
    fn test_daypart_parse_case_insensitive() {
        assert_eq!("morning".parse::<Daypart>().unwrap(), Daypart::Morning);
        assert_eq!(" NIGHT ".parse::<Daypart>().unwrap(), Daypart::Night);
    }

    #[test]
    fn test_daypart_parse_unknown() {
        let err = "Brunch".parse::<Daypart>().unwrap_err();
        assert_eq!(err, FilterValidationError::UnknownDaypart("Brunch".into()));
    }

    #[test]
    fn test_day_type_parse() {
        assert_eq!("weekend".parse::<DayType>().unwrap(), DayType::Weekend);
        assert!(matches!(
            "holiday".parse::<DayType>(),
            Err(FilterValidationError::UnknownDayType(_))
        ));
    }

    #[test]
    fn test_daypart_order() {
        let mut parts = vec![Daypart::Night, Daypart::Morning, Daypart::Evening];
        parts.sort();
        assert_eq!(parts, vec![Daypart::Morning, Daypart::Evening, Daypart::Night]);
    }

    #[test]
    fn test_filter_all_matches_everything() {
        let f = TransactionFilter::all();
        assert!(f.is_unfiltered());
        assert!(f.matches(&row(1, "Bread", Daypart::Night, DayType::Weekday)));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let f = TransactionFilter::daypart(Daypart::Morning).with_day_type(DayType::Weekend);
        assert!(f.matches(&row(1, "Bread", Daypart::Morning, DayType::Weekend)));
        assert!(!f.matches(&row(1, "Bread", Daypart::Morning, DayType::Weekday)));
        assert!(!f.matches(&row(1, "Bread", Daypart::Evening, DayType::Weekend)));
    }

    #[test]
    fn test_filter_item_is_trimmed_and_case_sensitive() {
        let f = TransactionFilter::item("  Coffee ");
        assert!(f.matches(&row(1, "Coffee", Daypart::Morning, DayType::Weekday)));
        assert!(!f.matches(&row(1, "coffee", Daypart::Morning, DayType::Weekday)));
    }

    #[test]
    fn test_filter_only_daypart_keeps_other_fields() {
        let f = TransactionFilter::item("Tea")
            .with_daypart(Daypart::Morning)
            .with_daypart(Daypart::Evening);
        let only = f.only_daypart(Daypart::Night);
        assert_eq!(only.dayparts, BTreeSet::from([Daypart::Night]));
        assert!(only.items.contains("Tea"));
        assert!(only.any_daypart().dayparts.is_empty());
        assert!(only.any_daypart().items.contains("Tea"));
    }

    #[test]
    fn test_filter_display() {
        let f = TransactionFilter::daypart(Daypart::Morning).with_item("Bread");
        assert_eq!(f.to_string(), "daypart=Morning day_type=all items=Bread");
    }

    #[test]
    fn test_frequency_table_counts_and_order() {
        let mut t = FrequencyTable::new();
        for item in ["Tea", "Bread", "Coffee", "Bread", "Coffee", "Scone"] {
            t.add(item);
        }
        assert_eq!(t.get("Bread"), 2);
        assert_eq!(t.get("Cake"), 0);
        assert_eq!(t.total(), 6);
        let order: Vec<&str> = t.iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec!["Tea", "Bread", "Coffee", "Scone"]);
    }

    #[test]
    fn test_frequency_table_top_breaks_ties_by_first_seen() {
        let mut t = FrequencyTable::new();
        for item in ["Tea", "Bread", "Coffee", "Bread", "Coffee", "Scone"] {
            t.add(item);
        }
        let top = t.top(3);
        assert_eq!(
            top,
            vec![
                ("Bread".to_string(), 2),
                ("Coffee".to_string(), 2),
                ("Tea".to_string(), 1)
            ]
        );
        assert_eq!(t.top(100).len(), 4);
        assert!(t.top(0).is_empty());
    }

    #[test]
    fn test_cooccurrence_table_symmetric() {
        let mut t = CooccurrenceTable::new();
        t.increment("Coffee", "Bread");
        t.increment("Bread", "Coffee");
        assert_eq!(t.len(), 1);
        assert_eq!(t.count("Bread", "Coffee"), 2);
        assert_eq!(t.count("Coffee", "Bread"), 2);
        let pair = t.iter().next().unwrap();
        assert_eq!(pair.first, "Bread");
        assert_eq!(pair.second, "Coffee");
        assert_eq!(pair.label(), "Bread + Coffee");
    }

    #[test]
    fn test_cooccurrence_table_ignores_self_pairs() {
        let mut t = CooccurrenceTable::new();
        t.increment("Bread", "Bread");
        assert!(t.is_empty());
    }

    #[test]
    fn test_cooccurrence_top_breaks_ties_by_first_seen() {
        let mut t = CooccurrenceTable::new();
        t.increment("Tea", "Cake");
        t.increment("Bread", "Coffee");
        t.increment("Bread", "Coffee");
        t.increment("Juice", "Muffin");
        let top = t.top(3);
        assert_eq!(top[0].label(), "Bread + Coffee");
        assert_eq!(top[1].label(), "Cake + Tea");
        assert_eq!(top[2].label(), "Juice + Muffin");
    }

    #[test]
    fn test_daypart_breakdown_defaults_to_zero() {
        let b = DaypartBreakdown::new();
        assert!(b.is_zero());
        let parts: Vec<Daypart> = b.iter().map(|(d, _)| d).collect();
        assert_eq!(parts, Daypart::ALL.to_vec());
    }

    #[test]
    fn test_daypart_breakdown_increment() {
        let mut b = DaypartBreakdown::new();
        b.increment(Daypart::Evening);
        b.increment(Daypart::Evening);
        assert_eq!(b.get(Daypart::Evening), 2);
        assert_eq!(b.total(), 2);
    }

    #[test]
    fn test_dataset_from_rows_report() {
        let ds = Dataset::from_rows(vec![row(1, "Bread", Daypart::Morning, DayType::Weekday)]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().rows_loaded, 1);
        assert_eq!(ds.report().discarded_rows(), 0);
        assert!(ds.source().is_none());
    }

    #[test]
    fn test_dataset_filtered() {
        let ds = Dataset::from_rows(vec![
            row(1, "Bread", Daypart::Morning, DayType::Weekday),
            row(2, "Tea", Daypart::Night, DayType::Weekday),
        ]);
        let f = TransactionFilter::daypart(Daypart::Night);
        let items: Vec<&str> = ds.filtered(&f).map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Tea"]);
    }
}
