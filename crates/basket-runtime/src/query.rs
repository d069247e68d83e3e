//! Dashboard queries and the snapshots they produce.
//!
//! [`RawFilter`] carries the filter strings a user typed on the command line.
//! [`parse_filter`] validates them into a [`TransactionFilter`], and
//! [`build_snapshot`] runs every aggregation the dashboard shows for one
//! [`DashboardQuery`].

use basket_core::error::FilterValidationError;
use basket_core::models::{
    CooccurrencePair, Dataset, DayType, Daypart, DaypartBreakdown, LoadReport, TransactionFilter,
};
use basket_core::settings::{DEFAULT_TOP_N, TOP_N_MAX, TOP_N_MIN};
use basket_data::aggregator::{co_occurrence, day_part_volume, item_frequency};
use basket_data::analysis::{
    average_basket_by_daypart, daypart_heatmap, pairs_by_daypart, summarize,
    top_items_by_daypart, DaypartItems, DaypartPairs, Heatmap, SummaryMetrics,
};
use serde::Serialize;

/// Value accepted for "no restriction" in day-type and daypart filters.
const ALL: &str = "all";

// ── Filter parsing ────────────────────────────────────────────────────────────

/// Unvalidated filter values, as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilter {
    pub dayparts: Vec<String>,
    pub day_type: Option<String>,
    pub items: Vec<String>,
}

/// Validate raw filter values.
///
/// Daypart and day-type names are matched case-insensitively; `all` means no
/// restriction. Item names are trimmed and must not be blank. Items that do
/// not occur in the data are accepted and simply select nothing.
pub fn parse_filter(raw: &RawFilter) -> Result<TransactionFilter, FilterValidationError> {
    let mut filter = TransactionFilter::all();

    for name in &raw.dayparts {
        if name.trim().eq_ignore_ascii_case(ALL) {
            continue;
        }
        filter = filter.with_daypart(name.parse::<Daypart>()?);
    }

    if let Some(name) = raw.day_type.as_deref() {
        if !name.trim().eq_ignore_ascii_case(ALL) {
            filter = filter.with_day_type(name.parse::<DayType>()?);
        }
    }

    for item in &raw.items {
        if item.trim().is_empty() {
            return Err(FilterValidationError::EmptyItem);
        }
        filter = filter.with_item(item);
    }

    tracing::debug!(%filter, "filter parsed");
    Ok(filter)
}

// ── DashboardQuery ────────────────────────────────────────────────────────────

/// A filter plus the number of entries each ranked chart shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardQuery {
    pub filter: TransactionFilter,
    pub top_n: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            filter: TransactionFilter::all(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardQuery {
    pub fn new(filter: TransactionFilter, top_n: usize) -> Result<Self, FilterValidationError> {
        Self {
            filter,
            ..Self::default()
        }
        .with_top_n(top_n)
    }

    /// Replace `top_n`, rejecting values outside
    /// [`TOP_N_MIN`]`..=`[`TOP_N_MAX`].
    pub fn with_top_n(mut self, top_n: usize) -> Result<Self, FilterValidationError> {
        if !(TOP_N_MIN..=TOP_N_MAX).contains(&top_n) {
            return Err(FilterValidationError::TopNOutOfRange {
                value: top_n,
                min: TOP_N_MIN,
                max: TOP_N_MAX,
            });
        }
        self.top_n = top_n;
        Ok(self)
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Everything the dashboard renders for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub query: DashboardQuery,
    pub load_report: LoadReport,
    pub summary: SummaryMetrics,
    pub top_items: Vec<(String, u64)>,
    pub top_pairs: Vec<CooccurrencePair>,
    pub daypart_volume: DaypartBreakdown,
    pub basket_by_daypart: Vec<(Daypart, f64)>,
    pub top_items_by_daypart: Vec<DaypartItems>,
    pub pairs_by_daypart: Vec<DaypartPairs>,
    pub heatmap: Heatmap,
}

/// Run every dashboard aggregation for `query`.
pub fn build_snapshot(dataset: &Dataset, query: &DashboardQuery) -> DashboardSnapshot {
    let filter = &query.filter;
    let n = query.top_n;

    let snapshot = DashboardSnapshot {
        query: query.clone(),
        load_report: dataset.report().clone(),
        summary: summarize(dataset, filter),
        top_items: item_frequency(dataset, filter).top(n),
        top_pairs: co_occurrence(dataset, filter).top(n),
        daypart_volume: day_part_volume(dataset, filter),
        basket_by_daypart: average_basket_by_daypart(dataset, filter),
        top_items_by_daypart: top_items_by_daypart(dataset, filter, n),
        pairs_by_daypart: pairs_by_daypart(dataset, filter, n),
        heatmap: daypart_heatmap(dataset, filter, n),
    };

    tracing::debug!(
        filter = %filter,
        top_n = n,
        transactions = snapshot.summary.total_transactions,
        "snapshot built"
    );
    snapshot
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::models::Transaction;
    use basket_core::time_utils::{day_type_for, daypart_for, parse_datetime};

    fn raw(dayparts: &[&str], day_type: Option<&str>, items: &[&str]) -> RawFilter {
        RawFilter {
            dayparts: dayparts.iter().map(|s| s.to_string()).collect(),
            day_type: day_type.map(str::to_string),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn row(id: u64, item: &str, ts: &str) -> Transaction {
        let timestamp = parse_datetime(ts).unwrap();
        Transaction {
            transaction_id: id,
            item: item.to_string(),
            timestamp,
            daypart: daypart_for(&timestamp),
            day_type: day_type_for(&timestamp),
        }
    }

    fn sample() -> Dataset {
        Dataset::from_rows(vec![
            row(1, "Bread", "2016-10-30 09:58:11"),
            row(1, "Coffee", "2016-10-30 09:58:11"),
            row(2, "Bread", "2016-10-31 13:15:00"),
            row(3, "Coffee", "2016-10-31 18:40:00"),
            row(3, "Cake", "2016-10-31 18:40:00"),
        ])
    }

    #[test]
    fn test_parse_filter_empty_is_all() {
        assert_eq!(parse_filter(&RawFilter::default()).unwrap(), TransactionFilter::all());
    }

    #[test]
    fn test_parse_filter_values() {
        let filter =
            parse_filter(&raw(&["morning", " Evening "], Some("WEEKEND"), &[" Bread "])).unwrap();
        assert_eq!(
            filter,
            TransactionFilter::daypart(Daypart::Morning)
                .with_daypart(Daypart::Evening)
                .with_day_type(DayType::Weekend)
                .with_item("Bread")
        );
    }

    #[test]
    fn test_parse_filter_all_keyword() {
        let filter = parse_filter(&raw(&["All"], Some("all"), &[])).unwrap();
        assert!(filter.is_unfiltered());
    }

    #[test]
    fn test_parse_filter_errors() {
        assert_eq!(
            parse_filter(&raw(&["Brunch"], None, &[])),
            Err(FilterValidationError::UnknownDaypart("Brunch".to_string()))
        );
        assert_eq!(
            parse_filter(&raw(&[], Some("Holiday"), &[])),
            Err(FilterValidationError::UnknownDayType("Holiday".to_string()))
        );
        assert_eq!(
            parse_filter(&raw(&[], None, &["  "])),
            Err(FilterValidationError::EmptyItem)
        );
    }

    #[test]
    fn test_query_top_n_bounds() {
        assert!(DashboardQuery::new(TransactionFilter::all(), 5).is_ok());
        assert!(DashboardQuery::new(TransactionFilter::all(), 30).is_ok());
        assert_eq!(
            DashboardQuery::new(TransactionFilter::all(), 31),
            Err(FilterValidationError::TopNOutOfRange {
                value: 31,
                min: 5,
                max: 30
            })
        );
        assert!(DashboardQuery::default().with_top_n(4).is_err());
        assert_eq!(DashboardQuery::default().top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_build_snapshot_unfiltered() {
        let snap = build_snapshot(&sample(), &DashboardQuery::default());

        assert_eq!(snap.summary.total_transactions, 3);
        assert_eq!(snap.summary.total_records, 5);
        assert_eq!(snap.top_items[0], ("Bread".to_string(), 2));
        assert_eq!(snap.top_items[1], ("Coffee".to_string(), 2));
        assert_eq!(snap.top_pairs.len(), 2);
        assert_eq!(snap.top_pairs[0].label(), "Bread + Coffee");
        assert_eq!(snap.daypart_volume.get(Daypart::Morning), 1);
        assert_eq!(snap.daypart_volume.get(Daypart::Afternoon), 1);
        assert_eq!(snap.daypart_volume.get(Daypart::Evening), 1);
        assert_eq!(snap.daypart_volume.total(), 3);
        assert_eq!(snap.basket_by_daypart.len(), 4);
        assert_eq!(snap.top_items_by_daypart.len(), 3);
        assert_eq!(snap.pairs_by_daypart.len(), 2);
        assert_eq!(snap.heatmap.items, vec!["Bread", "Coffee", "Cake"]);
    }

    #[test]
    fn test_build_snapshot_absent_item() {
        let query = DashboardQuery::new(TransactionFilter::item("Baguette"), 10).unwrap();
        let snap = build_snapshot(&sample(), &query);

        assert!(snap.top_items.is_empty());
        assert!(snap.top_pairs.is_empty());
        assert!(snap.daypart_volume.is_zero());
        assert_eq!(snap.summary.total_transactions, 0);
        assert!(snap.heatmap.items.is_empty());
    }

    #[test]
    fn test_build_snapshot_respects_top_n() {
        let rows = (0..40)
            .map(|i| row(i, &format!("Item {i:02}"), "2016-10-30 10:00:00"))
            .collect();
        let query = DashboardQuery::new(TransactionFilter::all(), 5).unwrap();
        let snap = build_snapshot(&Dataset::from_rows(rows), &query);
        assert_eq!(snap.top_items.len(), 5);
        assert_eq!(snap.heatmap.items.len(), 5);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = build_snapshot(&sample(), &DashboardQuery::default());
        let json = serde_json::to_value(&snap).unwrap();

        assert_eq!(json["summary"]["total_transactions"], 3);
        assert_eq!(json["query"]["top_n"], 15);
        assert_eq!(json["top_pairs"][0]["first"], "Bread");
        assert_eq!(json["top_pairs"][0]["second"], "Coffee");
        assert_eq!(json["daypart_volume"]["counts"]["Morning"], 1);
    }
}
