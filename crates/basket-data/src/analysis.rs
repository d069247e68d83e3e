//! Derived analyses behind the dashboard tabs.
//!
//! Builds on [`crate::aggregator`]: headline metrics, per-daypart basket
//! sizes, per-daypart top items and pairs, and the daypart × item heatmap.
//! The per-daypart views always cover every daypart: they keep the filter's
//! day type and items but replace its daypart selection.

use std::collections::BTreeSet;

use basket_core::models::{CooccurrencePair, Dataset, Daypart, TransactionFilter};
use serde::Serialize;

use crate::aggregator::{co_occurrence, item_frequency, transaction_count};

// ── Public types ──────────────────────────────────────────────────────────────

/// Headline numbers for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Distinct transaction ids.
    pub total_transactions: usize,
    /// Item rows.
    pub total_records: usize,
    /// Distinct item names.
    pub unique_items: usize,
    /// `total_records / max(total_transactions, 1)`.
    pub avg_basket_size: f64,
}

/// Best sellers within one daypart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaypartItems {
    pub daypart: Daypart,
    pub items: Vec<(String, u64)>,
}

/// Most frequent pairs within one daypart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaypartPairs {
    pub daypart: Daypart,
    pub pairs: Vec<CooccurrencePair>,
}

/// Row counts of the best-selling items, split by daypart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    /// Column labels, most frequent first.
    pub items: Vec<String>,
    /// One row per daypart, cells aligned with `items`.
    pub rows: Vec<(Daypart, Vec<u64>)>,
}

impl Heatmap {
    /// Largest cell value, zero for an empty map.
    pub fn max_cell(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|(_, cells)| cells.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Transactions, records, distinct items and average basket size.
pub fn summarize(dataset: &Dataset, filter: &TransactionFilter) -> SummaryMetrics {
    let freq = item_frequency(dataset, filter);
    let total_records = freq.total() as usize;
    let total_transactions = transaction_count(dataset, filter);

    SummaryMetrics {
        total_transactions,
        total_records,
        unique_items: freq.len(),
        avg_basket_size: total_records as f64 / total_transactions.max(1) as f64,
    }
}

/// Items per transaction for each daypart, in daypart order.
///
/// Dayparts without transactions report `0.0`.
pub fn average_basket_by_daypart(
    dataset: &Dataset,
    filter: &TransactionFilter,
) -> Vec<(Daypart, f64)> {
    Daypart::ALL
        .into_iter()
        .map(|daypart| {
            let scoped = filter.only_daypart(daypart);
            let rows = dataset.filtered(&scoped).count();
            let transactions = transaction_count(dataset, &scoped);
            let avg = if transactions == 0 {
                0.0
            } else {
                rows as f64 / transactions as f64
            };
            (daypart, avg)
        })
        .collect()
}

/// Top `n` items of each daypart. Dayparts with no rows are omitted.
pub fn top_items_by_daypart(
    dataset: &Dataset,
    filter: &TransactionFilter,
    n: usize,
) -> Vec<DaypartItems> {
    Daypart::ALL
        .into_iter()
        .filter_map(|daypart| {
            let items = item_frequency(dataset, &filter.only_daypart(daypart)).top(n);
            (!items.is_empty()).then_some(DaypartItems { daypart, items })
        })
        .collect()
}

/// Top `n` co-occurring pairs of each daypart. Dayparts without pairs are
/// omitted.
pub fn pairs_by_daypart(
    dataset: &Dataset,
    filter: &TransactionFilter,
    n: usize,
) -> Vec<DaypartPairs> {
    Daypart::ALL
        .into_iter()
        .filter_map(|daypart| {
            let pairs = co_occurrence(dataset, &filter.only_daypart(daypart)).top(n);
            (!pairs.is_empty()).then_some(DaypartPairs { daypart, pairs })
        })
        .collect()
}

/// Sales of the `n` best-selling items broken down by daypart.
pub fn daypart_heatmap(dataset: &Dataset, filter: &TransactionFilter, n: usize) -> Heatmap {
    let items: Vec<String> = item_frequency(dataset, &filter.any_daypart())
        .top(n)
        .into_iter()
        .map(|(item, _)| item)
        .collect();

    let rows = Daypart::ALL
        .into_iter()
        .map(|daypart| {
            let freq = item_frequency(dataset, &filter.only_daypart(daypart));
            (daypart, items.iter().map(|item| freq.get(item)).collect())
        })
        .collect();

    Heatmap { items, rows }
}

/// Distinct item names, sorted, for the item filter widget.
pub fn item_options(dataset: &Dataset) -> Vec<String> {
    dataset
        .rows()
        .iter()
        .map(|r| r.item.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
