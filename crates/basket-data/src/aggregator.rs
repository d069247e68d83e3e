//! Basket aggregations over a filtered [`Dataset`].
//!
//! Every function is pure: it reads the shared dataset, applies the
//! [`TransactionFilter`] row by row and returns a freshly built table. An
//! empty selection yields an empty table, never an error.

use std::collections::{BTreeSet, HashMap, HashSet};

use basket_core::models::{
    CooccurrenceTable, Dataset, DaypartBreakdown, FrequencyTable, Transaction, TransactionFilter,
};

// ── Grouping ──────────────────────────────────────────────────────────────────

/// Filter-passing rows of one transaction.
#[derive(Debug, Clone)]
pub struct Basket<'a> {
    pub transaction_id: u64,
    pub rows: Vec<&'a Transaction>,
}

impl Basket<'_> {
    /// Distinct item names in this basket, sorted.
    pub fn distinct_items(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.item.as_str()).collect()
    }
}

/// Group filter-passing rows by `transaction_id`, in first-seen order.
pub fn baskets<'a>(dataset: &'a Dataset, filter: &TransactionFilter) -> Vec<Basket<'a>> {
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut baskets: Vec<Basket<'a>> = Vec::new();

    for row in dataset.rows().iter().filter(|r| filter.matches(r)) {
        match index.get(&row.transaction_id) {
            Some(&i) => baskets[i].rows.push(row),
            None => {
                index.insert(row.transaction_id, baskets.len());
                baskets.push(Basket {
                    transaction_id: row.transaction_id,
                    rows: vec![row],
                });
            }
        }
    }

    baskets
}

// ── Item frequency ────────────────────────────────────────────────────────────

/// Number of filter-passing rows per item.
pub fn item_frequency(dataset: &Dataset, filter: &TransactionFilter) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for row in dataset.rows().iter().filter(|r| filter.matches(r)) {
        table.add(&row.item);
    }
    table
}

/// The `n` most purchased items. Ties keep the order items first appear in
/// the dataset.
pub fn top_n_items(dataset: &Dataset, filter: &TransactionFilter, n: usize) -> Vec<(String, u64)> {
    item_frequency(dataset, filter).top(n)
}

// ── Co-occurrence ─────────────────────────────────────────────────────────────

/// Count, for every unordered pair of distinct items, the transactions in
/// which both appear among the filter-passing rows.
///
/// Duplicate rows of the same item within a transaction count once.
pub fn co_occurrence(dataset: &Dataset, filter: &TransactionFilter) -> CooccurrenceTable {
    let mut table = CooccurrenceTable::new();

    for basket in baskets(dataset, filter) {
        let items: Vec<&str> = basket.distinct_items().into_iter().collect();
        if items.len() < 2 {
            continue;
        }
        for (i, first) in items.iter().enumerate() {
            for second in &items[i + 1..] {
                table.increment(first, second);
            }
        }
    }

    table
}

// ── Daypart volume ────────────────────────────────────────────────────────────

/// Distinct filter-passing transactions per daypart.
///
/// A transaction is attributed to the daypart of its first passing row, so
/// the counts add up to the number of distinct transactions.
pub fn day_part_volume(dataset: &Dataset, filter: &TransactionFilter) -> DaypartBreakdown {
    let mut breakdown = DaypartBreakdown::new();
    let mut seen: HashSet<u64> = HashSet::new();

    for row in dataset.rows().iter().filter(|r| filter.matches(r)) {
        if seen.insert(row.transaction_id) {
            breakdown.increment(row.daypart);
        }
    }

    breakdown
}

/// Distinct filter-passing transactions.
pub fn transaction_count(dataset: &Dataset, filter: &TransactionFilter) -> usize {
    dataset
        .rows()
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| r.transaction_id)
        .collect::<HashSet<_>>()
        .len()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
