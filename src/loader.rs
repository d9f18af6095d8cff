use std::collections::HashMap;

use log::{info, warn};
use once_cell::sync::Lazy;

use crate::error::ReportError;
use crate::store::{RowStore, EXPECTED_COLUMNS};
use crate::types::{CanonicalRow, CanonicalTable};
use crate::util::{format_int, parse_date_safe, parse_f64_safe, title_case};

// Raw category labels that map to something other than their plain
// lowercased form. Applied after trimming and lowercasing.
static CATEGORY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("s - urban", "s-urban");
    m
});

/// Canonical form of a raw category label: trimmed, lowercased, aliases
/// resolved. Idempotent, so already-canonical labels pass through.
pub fn normalize_category(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match CATEGORY_ALIASES.get(lowered.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => lowered,
    }
}

/// Fetch raw rows from the store and normalize them into the canonical
/// table.
///
/// Rows with an unparsable month, a non-numeric `avg`, or any missing
/// field are dropped, never defaulted. The surviving rows come back
/// sorted ascending by month; same-month rows keep their store order.
///
/// An empty table is a valid result, not an error: deciding what an empty
/// run means is the caller's policy.
pub fn load(
    store: &dyn RowStore,
    categories: Option<&[&str]>,
) -> Result<CanonicalTable, ReportError> {
    let rowset = store.fetch_rows(categories)?;

    let mut indices = [0usize; EXPECTED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(EXPECTED_COLUMNS) {
        *slot = rowset
            .column_index(name)
            .ok_or_else(|| ReportError::Schema(name.to_string()))?;
    }
    let [state_idx, month_idx, group_idx, avg_idx] = indices;

    let total = rowset.rows.len();
    let mut table: CanonicalTable = Vec::with_capacity(total);
    let mut dropped = 0usize;
    for row in &rowset.rows {
        let field = |idx: usize| row.get(idx).and_then(|c| c.as_deref());

        let Some(month) = parse_date_safe(field(month_idx)) else {
            dropped += 1;
            continue;
        };
        let Some(state) = field(state_idx).map(|s| title_case(s.trim())) else {
            dropped += 1;
            continue;
        };
        let Some(pop_group) = field(group_idx).map(normalize_category) else {
            dropped += 1;
            continue;
        };
        let Some(avg) = parse_f64_safe(field(avg_idx)) else {
            dropped += 1;
            continue;
        };

        table.push(CanonicalRow {
            state,
            month,
            pop_group,
            avg,
        });
    }

    // Stable, so rows within a month keep their original relative order.
    table.sort_by_key(|r| r.month);

    info!(
        "loaded {} of {} rows from the store",
        format_int(table.len() as i64),
        format_int(total as i64)
    );
    if dropped > 0 {
        warn!(
            "{} rows dropped due to parse/validation errors",
            format_int(dropped as i64)
        );
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn row(state: &str, month: &str, group: &str, avg: &str) -> Vec<Option<String>> {
        vec![cell(state), cell(month), cell(group), cell(avg)]
    }

    fn columns() -> Vec<String> {
        ["state", "month", "pop_group", "avg"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn category_aliases_are_idempotent() {
        assert_eq!(normalize_category("S - Urban"), "s-urban");
        assert_eq!(normalize_category("s-urban"), "s-urban");
        assert_eq!(normalize_category(" s - urban "), "s-urban");
        assert_eq!(normalize_category(" Rural "), "rural");
    }

    #[test]
    fn load_normalizes_and_sorts_by_month() {
        let store = MemoryStore::new(
            columns(),
            vec![
                row("  texas ", "2024-02-01", "Rural", "5"),
                row("CALIFORNIA", "2024-01-01", "S - Urban", "1,200.50"),
            ],
        );
        let table = load(&store, None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].state, "California");
        assert_eq!(table[0].pop_group, "s-urban");
        assert_eq!(table[0].avg, 1200.5);
        assert_eq!(table[1].state, "Texas");
    }

    #[test]
    fn load_drops_bad_rows_instead_of_defaulting() {
        let store = MemoryStore::new(
            columns(),
            vec![
                row("California", "not-a-date", "Urban", "10"),
                row("California", "2024-01-01", "Urban", "oops"),
                vec![cell("California"), cell("2024-01-01"), None, cell("10")],
                row("California", "2024-01-01", "Urban", "10"),
            ],
        );
        let table = load(&store, None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].avg, 10.0);
    }

    #[test]
    fn load_keeps_store_order_within_a_month() {
        let store = MemoryStore::new(
            columns(),
            vec![
                row("Texas", "2024-01-01", "Urban", "1"),
                row("Alabama", "2024-01-01", "Urban", "2"),
                row("Nevada", "2023-12-01", "Urban", "3"),
            ],
        );
        let table = load(&store, None).unwrap();
        let order: Vec<&str> = table.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(order, ["Nevada", "Texas", "Alabama"]);
    }

    #[test]
    fn load_rejects_missing_columns() {
        let store = MemoryStore::new(
            vec!["state".into(), "month".into(), "avg".into()],
            vec![vec![cell("California"), cell("2024-01-01"), cell("10")]],
        );
        match load(&store, None) {
            Err(ReportError::Schema(col)) => assert_eq!(col, "pop_group"),
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn load_returns_empty_table_for_empty_store() {
        let store = MemoryStore::new(columns(), Vec::new());
        assert!(load(&store, None).unwrap().is_empty());
    }
}
