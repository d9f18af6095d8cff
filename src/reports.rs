use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{
    CanonicalRow, CategorySummary, Insights, PeakPerformance, StateGrowth, StateSummary,
};
use crate::util::{average, capitalize_first, month_label, sample_std_dev};

const RANKING_SIZE: usize = 5;

fn mean_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Percent change from `first` to `last`. A zero base is reported as no
/// growth rather than a division error.
fn growth_pct(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    }
}

/// Compute the full insights bundle from a canonical table.
///
/// Pure and deterministic: the same table always yields the same bundle.
/// All tie-breaks are fixed: the peak keeps the first row in table order,
/// and ranking ties fall back to name order.
///
/// # Panics
///
/// Panics if `table` is empty. The pipeline driver owns the empty-table
/// policy and never calls this without rows.
pub fn analyze(table: &[CanonicalRow]) -> Insights {
    assert!(!table.is_empty(), "analyze requires a non-empty table");

    let values: Vec<f64> = table.iter().map(|r| r.avg).collect();
    let overall_avg = average(&values);

    // The table is month-sorted, so the range is just the two ends.
    let min_month = table[0].month;
    let max_month = table[table.len() - 1].month;
    let date_range = format!("{} to {}", month_label(min_month), month_label(max_month));

    // Stable argmax: a strict comparison keeps the earliest row on ties.
    let mut peak_row = &table[0];
    for r in &table[1..] {
        if r.avg > peak_row.avg {
            peak_row = r;
        }
    }
    let peak = PeakPerformance {
        value: peak_row.avg,
        details: format!(
            "{} in {} ({})",
            capitalize_first(&peak_row.pop_group),
            peak_row.state,
            month_label(peak_row.month)
        ),
    };

    // Per-category summary. BTreeMap iteration is label-ascending, and the
    // sort below is stable, so equal means keep that order.
    let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in table {
        by_category.entry(&r.pop_group).or_default().push(r.avg);
    }
    let mut category_table: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(group, vals)| CategorySummary {
            pop_group: group.to_string(),
            mean: average(&vals),
            min: vals.iter().copied().fold(f64::INFINITY, f64::min),
            max: vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: sample_std_dev(&vals),
        })
        .collect();
    category_table.sort_by(|a, b| mean_desc(a.mean, b.mean));

    // Per-state values in table order, i.e. month-ascending per state.
    let mut by_state: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in table {
        by_state.entry(&r.state).or_default().push(r.avg);
    }
    let ranking: Vec<StateSummary> = by_state
        .iter()
        .map(|(state, vals)| StateSummary {
            state: state.to_string(),
            mean: average(vals),
            records: vals.len(),
        })
        .collect();
    let mut top_states = ranking.clone();
    top_states.sort_by(|a, b| mean_desc(a.mean, b.mean));
    top_states.truncate(RANKING_SIZE);
    let mut bottom_states = ranking;
    bottom_states.sort_by(|a, b| mean_desc(b.mean, a.mean));
    bottom_states.truncate(RANKING_SIZE);

    // Overall growth compares the global first and last months.
    let first_month_vals: Vec<f64> = table
        .iter()
        .filter(|r| r.month == min_month)
        .map(|r| r.avg)
        .collect();
    let last_month_vals: Vec<f64> = table
        .iter()
        .filter(|r| r.month == max_month)
        .map(|r| r.avg)
        .collect();
    let overall_growth = growth_pct(average(&first_month_vals), average(&last_month_vals));

    // Most improved compares each state's own earliest and latest recorded
    // value, which need not line up with the global month range. States
    // with a single observation cannot grow and are excluded.
    let mut most_improved = StateGrowth {
        state: "N/A".to_string(),
        growth: 0.0,
    };
    let mut best: Option<f64> = None;
    for (state, vals) in &by_state {
        if vals.len() < 2 {
            continue;
        }
        let growth = growth_pct(vals[0], vals[vals.len() - 1]);
        if best.map_or(true, |b| growth > b) {
            best = Some(growth);
            most_improved = StateGrowth {
                state: state.to_string(),
                growth,
            };
        }
    }

    Insights {
        date_range,
        total_records: table.len(),
        overall_avg,
        peak,
        category_table,
        top_states,
        bottom_states,
        overall_growth,
        most_improved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn row(state: &str, month: NaiveDate, group: &str, avg: f64) -> CanonicalRow {
        CanonicalRow {
            state: state.to_string(),
            month,
            pop_group: group.to_string(),
            avg,
        }
    }

    fn fixture() -> Vec<CanonicalRow> {
        vec![
            row("California", d(2024, 1), "urban", 10.0),
            row("Texas", d(2024, 1), "rural", 5.0),
            row("California", d(2024, 2), "urban", 20.0),
        ]
    }

    #[test]
    fn analyze_is_deterministic() {
        let table = fixture();
        assert_eq!(analyze(&table), analyze(&table));
    }

    #[test]
    fn analyze_computes_exact_summary_values() {
        let insights = analyze(&fixture());
        assert_eq!(insights.date_range, "Jan 2024 to Feb 2024");
        assert_eq!(insights.total_records, 3);
        assert_eq!(insights.overall_avg, 35.0 / 3.0);
        assert_eq!(insights.peak.value, 20.0);
        assert_eq!(insights.peak.details, "Urban in California (Feb 2024)");
        // First month holds both January rows, the last only February's.
        assert_eq!(insights.overall_growth, (20.0 - 7.5) / 7.5 * 100.0);
        assert_eq!(insights.most_improved.state, "California");
        assert_eq!(insights.most_improved.growth, 100.0);
    }

    #[test]
    fn category_table_sorts_by_mean_with_singleton_sentinel() {
        let insights = analyze(&fixture());
        assert_eq!(insights.category_table.len(), 2);
        let urban = &insights.category_table[0];
        assert_eq!(urban.pop_group, "urban");
        assert_eq!(urban.mean, 15.0);
        assert_eq!(urban.min, 10.0);
        assert_eq!(urban.max, 20.0);
        assert!(urban.std_dev.is_some());
        let rural = &insights.category_table[1];
        assert_eq!(rural.pop_group, "rural");
        assert_eq!(rural.std_dev, None);
    }

    #[test]
    fn category_ties_keep_label_order() {
        let table = vec![
            row("A", d(2024, 1), "zeta", 10.0),
            row("A", d(2024, 1), "alpha", 10.0),
        ];
        let insights = analyze(&table);
        assert_eq!(insights.category_table[0].pop_group, "alpha");
        assert_eq!(insights.category_table[1].pop_group, "zeta");
    }

    #[test]
    fn state_rankings_break_ties_by_name() {
        let table = vec![
            row("Utah", d(2024, 1), "urban", 10.0),
            row("Iowa", d(2024, 1), "urban", 10.0),
            row("Ohio", d(2024, 1), "urban", 3.0),
        ];
        let insights = analyze(&table);
        let top: Vec<&str> = insights.top_states.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(top, ["Iowa", "Utah", "Ohio"]);
        let bottom: Vec<&str> = insights
            .bottom_states
            .iter()
            .map(|s| s.state.as_str())
            .collect();
        assert_eq!(bottom, ["Ohio", "Iowa", "Utah"]);
    }

    #[test]
    fn peak_tie_selects_earliest_row() {
        let table = vec![
            row("Texas", d(2024, 1), "urban", 20.0),
            row("California", d(2024, 2), "rural", 20.0),
        ];
        let insights = analyze(&table);
        assert_eq!(insights.peak.details, "Urban in Texas (Jan 2024)");
    }

    #[test]
    fn zero_first_month_mean_yields_zero_growth() {
        let table = vec![
            row("California", d(2024, 1), "urban", 0.0),
            row("California", d(2024, 2), "urban", 12.0),
        ];
        let insights = analyze(&table);
        assert_eq!(insights.overall_growth, 0.0);
        // Same policy per state: a zero base never produces NaN/inf.
        assert_eq!(insights.most_improved.growth, 0.0);
    }

    #[test]
    fn single_observation_state_is_never_most_improved() {
        let table = vec![
            row("California", d(2024, 1), "urban", 10.0),
            row("California", d(2024, 2), "urban", 11.0),
            row("Texas", d(2024, 2), "urban", 900.0),
        ];
        let insights = analyze(&table);
        assert_eq!(insights.most_improved.state, "California");
    }

    #[test]
    fn no_qualifying_state_yields_sentinel() {
        let table = vec![
            row("California", d(2024, 1), "urban", 10.0),
            row("Texas", d(2024, 2), "urban", 20.0),
        ];
        let insights = analyze(&table);
        assert_eq!(insights.most_improved.state, "N/A");
        assert_eq!(insights.most_improved.growth, 0.0);
    }

    #[test]
    fn rankings_are_capped_at_five() {
        let mut table = Vec::new();
        for (i, state) in ["A", "B", "C", "D", "E", "F", "G"].into_iter().enumerate() {
            table.push(row(state, d(2024, 1), "urban", i as f64));
        }
        let insights = analyze(&table);
        assert_eq!(insights.top_states.len(), 5);
        assert_eq!(insights.bottom_states.len(), 5);
        assert_eq!(insights.top_states[0].state, "G");
        assert_eq!(insights.bottom_states[0].state, "A");
    }
}
