use chrono::NaiveDate;

/// One cleaned observation: the only row shape the pipeline operates on.
///
/// Invariants are established by the loader and hold for every row it
/// returns: `state` is trimmed and title-cased, `pop_group` is trimmed,
/// lowercased and alias-resolved, `avg` is a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub state: String,
    pub month: NaiveDate,
    pub pop_group: String,
    pub avg: f64,
}

/// Rows sorted ascending by month (stable, so same-month rows keep their
/// store order). Built once per run and consumed read-only.
pub type CanonicalTable = Vec<CanonicalRow>;

#[derive(Debug, Clone, PartialEq)]
pub struct PeakPerformance {
    pub value: f64,
    /// Human-readable locator, e.g. `"Urban in California (Feb 2024)"`.
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub pop_group: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation. `None` when the group has a single
    /// observation and the statistic is undefined.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateSummary {
    pub state: String,
    pub mean: f64,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateGrowth {
    pub state: String,
    pub growth: f64,
}

/// Everything the report emitter needs, computed in one pass over the
/// canonical table. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub date_range: String,
    pub total_records: usize,
    pub overall_avg: f64,
    pub peak: PeakPerformance,
    /// Sorted by mean descending, ties by group label ascending.
    pub category_table: Vec<CategorySummary>,
    /// Top 5 states by mean, descending; ties by state name ascending.
    pub top_states: Vec<StateSummary>,
    /// Bottom 5 states by mean, ascending; ties by state name ascending.
    pub bottom_states: Vec<StateSummary>,
    /// Percent change between the first and last month's mean `avg`.
    pub overall_growth: f64,
    /// `("N/A", 0.0)` when no state has at least two observations.
    pub most_improved: StateGrowth,
}
