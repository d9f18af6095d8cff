// Dashboard collaborator seam: series preparation and the fit/predict
// contract a forecasting model plugs into. The dashboard itself (widgets,
// charts) lives outside this crate and calls in through these types.
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::error::ReportError;
use crate::types::CanonicalRow;
use crate::util::average;

/// Slider bounds for the forecast horizon, in months.
pub const HORIZON_MONTHS: RangeInclusive<u32> = 3..=36;

/// Two-column (date, value) time series, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Opaque time-series predictor: a series goes in, a predicted series
/// comes out. The model's internals are none of this crate's business.
pub trait Forecaster {
    fn fit(&mut self, series: &Series) -> Result<(), ReportError>;
    fn predict(&self, horizon_months: u32) -> Series;
}

/// Monthly mean series for one category across the selected states.
///
/// Fewer than two resulting points is an explicit insufficient-data
/// condition; the model must not be fit on it.
pub fn monthly_series(
    table: &[CanonicalRow],
    states: &[&str],
    category: &str,
) -> Result<Series, ReportError> {
    let mut by_month: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for r in table {
        if r.pop_group != category || !states.contains(&r.state.as_str()) {
            continue;
        }
        by_month.entry(r.month).or_default().push(r.avg);
    }
    let points: Vec<(NaiveDate, f64)> = by_month
        .into_iter()
        .map(|(month, vals)| (month, average(&vals)))
        .collect();
    if points.len() < 2 {
        return Err(ReportError::InsufficientData {
            category: category.to_string(),
            points: points.len(),
        });
    }
    Ok(Series { points })
}

/// Prepare the category's series and run it through the model. The
/// horizon is clamped to the supported range, the way the dashboard's
/// slider bounds it.
pub fn forecast_category(
    table: &[CanonicalRow],
    states: &[&str],
    category: &str,
    horizon_months: u32,
    model: &mut dyn Forecaster,
) -> Result<Series, ReportError> {
    let horizon = horizon_months.clamp(*HORIZON_MONTHS.start(), *HORIZON_MONTHS.end());
    let series = monthly_series(table, states, category)?;
    model.fit(&series)?;
    Ok(model.predict(horizon))
}
