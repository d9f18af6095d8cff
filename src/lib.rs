//! Time-series aggregation and reporting pipeline for WLA regional
//! performance metrics.
//!
//! Data flows one way: raw store rows are normalized into a canonical
//! table, the table is analyzed into an insights bundle, and the bundle
//! is rendered into a paginated document. Nothing is shared or cached
//! between runs; each run owns its own table and insights.

pub mod document;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod output;
pub mod render;
pub mod reports;
pub mod store;
pub mod types;
pub mod util;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::info;

use crate::error::ReportError;
use crate::render::{PageChrome, RenderSurface, TextSurface};
use crate::store::RowStore;
use crate::types::Insights;

/// How a pipeline run ended. An empty store is a normal terminal outcome,
/// reported distinctly from failure: no document is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoData,
    Written { path: PathBuf, insights: Insights },
}

/// Run the full pipeline: load, analyze, render, save.
///
/// The output filename embeds `now` so repeated runs never overwrite each
/// other. This function is the only place that decides what an empty
/// table means; the analyzer below it can assume rows exist.
pub fn run(
    store: &dyn RowStore,
    categories: Option<&[&str]>,
    out_dir: &Path,
    now: NaiveDateTime,
) -> Result<RunOutcome, ReportError> {
    let table = loader::load(store, categories)?;
    if table.is_empty() {
        info!("no rows matched; skipping report generation");
        return Ok(RunOutcome::NoData);
    }

    let insights = reports::analyze(&table);

    let mut surface = TextSurface::new(PageChrome {
        title: document::REPORT_TITLE.to_string(),
        generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    });
    document::render(&insights, &mut surface);

    let filename = format!("wla_historical_report_{}.txt", now.format("%Y%m%d_%H%M%S"));
    let path = out_dir.join(filename);
    surface.save(&path)?;
    info!("report written to {}", path.display());

    Ok(RunOutcome::Written { path, insights })
}
