// Report emitter: turns an insights bundle into a paginated document on
// an abstract rendering surface. Layout decisions live here; drawing a
// cell is the surface's problem.
use crate::render::{Align, FontStyle, RenderSurface};
use crate::types::{CategorySummary, Insights, StateSummary};

pub const REPORT_TITLE: &str = "WLA Historical Performance Analysis";

pub const CATEGORY_HEADERS: [&str; 5] = [
    "POP Group",
    "Mean Avg",
    "Min Avg",
    "Max Avg",
    "Volatility (Std Dev)",
];
pub const STATE_HEADERS: [&str; 3] = ["State", "Mean Avg", "Record Count"];

const NO_DATA_PLACEHOLDER: &str = "No data available for this section.";

const KPI_LABEL_WIDTH: usize = 26;

fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

/// Category table cells, numeric columns to two decimals; a singleton
/// group's undefined volatility renders as "N/A".
pub fn category_rows(rows: &[CategorySummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.pop_group.clone(),
                fmt2(r.mean),
                fmt2(r.min),
                fmt2(r.max),
                r.std_dev.map(fmt2).unwrap_or_else(|| "N/A".to_string()),
            ]
        })
        .collect()
}

pub fn state_rows(rows: &[StateSummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| vec![r.state.clone(), fmt2(r.mean), r.records.to_string()])
        .collect()
}

fn chapter_title(surface: &mut dyn RenderSurface, title: &str) {
    surface.set_font(FontStyle::Bold, 12);
    surface.cell(0, title, false, Align::Left, true);
    surface.line_break();
}

fn kpi_box(surface: &mut dyn RenderSurface, label: &str, value: &str, description: &str) {
    surface.set_font(FontStyle::Regular, 10);
    surface.cell(KPI_LABEL_WIDTH, label, true, Align::Left, false);
    surface.set_font(FontStyle::Bold, 10);
    surface.cell(0, value, true, Align::Left, true);
    surface.set_font(FontStyle::Italic, 9);
    surface.multi_cell(&format!("({})", description));
    surface.line_break();
}

/// Generic table rule: equal column split of the content width, bordered
/// centered cells, bold header row. An empty table renders a single
/// placeholder row instead of a header with no body.
fn simple_table(surface: &mut dyn RenderSurface, headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        surface.cell(0, NO_DATA_PLACEHOLDER, false, Align::Left, true);
        return;
    }
    let col_width = surface.content_width() / headers.len();
    surface.set_font(FontStyle::Bold, 9);
    for (i, header) in headers.iter().enumerate() {
        surface.cell(col_width, header, true, Align::Center, i + 1 == headers.len());
    }
    surface.set_font(FontStyle::Regular, 9);
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            surface.cell(col_width, value, true, Align::Center, i + 1 == row.len());
        }
    }
}

/// Render the full report onto `surface`: executive summary KPIs, then
/// the per-category and per-state sections. Saving the surface to its
/// final destination is the caller's concern.
pub fn render(insights: &Insights, surface: &mut dyn RenderSurface) {
    surface.add_page();

    chapter_title(surface, "Executive Summary");
    kpi_box(
        surface,
        "Data Range Analyzed",
        &insights.date_range,
        "The start and end dates of the data included.",
    );
    kpi_box(
        surface,
        "Overall Average `avg`",
        &fmt2(insights.overall_avg),
        "The mean `avg` across all states, pop groups, and months.",
    );
    kpi_box(
        surface,
        "Peak Performance",
        &fmt2(insights.peak.value),
        &format!("Achieved by {}.", insights.peak.details),
    );
    kpi_box(
        surface,
        "Overall Growth",
        &format!("{}%", fmt2(insights.overall_growth)),
        "Percentage change in avg `avg` from the first to the last month.",
    );
    kpi_box(
        surface,
        "Most Improved State",
        &format!(
            "{} ({}%)",
            insights.most_improved.state,
            fmt2(insights.most_improved.growth)
        ),
        "State with the highest percentage growth over the entire period.",
    );
    surface.line_break();

    chapter_title(surface, "Performance by POP Group");
    surface.set_font(FontStyle::Regular, 10);
    surface.multi_cell(
        "This section details the performance metrics for each population group, \
         highlighting average performance and volatility.",
    );
    surface.line_break();
    simple_table(surface, &CATEGORY_HEADERS, &category_rows(&insights.category_table));
    surface.line_break();

    chapter_title(surface, "Performance by State");
    surface.set_font(FontStyle::Regular, 10);
    surface.multi_cell(
        "The following tables rank states by their average `avg` to identify top \
         performers and areas for potential improvement.",
    );
    surface.line_break();

    surface.set_font(FontStyle::Bold, 10);
    surface.cell(0, "Top 5 Performing States", false, Align::Left, true);
    simple_table(surface, &STATE_HEADERS, &state_rows(&insights.top_states));
    surface.line_break();

    surface.set_font(FontStyle::Bold, 10);
    surface.cell(0, "Bottom 5 Performing States", false, Align::Left, true);
    simple_table(surface, &STATE_HEADERS, &state_rows(&insights.bottom_states));
}
