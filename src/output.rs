use tabled::{builder::Builder, settings::Style};

use crate::document;
use crate::types::{CategorySummary, StateSummary};

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let table = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table);
}

/// Markdown preview of the per-category summary, printed after a run so
/// the numbers are visible without opening the document.
pub fn preview_category_table(rows: &[CategorySummary]) {
    println!("\nPerformance by POP Group\n");
    print_table(&document::CATEGORY_HEADERS, &document::category_rows(rows));
}

pub fn preview_state_tables(top: &[StateSummary], bottom: &[StateSummary]) {
    println!("Top 5 Performing States\n");
    print_table(&document::STATE_HEADERS, &document::state_rows(top));
    println!("Bottom 5 Performing States\n");
    print_table(&document::STATE_HEADERS, &document::state_rows(bottom));
}
