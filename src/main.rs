// Entry point: one-shot report run against a CSV-backed store.
//
// Usage: wla-report [data.csv] [category labels...]
// Category labels, when given, filter the store query on its raw
// `pop_group` values (e.g. "Urban" "S - Urban" "Rural").
use std::env;
use std::path::Path;
use std::process;

use chrono::Local;

use wla_report::store::CsvStore;
use wla_report::{output, run, RunOutcome};

const DEFAULT_DATA_PATH: &str = "master_data.csv";

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let data_path = args.next().unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let categories: Vec<String> = args.collect();
    let category_refs: Vec<&str> = categories.iter().map(String::as_str).collect();
    let filter = if category_refs.is_empty() {
        None
    } else {
        Some(category_refs.as_slice())
    };

    let store = CsvStore::new(&data_path);
    match run(&store, filter, Path::new("."), Local::now().naive_local()) {
        Ok(RunOutcome::Written { path, insights }) => {
            output::preview_category_table(&insights.category_table);
            output::preview_state_tables(&insights.top_states, &insights.bottom_states);
            println!(
                "Report successfully generated and saved as '{}'",
                path.display()
            );
        }
        Ok(RunOutcome::NoData) => {
            println!("No data found. Report cannot be generated.");
        }
        Err(e) => {
            eprintln!("Report run failed: {}", e);
            process::exit(1);
        }
    }
}
