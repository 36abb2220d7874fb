//! Offline catalog commands: classify and list.
//!
//! Both build the same [`CatalogApp`] the server uses, so results match what
//! `/predict` and `/vehicles` would return.

use std::process::ExitCode;

use serde::Serialize;

use crate::app::CatalogApp;
use crate::catalog::VehicleRow;
use crate::config::Settings;
use crate::error::CatalogError;
use crate::paging::Page;

/// Process exit status for a failed command, by error class.
fn exit_status(error: &CatalogError) -> u8 {
    if error.is_user_error() {
        2
    } else if error.is_unavailable() {
        3
    } else {
        1
    }
}

fn fail(error: CatalogError) -> ExitCode {
    eprintln!("Error: {error}");
    ExitCode::from(exit_status(&error))
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_rows(page: &Page<VehicleRow>) {
    if page.is_empty() {
        println!("  (no vehicles on this page)");
        return;
    }
    for row in &page.items {
        println!(
            "  {:<32} {:>16}  {} seats  [{}]",
            row.full_name, row.price, row.seats, row.cluster_name
        );
    }
}

/// Run the classify command.
pub fn run_classify(price: &str, seats: &str, page: usize, json: bool, config: &Settings) -> ExitCode {
    let app = CatalogApp::from_settings(config);

    let prediction = match app.predict(price, seats, page) {
        Ok(prediction) => prediction,
        Err(e) => return fail(e),
    };

    if json {
        return print_json(&prediction);
    }

    println!(
        "Segment: {} (cluster {})",
        prediction.label, prediction.cluster_id
    );
    println!(
        "Normalized input: price={} seats={}",
        prediction.price, prediction.seats
    );
    println!(
        "Matching vehicles: {} (page {}/{})",
        prediction.vehicles.total_items,
        prediction.vehicles.page,
        prediction.vehicles.total_pages
    );
    print_rows(&prediction.vehicles);
    ExitCode::SUCCESS
}

/// Run the list command.
pub fn run_list(page: usize, json: bool, config: &Settings) -> ExitCode {
    let app = CatalogApp::from_settings(config);

    let listing = match app.list_page(page) {
        Ok(listing) => listing,
        Err(e) => return fail(e),
    };

    if json {
        return print_json(&listing);
    }

    println!(
        "Catalog page {}/{} ({} vehicles)",
        listing.page, listing.total_pages, listing.total_items
    );
    println!("{}", "=".repeat(50));
    print_rows(&listing);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_by_error_class() {
        assert_eq!(exit_status(&CatalogError::InvalidInput("bad".into())), 2);
        assert_eq!(exit_status(&CatalogError::ModelUnavailable), 3);
        assert_eq!(
            exit_status(&CatalogError::corrupt("orders.json", "truncated")),
            1
        );
    }
}
