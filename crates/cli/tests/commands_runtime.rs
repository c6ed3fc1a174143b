use chrono::NaiveDate;
use clap::CommandFactory;

use rentora_cli::commands::{requests, reservations, CommandResult};

#[test]
fn cli_definition_is_internally_consistent() {
    rentora_cli::Cli::command().debug_assert();
}

#[test]
fn command_results_serialize_with_status_and_error_class() {
    let ok = CommandResult::success("doctor", "all good");
    assert_eq!(ok.exit_code, 0);
    let payload: serde_json::Value = serde_json::from_str(&ok.output).expect("json output");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["command"], "doctor");
    assert!(payload["error_class"].is_null());

    let failed = CommandResult::failure("seed", "storage", "disk full", 1);
    assert_eq!(failed.exit_code, 1);
    let payload: serde_json::Value = serde_json::from_str(&failed.output).expect("json output");
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "storage");
}

#[test]
fn accept_refuses_malformed_pricing_before_touching_storage() {
    let result = requests::accept("some-id", "not a tier map");
    assert_eq!(result.exit_code, 2);
    assert!(result.output.contains("validation"));

    let result = requests::accept("some-id", "{}");
    assert_eq!(result.exit_code, 2);
    assert!(result.output.contains("at least one tier"));
}

#[test]
fn reservation_add_refuses_inverted_date_ranges() {
    let start = NaiveDate::from_ymd_opt(2026, 8, 16).expect("date");
    let end = NaiveDate::from_ymd_opt(2026, 8, 14).expect("date");

    let result = reservations::add("audi-r8-v8", start, end);
    assert_eq!(result.exit_code, 2);
    assert!(result.output.contains("end date"));
}
