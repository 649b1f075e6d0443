//! Unit tests for the free-text line parser.

use crate::import::domain::{ImportCandidate, parser::candidates};
use crate::task::domain::{Priority, TaskNumber};
use chrono::NaiveDate;
use rstest::rstest;

fn parse_all(text: &str) -> Vec<ImportCandidate> {
    candidates(text).collect()
}

fn parse_one(text: &str) -> ImportCandidate {
    let mut parsed = parse_all(text);
    assert_eq!(parsed.len(), 1, "expected exactly one candidate");
    parsed.remove(0)
}

fn explicit(candidate: &ImportCandidate) -> Option<u32> {
    candidate.explicit_number.map(TaskNumber::value)
}

#[rstest]
fn a_dated_urgent_line_and_a_terse_line_parse_together() {
    let parsed = parse_all("7\tFix invoice for Acme (URGENTE)\t05/03/2025\n9  Call supplier");
    assert_eq!(parsed.len(), 2);

    let first = parsed.first().expect("first candidate");
    assert_eq!(explicit(first), Some(7));
    assert_eq!(first.title, "Fix invoice for Acme");
    assert_eq!(first.priority, Priority::Urgent);
    assert_eq!(first.occurred_on, NaiveDate::from_ymd_opt(2025, 3, 5));

    let second = parsed.get(1).expect("second candidate");
    assert_eq!(explicit(second), Some(9));
    assert_eq!(second.title, "Call supplier");
    assert_eq!(second.priority, Priority::Medium);
    assert_eq!(second.occurred_on, None);
}

#[rstest]
#[case("14\tReconcile the ledger", Some(14), "Reconcile the ledger")]
#[case("14  Reconcile the ledger", Some(14), "Reconcile the ledger")]
#[case("14 Reconcile the ledger", Some(14), "Reconcile the ledger")]
#[case("Reconcile the ledger", None, "Reconcile the ledger")]
fn leading_numbers_are_extracted_across_separator_styles(
    #[case] line: &str,
    #[case] number: Option<u32>,
    #[case] title: &str,
) {
    let candidate = parse_one(line);
    assert_eq!(explicit(&candidate), number);
    assert_eq!(candidate.title, title);
}

#[rstest]
fn non_digit_first_field_folds_back_into_the_title() {
    let candidate = parse_one("Acme  follow-up call");
    assert_eq!(explicit(&candidate), None);
    assert_eq!(candidate.title, "Acme  follow-up call");
}

#[rstest]
fn out_of_range_digit_run_is_consumed_without_a_number() {
    let candidate = parse_one("0\tCheck the stock levels");
    assert_eq!(explicit(&candidate), None);
    assert_eq!(candidate.title, "Check the stock levels");
}

#[rstest]
#[case("12\tShip pallets (URGENTE)")]
#[case("12\tShip pallets (urgente)")]
#[case("12\tShip pallets (Urgente) and whatever follows")]
fn urgency_marker_sets_priority_and_truncates_the_title(#[case] line: &str) {
    let candidate = parse_one(line);
    assert_eq!(candidate.priority, Priority::Urgent);
    assert_eq!(candidate.title, "Ship pallets");
}

#[rstest]
fn marker_only_line_is_skipped() {
    assert!(parse_all("(URGENTE)").is_empty());
}

#[rstest]
#[case("05/03/2025", 2025, 3, 5)]
#[case("5-3-2025", 2025, 3, 5)]
#[case("2025-03-05", 2025, 3, 5)]
#[case("2025/3/5", 2025, 3, 5)]
#[case("31/12/2024", 2024, 12, 31)]
fn trailing_date_fields_are_extracted(
    #[case] field: &str,
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
) {
    let candidate = parse_one(&format!("3\tSend the statement\t{field}"));
    assert_eq!(candidate.title, "Send the statement");
    assert_eq!(
        candidate.occurred_on,
        NaiveDate::from_ymd_opt(year, month, day)
    );
}

#[rstest]
#[case("13/13/2025")]
#[case("32/01/2025")]
#[case("31/04/2025")]
#[case("00/01/2025")]
fn calendar_invalid_fields_stay_in_the_title(#[case] field: &str) {
    let candidate = parse_one(&format!("3\tSend the statement\t{field}"));
    assert_eq!(candidate.occurred_on, None);
    assert!(candidate.title.contains(field));
}

#[rstest]
fn a_lone_date_line_is_not_a_date_field() {
    // Date extraction needs at least two tab fields.
    let candidate = parse_one("05/03/2025");
    assert_eq!(candidate.occurred_on, None);
    assert_eq!(candidate.title, "05/03/2025");
}

#[rstest]
fn blank_and_titleless_lines_are_skipped() {
    let parsed = parse_all("\n   \n4\tReal work\n\t\n");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.first().map(|c| c.title.as_str()), Some("Real work"));
}

#[rstest]
fn input_order_is_preserved() {
    let titles: Vec<String> = parse_all("1\tAlpha\n2\tBeta\n3\tGamma")
        .into_iter()
        .map(|candidate| candidate.title)
        .collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
}

#[rstest]
fn the_sequence_is_restartable() {
    let text = "5\tRepeatable line";
    let first_pass = parse_all(text);
    let second_pass = parse_all(text);
    assert_eq!(first_pass, second_pass);
}
