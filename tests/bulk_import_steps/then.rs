//! Then steps for bulk import behaviour scenarios.

use super::world::{ImportWorld, parse_number_list, run_async};
use rstest_bdd_macros::then;
use tablon::task::domain::TaskNumber;

#[then("the import succeeds with {created:usize} created tasks and {duplicates:usize} duplicates")]
fn import_succeeds_with_counts(
    world: &ImportWorld,
    created: usize,
    duplicates: usize,
) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing import result in scenario world"))?;
    let report = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected import failure: {err}"))?;

    eyre::ensure!(
        report.total_created() == created,
        "expected {created} created tasks, found {}",
        report.total_created()
    );
    eyre::ensure!(
        report.total_duplicates() == duplicates,
        "expected {duplicates} duplicates, found {}",
        report.total_duplicates()
    );
    Ok(())
}

#[then(r#"the created tasks hold numbers "{numbers}""#)]
fn created_tasks_hold_numbers(world: &ImportWorld, numbers: String) -> Result<(), eyre::Report> {
    let expected = parse_number_list(&numbers);
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing import result in scenario world"))?;
    let report = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected import failure: {err}"))?;

    let held: Vec<u32> = report
        .created()
        .iter()
        .filter_map(tablon::task::domain::Task::number)
        .map(TaskNumber::value)
        .collect();
    eyre::ensure!(
        held == expected,
        "expected created numbers {expected:?}, found {held:?}"
    );
    Ok(())
}

#[then(r#"the board holds active numbers "{numbers}""#)]
fn board_holds_active_numbers(world: &ImportWorld, numbers: String) -> Result<(), eyre::Report> {
    let expected = parse_number_list(&numbers);
    let snapshot = run_async(world.lifecycle.active_tasks())
        .map_err(|err| eyre::eyre!("snapshot failed: {err}"))?;

    let mut held: Vec<u32> = snapshot
        .iter()
        .filter_map(|summary| summary.number)
        .map(TaskNumber::value)
        .collect();
    held.sort_unstable();
    eyre::ensure!(
        held == expected,
        "expected active numbers {expected:?}, found {held:?}"
    );
    Ok(())
}
