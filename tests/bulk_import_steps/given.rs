//! Given steps for bulk import behaviour scenarios.

use super::world::{ImportWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tablon::task::services::CreateTaskRequest;

#[given("an empty task board")]
fn empty_task_board(world: &mut ImportWorld) {
    let _ = world;
}

#[given("a task board seeded with {count:usize} tasks")]
fn seeded_task_board(world: &mut ImportWorld, count: usize) -> Result<(), eyre::Report> {
    for index in 1..=count {
        run_async(
            world
                .lifecycle
                .create(CreateTaskRequest::new(format!("Seed task {index}"), world.requester)),
        )
        .wrap_err("seed task creation")?;
    }
    Ok(())
}

#[given(r#"a line requesting number {number:u32} titled "{title}""#)]
fn line_with_number(world: &mut ImportWorld, number: u32, title: String) {
    world.pending_lines.push(format!("{number}\t{title}"));
}

#[given("an unavailable classifier")]
fn unavailable_classifier(world: &mut ImportWorld) {
    // The world's classifier is scripted as unavailable by construction.
    let _ = world;
}
