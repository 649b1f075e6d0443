//! When steps for bulk import behaviour scenarios.

use super::world::{ImportWorld, run_async};
use rstest_bdd_macros::when;

#[when("the pasted text is imported")]
fn import_pasted_text(world: &mut ImportWorld) {
    let request = world.import_request();
    world.last_result = Some(run_async(world.importer.import(request)));
}
