//! Deduplication prompt rendering.

use crate::import::domain::ImportCandidate;
use crate::task::domain::TaskSummary;
use minijinja::{Environment, context};
use serde::Serialize;

/// Prompt sent to the model. Index correlation is explicit so the adapter
/// can re-associate verdicts regardless of response order.
const PROMPT_TEMPLATE: &str = "\
You are a task deduplication assistant for a business task management system.

EXISTING TASKS (already in the system):
{% for task in existing %}  ID={{ task.id }}, #{{ task.number }}: {{ task.title }}
{% endfor %}
INCOMING TASKS (being imported):
{% for task in incoming %}  INDEX={{ task.index }}, #{{ task.number }}: {{ task.title }}
{% endfor %}
For each INCOMING task, determine if it is a duplicate of an existing task. A task is a duplicate if:
- It describes the same work/action, even if worded slightly differently
- It refers to the same subject (e.g. same client, same product, same shipment)
- Minor differences in wording, capitalization, or extra details do NOT make it different

Be strict: if the core action and subject are the same, it's a duplicate.
If the tasks are about different subjects or different actions, they are NOT duplicates.

Return a JSON array with one object per incoming task, each with:
- \"index\": the INDEX number of the incoming task
- \"is_duplicate\": true/false
- \"matched_existing_id\": the ID of the matching existing task if duplicate, null otherwise
- \"reason\": short explanation (in Spanish) of why it's a duplicate or why it's new

Return ONLY the JSON array, no other text.";

#[derive(Serialize)]
struct ExistingRow<'a> {
    id: i64,
    number: String,
    title: &'a str,
}

#[derive(Serialize)]
struct IncomingRow<'a> {
    index: usize,
    number: String,
    title: &'a str,
}

/// Renders the deduplication prompt for one batch.
///
/// # Errors
///
/// Returns a [`minijinja::Error`] when template rendering fails.
pub fn render_prompt(
    existing: &[TaskSummary],
    incoming: &[ImportCandidate],
) -> Result<String, minijinja::Error> {
    let existing_rows: Vec<ExistingRow<'_>> = existing
        .iter()
        .map(|task| ExistingRow {
            id: task.id.value(),
            number: number_label(task.number.map(|number| number.value())),
            title: &task.title,
        })
        .collect();
    let incoming_rows: Vec<IncomingRow<'_>> = incoming
        .iter()
        .enumerate()
        .map(|(index, candidate)| IncomingRow {
            index,
            number: number_label(candidate.explicit_number.map(|number| number.value())),
            title: &candidate.title,
        })
        .collect();

    let mut environment = Environment::new();
    environment.add_template("dedup_prompt", PROMPT_TEMPLATE)?;
    let template = environment.get_template("dedup_prompt")?;
    template.render(context! {
        existing => existing_rows,
        incoming => incoming_rows,
    })
}

fn number_label(number: Option<u32>) -> String {
    number.map_or_else(|| "?".to_owned(), |value| value.to_string())
}
