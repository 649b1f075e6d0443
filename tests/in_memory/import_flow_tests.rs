//! End-to-end bulk import through the public API.

use std::sync::Arc;

use rstest::rstest;
use tablon::import::adapters::memory::ScriptedClassifier;
use tablon::import::ports::{ClassifierResponse, IndexedVerdict};
use tablon::import::services::ImportRequest;
use tablon::task::domain::{Priority, Task, TaskId, TaskNumber, UserId};

use super::helpers::{importer, lifecycle, repository, seed_tasks};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_mixed_batch_partitions_displaces_and_reports() {
    let repo = repository();
    let board = lifecycle(&repo);
    seed_tasks(&board, 3).await;

    // The classifier flags the first candidate as a duplicate of seed 2.
    let classifier = Arc::new(ScriptedClassifier::new(ClassifierResponse::Verdicts(vec![
        IndexedVerdict {
            index: 0,
            is_duplicate: true,
            matched_existing_id: Some(2),
            reason: Some("misma tarea de reposición".to_owned()),
        },
    ])));
    let service = importer(&repo, Arc::clone(&classifier));

    let text = "2\tRestock the shelves\n3\tPaint the storefront\n\n9  Order new signage (URGENTE)";
    let result = service
        .import(ImportRequest::new(text, UserId::new(1)))
        .await
        .expect("import should succeed");

    assert_eq!(classifier.calls(), 1);
    assert_eq!(result.total_parsed(), 3);
    assert_eq!(result.total_created(), 2);
    assert_eq!(result.total_duplicates(), 1);

    let duplicate = result.duplicates().first().expect("one duplicate");
    assert_eq!(duplicate.title, "Restock the shelves");
    assert_eq!(duplicate.matched_existing_id, TaskId::new(2));

    let created: Vec<(&str, Option<u32>, Priority)> = result
        .created()
        .iter()
        .map(|task| {
            (
                task.title(),
                task.number().map(TaskNumber::value),
                task.priority(),
            )
        })
        .collect();
    assert_eq!(
        created,
        vec![
            ("Paint the storefront", Some(3), Priority::Medium),
            ("Order new signage", Some(9), Priority::Urgent),
        ]
    );

    // Seed 3 held the requested number 3 and was displaced to the
    // smallest number outside the reserved set {1,2,3,9}.
    let displaced = board
        .find_by_id(TaskId::new(3))
        .await
        .expect("lookup should succeed")
        .expect("seed 3 still exists");
    assert_eq!(displaced.number().map(TaskNumber::value), Some(4));

    let snapshot = board.active_tasks().await.expect("snapshot should succeed");
    let mut held: Vec<u32> = snapshot
        .iter()
        .filter_map(|summary| summary.number)
        .map(TaskNumber::value)
        .collect();
    held.sort_unstable();
    assert_eq!(held, vec![1, 2, 3, 4, 9]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn degraded_classification_still_annotates_reporting_fields() {
    let repo = repository();
    let board = lifecycle(&repo);
    seed_tasks(&board, 1).await;

    let service = importer(&repo, Arc::new(ScriptedClassifier::new(ClassifierResponse::Malformed)));
    let result = service
        .import(ImportRequest::new("4\tCount the register", UserId::new(1)))
        .await
        .expect("import should succeed");

    assert_eq!(result.total_duplicates(), 0);
    let created: Vec<&str> = result.created().iter().map(Task::title).collect();
    assert_eq!(created, vec!["Count the register"]);
}
