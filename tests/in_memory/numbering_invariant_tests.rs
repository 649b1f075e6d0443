//! Number uniqueness and packing across mixed lifecycle operations.

use std::sync::Arc;

use rstest::rstest;
use tablon::import::adapters::memory::ScriptedClassifier;
use tablon::import::services::ImportRequest;
use tablon::task::domain::{TaskId, TaskNumber, TaskStatus, UserId};
use tablon::task::services::CreateTaskRequest;

use super::helpers::{
    assert_compact_numbering, importer, lifecycle, repository, seed_tasks, sweeper,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn numbers_stay_unique_and_packed_across_mixed_operations() {
    let repo = repository();
    let board = lifecycle(&repo);
    seed_tasks(&board, 4).await;

    // Release number 2 and immediately refill the gap.
    board
        .change_status(TaskId::new(2), TaskStatus::Archived)
        .await
        .expect("archival should succeed");
    let refill = board
        .create(CreateTaskRequest::new("Refill the gap", UserId::new(1)))
        .await
        .expect("task creation should succeed");
    assert_eq!(refill.number().map(TaskNumber::value), Some(2));

    // Import explicit numbers 5 and 6 on top of holders {1,2,3,4}.
    let service = importer(&repo, Arc::new(ScriptedClassifier::unavailable()));
    service
        .import(ImportRequest::new(
            "5\tPlan the stocktake\n6\tBrief the night shift",
            UserId::new(1),
        ))
        .await
        .expect("import should succeed");

    let snapshot = board.active_tasks().await.expect("snapshot should succeed");
    assert_eq!(snapshot.len(), 6);
    assert_compact_numbering(&snapshot);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_release_and_unarchival_keep_the_namespace_compact() {
    let repo = repository();
    let board = lifecycle(&repo);
    seed_tasks(&board, 3).await;

    // Finish seed 1 and let the zero-retention sweep retire it.
    board
        .change_status(TaskId::new(1), TaskStatus::Done)
        .await
        .expect("completion should succeed");
    let archived = sweeper(&repo, 0).sweep().await.expect("sweep should succeed");
    assert_eq!(archived, 1);

    // The freed number 1 is the next allocation target.
    let next = board.next_number().await.expect("next number should succeed");
    assert_eq!(next.value(), 1);
    board
        .create(CreateTaskRequest::new("Backfill the slot", UserId::new(1)))
        .await
        .expect("task creation should succeed");

    // Reviving the swept task pushes it to the smallest free slot.
    let revived = board
        .change_status(TaskId::new(1), TaskStatus::Pending)
        .await
        .expect("un-archival should succeed");
    assert_eq!(revived.number().map(TaskNumber::value), Some(4));

    let snapshot = board.active_tasks().await.expect("snapshot should succeed");
    assert_eq!(snapshot.len(), 4);
    assert_compact_numbering(&snapshot);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn numberless_imports_fill_gaps_before_extending_the_range() {
    let repo = repository();
    let board = lifecycle(&repo);
    seed_tasks(&board, 4).await;
    board
        .change_status(TaskId::new(1), TaskStatus::Archived)
        .await
        .expect("archival should succeed");

    let service = importer(&repo, Arc::new(ScriptedClassifier::unavailable()));
    let result = service
        .import(ImportRequest::new(
            "Walk the floor\nCheck the loading dock",
            UserId::new(1),
        ))
        .await
        .expect("import should succeed");

    let numbers: Vec<u32> = result
        .created()
        .iter()
        .filter_map(tablon::task::domain::Task::number)
        .map(TaskNumber::value)
        .collect();
    assert_eq!(numbers, vec![1, 5]);

    let snapshot = board.active_tasks().await.expect("snapshot should succeed");
    assert_compact_numbering(&snapshot);
}
