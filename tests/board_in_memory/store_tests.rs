//! In-memory integration tests for the task store contract.

use std::sync::Arc;

use super::helpers::{FixedClock, start_instant, store};
use chrono::{NaiveDate, Utc};
use rstest::rstest;
use taskboard::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        CreateTaskRequest, PersistedTaskData, Stage, TaskId, TaskPatch, TaskStatus, User, UserId,
    },
    ports::{TaskStore, TaskStoreError},
};

type Store = (InMemoryTaskStore<FixedClock>, Arc<FixedClock>);

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_receive_sequential_ids_and_clock_timestamps(store: Store) {
    let (store, _clock) = store;
    let draft = CreateTaskRequest::new("First")
        .validate()
        .expect("draft should validate");

    let first = store.create_task(&draft).await.expect("create should succeed");
    let second = store.create_task(&draft).await.expect("create should succeed");

    assert_eq!(first.id(), TaskId::new(1));
    assert_eq!(second.id(), TaskId::new(2));
    assert_eq!(first.created_at(), start_instant());
    assert_eq!(first.updated_at(), first.created_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_stamps_only_updated_at(store: Store) {
    let (store, clock) = store;
    let draft = CreateTaskRequest::new("Stamp me")
        .validate()
        .expect("draft should validate");
    let created = store.create_task(&draft).await.expect("create should succeed");

    clock.advance_secs(90);
    let updated = store
        .update_task(created.id(), &TaskPatch::status(Stage::Done))
        .await
        .expect("update should succeed");

    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(
        updated.updated_at() - created.updated_at(),
        chrono::Duration::seconds(90)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cleared_fields_become_null(store: Store) {
    let (store, _clock) = store;
    let due = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let draft = CreateTaskRequest::new("Scheduled")
        .with_due_date(due)
        .with_assignee(UserId::new(4))
        .validate()
        .expect("draft should validate");
    let created = store.create_task(&draft).await.expect("create should succeed");

    let patch = TaskPatch::new().with_due_date(None).with_assignee(None);
    let updated = store
        .update_task(created.id(), &patch)
        .await
        .expect("update should succeed");

    assert_eq!(updated.due_date(), None);
    assert_eq!(updated.assignee_id(), None);
    assert_eq!(updated.title(), "Scheduled");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_ids_report_not_found(store: Store) {
    let (store, _clock) = store;
    let missing = TaskId::new(77);

    let found = store.find_task(missing).await.expect("lookup should succeed");
    let updated = store
        .update_task(missing, &TaskPatch::new().with_progress(10))
        .await;
    let deleted = store.delete_task(missing).await;

    assert!(found.is_none());
    assert!(matches!(updated, Err(TaskStoreError::NotFound(id)) if id == missing));
    assert!(matches!(deleted, Err(TaskStoreError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_ids_are_never_reissued(store: Store) {
    let (store, _clock) = store;
    let now = Utc::now();
    store
        .seed_task(PersistedTaskData {
            id: TaskId::new(10),
            title: "Imported".to_owned(),
            description: None,
            status: TaskStatus::from("archived"),
            due_date: None,
            assignee_id: None,
            progress: 0,
            created_at: now,
            updated_at: now,
        })
        .expect("seed should succeed");
    let draft = CreateTaskRequest::new("Next")
        .validate()
        .expect("draft should validate");

    let created = store.create_task(&draft).await.expect("create should succeed");
    let listed = store.list_tasks().await.expect("list should succeed");

    assert_eq!(created.id(), TaskId::new(11));
    let ids: Vec<TaskId> = listed.iter().map(|task| task.id()).collect();
    assert_eq!(ids, vec![TaskId::new(10), TaskId::new(11)]);
    assert_eq!(listed.first().map(|task| task.stage()), Some(None));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_store_fails_every_call(store: Store) {
    let (store, _clock) = store;
    store
        .set_users([User::new(UserId::new(1), "Ayesha Khan", "ayesha@example.com")])
        .expect("users should be seeded");
    store.set_offline(true).expect("store should go offline");

    assert!(matches!(
        store.list_tasks().await,
        Err(TaskStoreError::Unavailable(_))
    ));
    assert!(matches!(
        store.list_users().await,
        Err(TaskStoreError::Unavailable(_))
    ));
    assert!(matches!(
        store.delete_task(TaskId::new(1)).await,
        Err(TaskStoreError::Unavailable(_))
    ));

    store.set_offline(false).expect("store should come back");
    let users = store.list_users().await.expect("list should succeed");
    assert_eq!(users.len(), 1);
}
