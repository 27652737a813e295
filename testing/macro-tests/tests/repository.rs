use cqlmap::{
    codec::ColumnType,
    config::RepositoryConfig,
    error::Error,
    repository::{Key, Repository},
    session::{MemorySession, StoreError},
};
use cqlmap_macro_tests::{Measurement, Orphan, Tag, User};
use std::{collections::HashSet, sync::Arc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

async fn user_repository(session: &Arc<MemorySession>) -> Repository<User, MemorySession> {
    let mut repo = Repository::new(Arc::clone(session)).unwrap();
    repo.initialize().await.unwrap();

    repo
}

async fn measurement_repository(
    session: &Arc<MemorySession>,
) -> Repository<Measurement, MemorySession> {
    let mut repo = Repository::new(Arc::clone(session)).unwrap();
    repo.initialize().await.unwrap();

    repo
}

#[tokio::test]
async fn bob_scenario() {
    let session = Arc::new(MemorySession::new().with_keyspace("app"));
    let repo = user_repository(&session).await;
    let user_id = Uuid::new_v4();
    let bob = User {
        email: "bob@example.com".to_string(),
        name: "Bob".to_string(),
        user_id,
    };

    repo.upsert(&bob).await.unwrap();
    let loaded = repo.get_by_id("bob@example.com").await.unwrap();
    assert_eq!(loaded, Some(bob));

    repo.delete("bob@example.com").await.unwrap();
    assert_eq!(repo.get_by_id("bob@example.com").await.unwrap(), None);
}

#[tokio::test]
async fn every_column_type_round_trips() {
    let session = Arc::new(MemorySession::new());
    let repo = measurement_repository(&session).await;

    let mut measurement = Measurement::new("north", 12);
    measurement.peak = Some(3.25);
    measurement.batch = Some(Uuid::new_v4());
    repo.upsert(&measurement).await.unwrap();

    let loaded = repo.get_by_id(Key::entity(&measurement)).await.unwrap();
    assert_eq!(loaded, Some(measurement));
}

#[tokio::test]
async fn raw_identifier_column_round_trips() {
    let session = Arc::new(MemorySession::new());
    let mut repo = Repository::<Tag, _>::new(Arc::clone(&session)).unwrap();
    repo.initialize().await.unwrap();

    let text = repo.statement_text().unwrap();
    assert!(text.create_table.contains(" type text"));
    assert!(!text.insert.contains("r#type"));

    let tag = Tag {
        id: 4,
        scope: "global".to_string(),
        r#type: "label".to_string(),
    };
    repo.upsert(&tag).await.unwrap();

    let columns = session.table_columns("app", "tags").unwrap();
    assert_eq!(columns[2], ("type".to_string(), ColumnType::Text));
    assert_eq!(
        repo.get_by_id(("global".to_string(), 4_i32)).await.unwrap(),
        Some(tag)
    );
}

#[tokio::test]
async fn generated_table_matches_the_entity() {
    let session = Arc::new(MemorySession::new());
    let repo = measurement_repository(&session).await;
    let text = repo.statement_text().unwrap();

    assert_eq!(
        text.delete_by_key,
        "DELETE FROM telemetry.measurements WHERE \"station-id\" = ? AND day = ?"
    );

    let columns = session.table_columns("telemetry", "measurements").unwrap();
    assert_eq!(columns.len(), 9);
    assert_eq!(columns[1], ("station-id".to_string(), ColumnType::Text));
    assert_eq!(columns[3], ("peak".to_string(), ColumnType::Float));
    assert_eq!(columns[8], ("localTime".to_string(), ColumnType::Timestamp));
}

#[tokio::test]
async fn composite_key_shape_is_checked() {
    let session = Arc::new(MemorySession::new());
    let repo = measurement_repository(&session).await;
    let measurement = Measurement::new("south", 3);
    repo.upsert(&measurement).await.unwrap();

    assert!(matches!(
        repo.get_by_id("south").await,
        Err(Error::KeyShapeMismatch {
            expected: 2,
            found: 1
        })
    ));
    assert!(matches!(
        repo.get_by_id(("south".to_string(), 3_i32, 0_i32)).await,
        Err(Error::KeyShapeMismatch {
            expected: 2,
            found: 3
        })
    ));

    let loaded = repo
        .get_by_id(("south".to_string(), 3_i32))
        .await
        .unwrap();
    assert_eq!(loaded, Some(measurement));
}

#[tokio::test]
async fn delete_then_get_is_none() {
    let session = Arc::new(MemorySession::new());
    let repo = measurement_repository(&session).await;
    let measurement = Measurement::new("east", 9);

    repo.upsert(&measurement).await.unwrap();
    repo.delete(Key::entity(&measurement)).await.unwrap();

    assert_eq!(repo.get_by_id(Key::entity(&measurement)).await.unwrap(), None);
    assert_eq!(session.row_count("telemetry", "measurements"), Some(0));
}

#[tokio::test]
async fn list_respects_limit() {
    let session = Arc::new(MemorySession::new().with_keyspace("app"));
    let repo = user_repository(&session).await;

    let mut emails = HashSet::new();
    for i in 0..20 {
        let user = User::new(&format!("user{i}@example.com"), "User");
        emails.insert(user.email.clone());
        repo.upsert(&user).await.unwrap();
    }

    let page = repo.list(Some(5)).await.unwrap();
    assert!(page.len() <= 5);
    assert!(page.iter().all(|user| emails.contains(&user.email)));

    let all = repo.list(None).await.unwrap();
    assert_eq!(all.len(), 20);
}

#[tokio::test]
async fn initialize_twice_leaves_the_table_alone() {
    let session = Arc::new(MemorySession::new());
    let mut repo = measurement_repository(&session).await;
    repo.upsert(&Measurement::new("west", 1)).await.unwrap();
    let before = session.table_columns("telemetry", "measurements");

    repo.initialize().await.unwrap();

    assert_eq!(session.table_columns("telemetry", "measurements"), before);
    assert_eq!(session.row_count("telemetry", "measurements"), Some(1));
}

#[tokio::test]
async fn construction_fails_fast() {
    let session = Arc::new(MemorySession::new());

    assert!(Repository::<Orphan, _>::new(Arc::clone(&session)).is_err());
    // no keyspace on the entity or the session
    assert!(Repository::<User, _>::new(Arc::clone(&session)).is_err());
    assert_eq!(session.prepare_count(), 0);
}

#[tokio::test]
async fn config_supplies_the_keyspace() {
    let session = Arc::new(MemorySession::new());
    let config = RepositoryConfig::from_toml_str("keyspace = \"accounts\"").unwrap();

    let mut repo = Repository::<User, _>::with_config(Arc::clone(&session), &config).unwrap();
    repo.initialize().await.unwrap();
    repo.upsert(&User::new("c@example.com", "C")).await.unwrap();

    assert_eq!(session.row_count("accounts", "users"), Some(1));
}

#[tokio::test]
async fn concurrent_calls_share_one_repository() {
    let session = Arc::new(MemorySession::new().with_keyspace("app"));
    let repo = Arc::new(user_repository(&session).await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let user = User::new(&format!("worker{i}@example.com"), "Worker");
            repo.upsert(&user).await.unwrap();
            repo.get_by_id(user.email.clone()).await.unwrap()
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }
    assert_eq!(repo.list(None).await.unwrap().len(), 8);
    assert_eq!(session.prepare_count(), 5);
}

#[tokio::test]
async fn cancellation_and_store_failures_reach_the_caller() {
    let session = Arc::new(MemorySession::new().with_keyspace("app"));
    let repo = user_repository(&session).await;

    let token = CancellationToken::new();
    token.cancel();
    assert!(matches!(
        repo.get_by_id_with_cancel("a@example.com", &token).await,
        Err(Error::Cancelled)
    ));

    session.fail_next(StoreError::Unavailable {
        message: "not enough replicas".to_string(),
    });
    let err = repo.list(None).await.unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Unavailable { .. })));
}
