//! Live-database tests for the Postgres record store.
//!
//! These need a reachable Postgres and are ignored by default:
//! `DATABASE_URL=postgres://... cargo test -p korpus-db -- --ignored`

use korpus_core::{AppError, NewFile, RecordStore};
use korpus_db::{PgRecordStore, MIGRATOR};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

async fn store() -> PgRecordStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live tests");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("failed to connect to Postgres");
    MIGRATOR.run(&pool).await.expect("migrations failed");
    PgRecordStore::new(pool)
}

fn new_file(user_id: Uuid, name: &str) -> NewFile {
    NewFile {
        user_id,
        name: name.to_string(),
        size: 128,
        mime_type: "application/pdf".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_create_update_get_round_trip() {
    let store = store().await;
    let user_id = Uuid::new_v4();

    let created = store.create_file(new_file(user_id, "a.pdf")).await.unwrap();
    assert_eq!(created.file_path, None);

    let updated = store
        .update_file_path(created.id, "path/to/a.pdf")
        .await
        .unwrap();
    assert_eq!(updated.file_path.as_deref(), Some("path/to/a.pdf"));

    let fetched = store.get_file(created.id).await.unwrap();
    assert_eq!(fetched.file_path.as_deref(), Some("path/to/a.pdf"));

    store.delete_file(created.id).await.unwrap();
    assert!(matches!(
        store.get_file(created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_delete_file_cascades_links() {
    let store = store().await;
    let user_id = Uuid::new_v4();
    let workspace_id = Uuid::new_v4();

    let file = store.create_file(new_file(user_id, "b.pdf")).await.unwrap();
    store
        .create_file_workspace(user_id, file.id, workspace_id)
        .await
        .unwrap();
    assert_eq!(store.list_file_workspaces(file.id).await.unwrap().len(), 1);

    store.delete_file(file.id).await.unwrap();
    assert!(store.list_file_workspaces(file.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_create_files_links_every_file() {
    let store = store().await;
    let user_id = Uuid::new_v4();
    let workspace_id = Uuid::new_v4();

    let created = store
        .create_files(
            vec![new_file(user_id, "one.pdf"), new_file(user_id, "two.pdf")],
            workspace_id,
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let listed = store.list_workspace_files(workspace_id).await.unwrap();
    assert_eq!(listed.len(), 2);

    for file in &created {
        store.delete_file(file.id).await.unwrap();
    }
}
