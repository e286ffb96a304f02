//! File gateway integration tests
//!
//! Exercises upload/list/delete ordering and the degraded-read behavior
//! against a temp-dir blob store and a file-backed sqlite index.

use bytes::Bytes;
use tempfile::TempDir;

use filespace::config::StorageConfig;
use filespace::db::Database;
use filespace::error::AppError;
use filespace::index::FileIndex;
use filespace::services::FileService;
use filespace::storage::{LocalStore, ObjectStore};

async fn setup(tmp: &TempDir) -> (FileIndex, LocalStore) {
    let db_path = tmp.path().join("test.db");
    let db = Database::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to open test database");
    let index = FileIndex::new(db);
    index.ensure_table().await.expect("Failed to create table");

    let storage = StorageConfig {
        local_path: tmp.path().join("blobs").to_string_lossy().into_owned(),
        public_url: "http://localhost:1309".to_string(),
        link_secret: "test-secret".to_string(),
    };
    let store = LocalStore::new(&storage);
    store
        .ensure_container()
        .await
        .expect("Failed to create container");

    (index, store)
}

#[tokio::test]
async fn upload_then_list_then_delete_round_trip() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let file_id = FileService::upload(
        &index,
        &store,
        "team1",
        "report.pdf",
        Bytes::from_static(b"%PDF-1.4 test payload"),
    )
    .await
    .unwrap();

    let files = FileService::list(&index, &store, "team1").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "report.pdf");
    assert_eq!(files[0].file_space, "team1");
    assert_eq!(files[0].file_id, file_id);
    assert!(!files[0].created_at.is_empty());
    assert!(files[0].link.contains(&format!("/objects/{}", file_id)));
    assert!(files[0].link.contains("signature="));

    FileService::delete(&index, &store, "team1", &file_id)
        .await
        .unwrap();

    let files = FileService::list(&index, &store, "team1").await.unwrap();
    assert!(files.is_empty());
    assert!(!store.exists(&file_id).await.unwrap());
}

#[tokio::test]
async fn listing_an_empty_space_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let files = FileService::list(&index, &store, "empty-space").await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn spaces_are_isolated() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    FileService::upload(&index, &store, "A", "a.txt", Bytes::from_static(b"aaa"))
        .await
        .unwrap();

    let files = FileService::list(&index, &store, "B").await.unwrap();
    assert!(files.is_empty());

    let files = FileService::list(&index, &store, "A").await.unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let file_id = FileService::upload(&index, &store, "team1", "a.txt", Bytes::from_static(b"aaa"))
        .await
        .unwrap();

    FileService::delete(&index, &store, "team1", &file_id)
        .await
        .unwrap();
    // Second delete of the same id must not fail
    FileService::delete(&index, &store, "team1", &file_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_a_nonexistent_id_succeeds() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    FileService::delete(&index, &store, "team1", "nonexistent-id")
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_blob_degrades_to_a_dead_link() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let file_id = FileService::upload(&index, &store, "team1", "a.txt", Bytes::from_static(b"aaa"))
        .await
        .unwrap();

    // Remove the blob out-of-band; the record stays
    store.delete_if_exists(&file_id).await.unwrap();

    let files = FileService::list(&index, &store, "team1").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_id, file_id);
    assert!(files[0].link.is_empty());
}

#[tokio::test]
async fn concurrent_uploads_get_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let (a, b) = tokio::join!(
        FileService::upload(&index, &store, "team1", "a.txt", Bytes::from_static(b"aaa")),
        FileService::upload(&index, &store, "team1", "b.txt", Bytes::from_static(b"bbb")),
    );
    let a = a.unwrap();
    let b = b.unwrap();
    assert_ne!(a, b);

    let files = FileService::list(&index, &store, "team1").await.unwrap();
    assert_eq!(files.len(), 2);
}

#[tokio::test]
async fn upload_rejects_invalid_names() {
    let tmp = TempDir::new().unwrap();
    let (index, store) = setup(&tmp).await;

    let result =
        FileService::upload(&index, &store, "team1", "../sneaky", Bytes::from_static(b"x")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = FileService::upload(&index, &store, "", "a.txt", Bytes::from_static(b"x")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Nothing was written on either path
    let files = FileService::list(&index, &store, "team1").await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn index_insert_rejects_duplicates() {
    let tmp = TempDir::new().unwrap();
    let (index, _store) = setup(&tmp).await;

    index.insert("team1", "fixed-id", "a.txt").await.unwrap();
    let result = index.insert("team1", "fixed-id", "b.txt").await;
    assert!(matches!(result, Err(AppError::DuplicateKey(_))));

    // Same id under a different space is a different key
    index.insert("team2", "fixed-id", "a.txt").await.unwrap();
}

#[tokio::test]
async fn index_delete_of_missing_record_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let (index, _store) = setup(&tmp).await;

    index.insert("team1", "fixed-id", "a.txt").await.unwrap();
    let record = index
        .query_by_space_and_id("team1", "fixed-id")
        .await
        .unwrap()
        .remove(0);

    index.delete(&record).await.unwrap();
    let result = index.delete(&record).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn store_read_link_is_none_for_missing_blob() {
    let tmp = TempDir::new().unwrap();
    let (_index, store) = setup(&tmp).await;

    let link = store
        .read_link("ghost", filespace::services::file::LINK_TTL)
        .await
        .unwrap();
    assert!(link.is_none());
}

#[tokio::test]
async fn store_put_overwrites_existing_content() {
    let tmp = TempDir::new().unwrap();
    let (_index, store) = setup(&tmp).await;

    store.put("blob-1", Bytes::from_static(b"first")).await.unwrap();
    store.put("blob-1", Bytes::from_static(b"second")).await.unwrap();

    let data = store.get("blob-1").await.unwrap();
    assert_eq!(&data[..], b"second");
}
