// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use fancy_hn::storage::{build_blob_store, BlobBackend, StorageConfig, StorageError};
use tempfile::TempDir;

fn fs_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        backend: BlobBackend::Fs,
        blob_dir: dir.path().join("blobs"),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn test_built_fs_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();

    let first = build_blob_store(&fs_config(&dir)).unwrap();
    first
        .put("summaries/10.json", b"persisted".to_vec())
        .await
        .unwrap();
    drop(first);

    let second = build_blob_store(&fs_config(&dir)).unwrap();
    assert_eq!(second.get("summaries/10.json").await.unwrap(), b"persisted");
}

#[tokio::test]
async fn test_list_filters_by_name_prefix_and_skips_temp_files() {
    let dir = TempDir::new().unwrap();
    let store = build_blob_store(&fs_config(&dir)).unwrap();

    store.put("summaries/1.json", b"a".to_vec()).await.unwrap();
    store.put("summaries/12.json", b"b".to_vec()).await.unwrap();
    store.put("summaries/2.json", b"c".to_vec()).await.unwrap();
    std::fs::write(dir.path().join("blobs/summaries/.tmpXYZ"), b"partial").unwrap();

    assert_eq!(
        store.list("summaries/1").await.unwrap(),
        vec!["summaries/1.json".to_string(), "summaries/12.json".to_string()]
    );
    assert_eq!(store.list("summaries/").await.unwrap().len(), 3);
    assert!(store.list("missing/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = build_blob_store(&fs_config(&dir)).unwrap();

    assert!(matches!(
        store.put("../escape.json", b"x".to_vec()).await,
        Err(StorageError::InvalidPath(_))
    ));
    assert!(matches!(
        store.get("summaries/../../etc/passwd").await,
        Err(StorageError::InvalidPath(_))
    ));
}
