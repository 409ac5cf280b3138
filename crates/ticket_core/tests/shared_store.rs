use ticket_core::{shared_store, NewProject, Project, StoreConfig, StoreLocation};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_callers_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("shared.sqlite3"));

    let (first, second, third) = tokio::join!(
        shared_store(config.clone()),
        shared_store(config.clone()),
        shared_store(config.clone()),
    );
    let first = first.unwrap();
    let second = second.unwrap();
    let third = third.unwrap();
    assert!(first.same_handle(&second));
    assert!(first.same_handle(&third));

    let id = first
        .add::<Project>(NewProject::new("Shared", ""))
        .await
        .unwrap();
    assert!(second.get::<Project>(id).await.unwrap().is_some());

    // Later configuration is ignored once the store is open.
    let later = shared_store(StoreConfig::memory()).await.unwrap();
    assert!(later.same_handle(&first));
    assert_eq!(later.location(), &config.location);
    assert!(matches!(later.location(), StoreLocation::File(_)));
}
