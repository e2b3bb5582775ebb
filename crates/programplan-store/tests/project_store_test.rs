use plan_canvas::model::{Edge, Node, Position, Project, ProjectId};
use programplan_store::{MemoryStore, ProjectRepository, ProjectStore, StoreError};

fn project(name: &str, updated_at: i64) -> Project {
    let mut project = Project::new(name);
    project.created_at = 1_000;
    project.updated_at = updated_at;
    project.nodes.push(Node::new("1", "Login", Position::new(0.0, 0.0)));
    project.nodes.push(Node::new("2", "Home", Position::new(0.0, 100.0)));
    project.edges.push(Edge::new("e1-2", "1", "2").with_label("ok"));
    project
}

async fn sqlite() -> ProjectStore {
    ProjectStore::new("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

#[tokio::test]
async fn test_put_get_roundtrip() {
    let store = sqlite().await;
    let original = project("Shop", 5_000);

    store.put(&original).await.unwrap();
    let loaded = store.get(&original.id).await.unwrap();
    assert_eq!(loaded, original);
}

#[tokio::test]
async fn test_put_overwrites_wholesale() {
    let store = sqlite().await;
    let mut p = project("Shop", 5_000);
    store.put(&p).await.unwrap();

    p.name = "Shop v2".into();
    p.nodes.truncate(1);
    p.edges.clear();
    p.updated_at = 6_000;
    store.put(&p).await.unwrap();

    let loaded = store.get(&p.id).await.unwrap();
    assert_eq!(loaded.name, "Shop v2");
    assert_eq!(loaded.nodes.len(), 1);
    assert!(loaded.edges.is_empty());
    assert_eq!(store.list_summaries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let store = sqlite().await;
    let old = project("Old", 1_000);
    let newest = project("Newest", 9_000);
    let mid = project("Mid", 5_000);
    for p in [&old, &newest, &mid] {
        store.put(p).await.unwrap();
    }

    let names: Vec<_> = store
        .list_summaries()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Newest", "Mid", "Old"]);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let store = sqlite().await;
    let err = store.get(&ProjectId::from("nope")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id.as_str() == "nope"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = sqlite().await;
    let p = project("Doomed", 1_000);
    store.put(&p).await.unwrap();

    store.delete(&p.id).await.unwrap();
    store.delete(&p.id).await.unwrap();
    assert!(store.get(&p.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_export_import_between_stores() {
    let source = sqlite().await;
    let a = project("A", 2_000);
    let b = project("B", 3_000);
    source.put(&a).await.unwrap();
    source.put(&b).await.unwrap();

    let backup = source.export_all().await.unwrap();

    let target = sqlite().await;
    assert_eq!(target.import_all(&backup).await.unwrap(), 2);
    assert_eq!(target.get(&a.id).await.unwrap(), a);
    assert_eq!(target.get(&b.id).await.unwrap(), b);
}

#[tokio::test]
async fn test_malformed_backup_writes_nothing() {
    let store = sqlite().await;
    let existing = project("Keep", 1_000);
    store.put(&existing).await.unwrap();

    // Second record is missing required fields.
    let valid = serde_json::to_value(project("Fresh", 2_000)).unwrap();
    let payload = serde_json::json!([valid, {"id": "broken"}]).to_string();

    for bad in [payload.as_str(), "{\"not\": \"an array\"}", "garbage"] {
        let err = store.import_all(bad).await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedBackup(_)));
    }

    let summaries = store.list_summaries().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, existing.id);
}

#[tokio::test]
async fn test_memory_store_matches_contract() {
    let store = MemoryStore::new();
    let a = project("A", 2_000);
    let b = project("B", 3_000);
    store.put(&a).await.unwrap();
    store.put(&b).await.unwrap();

    let names: Vec<_> = store
        .list_summaries()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["B", "A"]);

    let backup = store.export_all().await.unwrap();
    store.delete(&a.id).await.unwrap();
    store.delete(&a.id).await.unwrap();
    assert!(store.import_all("[{}]").await.is_err());
    assert_eq!(store.import_all(&backup).await.unwrap(), 2);
    assert_eq!(store.get(&a.id).await.unwrap(), a);
}
