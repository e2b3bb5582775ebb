mod common;

use std::sync::Arc;
use std::time::Duration;

use common::CountingRepo;
use plan_canvas::Position;
use programplan_sdk::{EditorSession, SaveStatus, SessionConfig};
use programplan_store::ProjectRepository;
use tokio::time::sleep;

async fn session(repo: &Arc<CountingRepo>) -> EditorSession {
    EditorSession::create(repo.clone(), "Autosave", SessionConfig::default())
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_coalesce_into_one_save() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let created = repo.puts();

    // 1. Five edits, each inside the quiet window of the previous one
    for i in 0..5 {
        session
            .add_node("btn_pri", Position::new(i as f64 * 60.0, 0.0))
            .await
            .unwrap();
        sleep(Duration::from_millis(500)).await;
    }
    assert_eq!(repo.puts(), created);

    // 2. Window elapses after the last edit
    sleep(Duration::from_secs(2)).await;
    assert_eq!(repo.puts(), created + 1);

    // 3. The write carries every edit
    let stored = repo.get(&session.project_id().await).await.unwrap();
    assert_eq!(stored.nodes.len(), 5);
    assert!(matches!(session.status(), SaveStatus::Saved { .. }));
    assert!(!session.is_dirty().await);
}

#[tokio::test(start_paused = true)]
async fn failed_save_is_reported_and_retried() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let created = repo.puts();

    repo.set_failing(true);
    session.add_node("card", Position::new(0.0, 0.0)).await.unwrap();
    sleep(Duration::from_millis(2100)).await;

    assert!(session.status().is_unsaved());
    assert!(session.is_dirty().await);
    assert_eq!(repo.puts(), created);

    // Storage recovers; the next cycle writes without further edits.
    repo.set_failing(false);
    sleep(Duration::from_millis(2100)).await;

    assert_eq!(repo.puts(), created + 1);
    assert!(matches!(session.status(), SaveStatus::Saved { .. }));
    assert!(!session.is_dirty().await);
}

#[tokio::test(start_paused = true)]
async fn edit_during_slow_save_is_written_after_it() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    repo.set_put_delay(Duration::from_secs(3));

    // 1. A manual save of the first edit is still writing when the second lands
    session.add_node("card", Position::new(0.0, 0.0)).await.unwrap();
    let (saved, _) = tokio::join!(session.save_now(), async {
        sleep(Duration::from_millis(100)).await;
        session.add_node("card", Position::new(200.0, 0.0)).await
    });
    saved.unwrap();
    assert!(session.is_dirty().await);

    // 2. The debounce that fired during the write is rescheduled, well before the interval
    sleep(Duration::from_secs(10)).await;
    let stored = repo.get(&session.project_id().await).await.unwrap();
    assert_eq!(stored.nodes.len(), 2);
    assert!(!session.is_dirty().await);
}

#[tokio::test(start_paused = true)]
async fn interval_saves_during_continuous_editing() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let created = repo.puts();
    session.add_node("card", Position::new(0.0, 0.0)).await.unwrap();

    // A drag that never pauses long enough for the debounce.
    for _ in 0..35 {
        session.update(|g| g.nodes[0].position.x += 1.0).await;
        sleep(Duration::from_secs(1)).await;
    }
    assert_eq!(repo.puts(), created + 1);

    sleep(Duration::from_secs(3)).await;
    assert_eq!(repo.puts(), created + 2);
    let stored = repo.get(&session.project_id().await).await.unwrap();
    assert_eq!(stored.nodes[0].position.x, 35.0);
}

#[tokio::test(start_paused = true)]
async fn close_writes_pending_changes() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let id = session.project_id().await;
    let created = repo.puts();

    session.add_node("modal", Position::new(0.0, 0.0)).await.unwrap();
    session.close().await.unwrap();

    assert_eq!(repo.puts(), created + 1);
    assert_eq!(repo.get(&id).await.unwrap().nodes.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_without_changes_does_not_write() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let created = repo.puts();

    session.close().await.unwrap();
    assert_eq!(repo.puts(), created);
}

#[tokio::test(start_paused = true)]
async fn dropped_session_still_saves() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let id = session.project_id().await;

    session.add_node("navbar", Position::new(0.0, 0.0)).await.unwrap();
    drop(session);
    sleep(Duration::from_millis(1)).await;

    assert_eq!(repo.get(&id).await.unwrap().nodes.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_save_writes_immediately() {
    let repo = Arc::new(CountingRepo::default());
    let session = session(&repo).await;
    let created = repo.puts();

    session.add_node("tag", Position::new(0.0, 0.0)).await.unwrap();
    session.save_now().await.unwrap();
    assert_eq!(repo.puts(), created + 1);

    // Nothing left for the debounce to do.
    sleep(Duration::from_secs(3)).await;
    assert_eq!(repo.puts(), created + 1);

    // A manual save writes even without pending changes.
    session.save_now().await.unwrap();
    assert_eq!(repo.puts(), created + 2);
}
