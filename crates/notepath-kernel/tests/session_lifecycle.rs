//! End-to-end document lifecycle against real stores.
//!
//! Runs on tokio's paused clock: timers fire exactly at their deadlines and
//! no test waits on wall time.

use std::sync::Arc;
use std::time::Duration;

use notepath_kernel::{
    DocKey, DocumentSession, DocumentStore, ManualClock, MemoryStore, SaveStatus, SqliteStore,
    StoredDocument,
};

const QUIET: Duration = Duration::from_millis(1000);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("notepath_kernel=debug")
        .with_test_writer()
        .try_init();
}

/// Move the paused clock forward, then let woken tasks run.
async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_becomes_one_write() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(0));
    let session = DocumentSession::open("/burst", store.clone(), clock.clone(), QUIET).await;

    session.edit("a");
    advance(200).await;
    session.edit("ab");
    advance(200).await;
    session.edit("abc");
    advance(999).await;
    assert_eq!(store.write_count(), 0);

    clock.set(1_400);
    advance(1).await;
    let writes = store.writes();
    assert_eq!(writes, vec![(DocKey::new("burst"), StoredDocument::new("abc", 1_400))]);
    assert_eq!(session.status(), SaveStatus::Idle(Some(1_400)));
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_full_lifecycle() {
    init_tracing();
    let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(50)));
    let clock = Arc::new(ManualClock::new(99));
    let session = DocumentSession::new("/watched", store, clock, QUIET);

    let mut rx = session.subscribe();
    assert_eq!(*rx.borrow_and_update(), SaveStatus::Loading);

    session.load().await;
    assert_eq!(*rx.borrow_and_update(), SaveStatus::Idle(None));

    session.edit("text");
    let mut seen = vec![*rx.borrow_and_update()];
    while seen.last() != Some(&SaveStatus::Idle(Some(99))) {
        rx.changed().await.unwrap();
        seen.push(*rx.borrow_and_update());
    }
    assert_eq!(
        seen,
        vec![SaveStatus::PendingSave, SaveStatus::Saving, SaveStatus::Idle(Some(99))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sqlite_persists_across_sessions() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("notes.db");
    let clock = Arc::new(ManualClock::new(1_234));

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let session = DocumentSession::open("/journal/2024", store, clock.clone(), QUIET).await;
        assert_eq!(session.content(), "");
        session.edit("dear diary");
        advance(1_000).await;
        assert_eq!(session.status(), SaveStatus::Idle(Some(1_234)));
    }

    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    assert_eq!(store.list_keys().unwrap(), vec![DocKey::new("journal/2024")]);

    let session = DocumentSession::open("/journal/2024", store, clock, QUIET).await;
    assert_eq!(session.content(), "dear diary");
    assert_eq!(session.status(), SaveStatus::Idle(Some(1_234)));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_between_documents() {
    init_tracing();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let clock = Arc::new(ManualClock::new(1));
    let mut session = DocumentSession::open("/", store.clone(), clock, QUIET).await;
    assert_eq!(session.key().as_str(), "index");

    session.edit("home page");
    advance(1_000).await;

    assert_eq!(session.navigate("other").await.as_deref(), Some("/other"));
    assert_eq!(session.content(), "");
    session.edit("other page");
    advance(1_000).await;

    assert_eq!(session.navigate("").await, None);
    assert_eq!(session.navigate("/").await.as_deref(), Some("//"));
    assert_eq!(session.key().as_str(), "/");

    let index = store.read(&DocKey::index()).await.unwrap().unwrap();
    let other = store.read(&DocKey::new("other")).await.unwrap().unwrap();
    assert_eq!(index.content, "home page");
    assert_eq!(other.content, "other page");
}

#[tokio::test(start_paused = true)]
async fn test_outage_then_recovery() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let session =
        DocumentSession::open("/flaky", store.clone(), Arc::new(ManualClock::new(7)), QUIET).await;

    store.set_writes_fail(true);
    session.edit("v1");
    advance(1_000).await;
    assert_eq!(session.status(), SaveStatus::SaveFailed);
    assert_eq!(session.content(), "v1");

    store.set_writes_fail(false);
    assert!(session.retry());
    advance(1_000).await;
    assert_eq!(session.status(), SaveStatus::Idle(Some(7)));
    assert_eq!(store.get(&DocKey::new("flaky")).unwrap().content, "v1");
}
