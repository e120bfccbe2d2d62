//! List presenter: a single-writer task owning the in-memory item list.
//!
//! # Design
//! All list mutations happen on one spawned task. User intents and backend
//! completions arrive on the same mailbox, so a render can never interleave
//! with a concurrent mutation. Backend calls are fire-and-forget: each is
//! spawned, and its result comes back as a message carrying enough context
//! to apply it.
//!
//! Overlapping fetches are resolved with a generation counter: every
//! fetch/refresh gets the next generation, and a completion whose generation
//! is not the latest issued is discarded. Latest request wins,
//! deterministically, without blocking any operation on another.
//!
//! Errors never mutate the list. They are logged, the advisory `LoadState`
//! moves to `Error` where a fetch was involved, and the previous frame's
//! rows stay on screen.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::RecordStore;
use crate::types::Item;

/// Advisory screen state for UI feedback. No operation is blocked by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// User intents the screen accepts.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Screen-load: fetch all records and replace the list wholesale.
    Load,
    /// Pull-to-refresh: same as `Load`, with the refresh indicator raised
    /// until the winning fetch resolves.
    Refresh,
    /// Add an item with the given name. Blank input is rejected locally and
    /// never reaches the store.
    Add(String),
    /// Delete the item currently at this row.
    Delete(usize),
}

/// A full redraw of the screen: the complete visible row set plus advisory
/// state. Published after every mutation; no diffing.
#[derive(Debug, Clone)]
pub struct Frame {
    pub items: Vec<Item>,
    pub state: LoadState,
    pub refreshing: bool,
}

/// Everything that arrives at the presenter task.
enum Msg {
    Intent(Intent),
    FetchDone {
        generation: u64,
        result: Result<Vec<Item>, StoreError>,
    },
    CreateDone(Result<Item, StoreError>),
    DeleteDone(Result<Uuid, StoreError>),
}

/// Handle to a running list screen.
///
/// Dropping the handle closes the mailbox; the presenter task exits once any
/// in-flight backend calls have reported back.
pub struct ListScreen {
    tx: mpsc::Sender<Msg>,
    frames: watch::Receiver<Frame>,
}

impl ListScreen {
    /// Spawn the presenter task. Must be called from within a tokio runtime.
    ///
    /// The screen starts empty and idle; callers issue `load` when the
    /// screen appears.
    pub fn spawn<S>(store: Arc<S>) -> Self
    where
        S: RecordStore + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let (frame_tx, frames) = watch::channel(Frame {
            items: Vec::new(),
            state: LoadState::Idle,
            refreshing: false,
        });
        tokio::spawn(run(store, tx.downgrade(), rx, frame_tx));
        Self { tx, frames }
    }

    pub async fn load(&self) {
        self.send(Intent::Load).await;
    }

    pub async fn refresh(&self) {
        self.send(Intent::Refresh).await;
    }

    pub async fn add(&self, name: impl Into<String>) {
        self.send(Intent::Add(name.into())).await;
    }

    pub async fn delete_row(&self, row: usize) {
        self.send(Intent::Delete(row)).await;
    }

    pub async fn send(&self, intent: Intent) {
        // A send error means the presenter task is gone; intents become no-ops.
        let _ = self.tx.send(Msg::Intent(intent)).await;
    }

    /// Subscribe to render frames. The receiver always holds the latest
    /// published frame.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// The current frame.
    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }
}

/// The presenter task: exclusive owner of the list and its advisory state.
async fn run<S>(
    store: Arc<S>,
    tx: mpsc::WeakSender<Msg>,
    mut rx: mpsc::Receiver<Msg>,
    frames: watch::Sender<Frame>,
) where
    S: RecordStore + 'static,
{
    let mut items: Vec<Item> = Vec::new();
    let mut state = LoadState::Idle;
    let mut refreshing = false;
    let mut generation: u64 = 0;

    while let Some(msg) = rx.recv().await {
        match msg {
            Msg::Intent(intent @ (Intent::Load | Intent::Refresh)) => {
                let refresh = matches!(intent, Intent::Refresh);
                generation += 1;
                state = LoadState::Loading;
                refreshing = refresh;
                publish(&frames, &items, state, refreshing);

                if let Some(tx) = tx.upgrade() {
                    let store = Arc::clone(&store);
                    let issued = generation;
                    tokio::spawn(async move {
                        let result = store.fetch_all().await;
                        let _ = tx
                            .send(Msg::FetchDone {
                                generation: issued,
                                result,
                            })
                            .await;
                    });
                }
            }
            Msg::Intent(Intent::Add(name)) => {
                if name.trim().is_empty() {
                    log::debug!("ignoring add intent with blank name");
                    continue;
                }
                if let Some(tx) = tx.upgrade() {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        let result = store.create(&name).await;
                        let _ = tx.send(Msg::CreateDone(result)).await;
                    });
                }
            }
            Msg::Intent(Intent::Delete(row)) => {
                // Resolve the row to an id now; the list may shift before
                // the backend confirms.
                let Some(item) = items.get(row) else {
                    log::debug!("ignoring delete intent for out-of-range row {row}");
                    continue;
                };
                let id = item.id;
                if let Some(tx) = tx.upgrade() {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        let result = store.delete(id).await;
                        let _ = tx.send(Msg::DeleteDone(result)).await;
                    });
                }
            }
            Msg::FetchDone {
                generation: done,
                result,
            } => {
                if done != generation {
                    log::debug!("discarding stale fetch result ({done} < {generation})");
                    continue;
                }
                refreshing = false;
                match result {
                    Ok(fetched) => {
                        items = fetched;
                        state = LoadState::Loaded;
                    }
                    Err(err) => {
                        log::error!("fetch failed: {err}");
                        state = LoadState::Error;
                    }
                }
                publish(&frames, &items, state, refreshing);
            }
            Msg::CreateDone(Ok(item)) => {
                items.push(item);
                publish(&frames, &items, state, refreshing);
            }
            Msg::CreateDone(Err(err)) => {
                log::error!("create failed: {err}");
            }
            Msg::DeleteDone(Ok(id)) => {
                items.retain(|item| item.id != id);
                publish(&frames, &items, state, refreshing);
            }
            Msg::DeleteDone(Err(err)) => {
                log::error!("delete failed: {err}");
            }
        }
    }
}

fn publish(frames: &watch::Sender<Frame>, items: &[Item], state: LoadState, refreshing: bool) {
    let _ = frames.send(Frame {
        items: items.to_vec(),
        state,
        refreshing,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;
    use tokio::time::{sleep, timeout};

    /// In-memory store standing in for the backend.
    #[derive(Default)]
    struct FakeStore {
        records: Mutex<Vec<Item>>,
        fail_fetch: AtomicBool,
        fail_delete: AtomicBool,
        create_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    impl FakeStore {
        fn seeded(names: &[&str]) -> Arc<Self> {
            let store = Self::default();
            {
                let mut records = store.records.lock().unwrap();
                for name in names {
                    records.push(Item {
                        id: Uuid::new_v4(),
                        name: name.to_string(),
                    });
                }
            }
            Arc::new(store)
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(StoreError::Transport("connection reset".to_string()));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, name: &str) -> Result<Item, StoreError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let item = Item {
                id: Uuid::new_v4(),
                name: name.to_string(),
            };
            self.records.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn delete(&self, id: Uuid) -> Result<Uuid, StoreError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(StoreError::Transport("connection reset".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|item| item.id != id);
            if records.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(id)
        }
    }

    async fn wait_for<F>(frames: &mut watch::Receiver<Frame>, predicate: F) -> Frame
    where
        F: Fn(&Frame) -> bool,
    {
        timeout(Duration::from_secs(5), async {
            loop {
                {
                    let frame = frames.borrow();
                    if predicate(&frame) {
                        return frame.clone();
                    }
                }
                frames.changed().await.expect("presenter task gone");
            }
        })
        .await
        .expect("timed out waiting for frame")
    }

    fn names(frame: &Frame) -> Vec<&str> {
        frame.items.iter().map(|item| item.name.as_str()).collect()
    }

    #[tokio::test]
    async fn load_replaces_list_wholesale() {
        let store = FakeStore::seeded(&["a", "b"]);
        let screen = ListScreen::spawn(store);
        let mut frames = screen.frames();

        screen.load().await;
        let frame = wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;
        assert_eq!(names(&frame), ["a", "b"]);
        assert!(!frame.refreshing);
    }

    #[tokio::test]
    async fn refresh_raises_and_clears_the_indicator() {
        // Gate the fetch so the in-flight frame stays observable.
        let (gate_tx, gate_rx) = oneshot::channel();
        let store = Arc::new(GatedStore {
            gates: Mutex::new(VecDeque::from([gate_rx])),
        });
        let screen = ListScreen::spawn(store);
        let mut frames = screen.frames();

        screen.refresh().await;
        wait_for(&mut frames, |f| f.refreshing && f.state == LoadState::Loading).await;

        gate_tx
            .send(vec![Item {
                id: Uuid::new_v4(),
                name: "a".to_string(),
            }])
            .unwrap();
        let frame = wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;
        assert!(!frame.refreshing);
        assert_eq!(names(&frame), ["a"]);
    }

    #[tokio::test]
    async fn add_appends_at_tail_without_refetch() {
        let store = FakeStore::seeded(&["a"]);
        let screen = ListScreen::spawn(Arc::clone(&store));
        let mut frames = screen.frames();

        screen.load().await;
        wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;

        screen.add("c").await;
        let frame = wait_for(&mut frames, |f| f.items.len() == 2).await;
        assert_eq!(names(&frame), ["a", "c"]);
    }

    #[tokio::test]
    async fn blank_add_never_reaches_the_store() {
        let store = FakeStore::seeded(&[]);
        let screen = ListScreen::spawn(Arc::clone(&store));
        let mut frames = screen.frames();

        screen.add("").await;
        screen.add("   ").await;
        screen.add("real").await;
        wait_for(&mut frames, |f| f.items.len() == 1).await;
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_list_and_reports_error_state() {
        let store = FakeStore::seeded(&["a"]);
        let screen = ListScreen::spawn(Arc::clone(&store));
        let mut frames = screen.frames();

        screen.load().await;
        wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;

        store.fail_fetch.store(true, Ordering::SeqCst);
        screen.refresh().await;
        let frame = wait_for(&mut frames, |f| f.state == LoadState::Error).await;
        assert_eq!(names(&frame), ["a"]);
        assert!(!frame.refreshing);
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_targeted_item() {
        let store = FakeStore::seeded(&["a", "b", "c"]);
        let screen = ListScreen::spawn(store);
        let mut frames = screen.frames();

        screen.load().await;
        wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;

        screen.delete_row(1).await;
        let frame = wait_for(&mut frames, |f| f.items.len() == 2).await;
        assert_eq!(names(&frame), ["a", "c"]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let store = FakeStore::seeded(&["a", "b"]);
        let screen = ListScreen::spawn(Arc::clone(&store));
        let mut frames = screen.frames();

        screen.load().await;
        wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;

        store.fail_delete.store(true, Ordering::SeqCst);
        screen.delete_row(0).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(names(&screen.frame()), ["a", "b"]);
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn out_of_range_delete_is_ignored() {
        let store = FakeStore::seeded(&["a"]);
        let screen = ListScreen::spawn(Arc::clone(&store));
        let mut frames = screen.frames();

        screen.load().await;
        wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;

        screen.delete_row(5).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(names(&screen.frame()), ["a"]);
    }

    /// Store whose fetches block until the test resolves them, for driving
    /// overlapping fetch orderings by hand.
    struct GatedStore {
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<Item>>>>,
    }

    #[async_trait]
    impl RecordStore for GatedStore {
        async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch");
            gate.await
                .map_err(|_| StoreError::Transport("gate dropped".to_string()))
        }

        async fn create(&self, _name: &str) -> Result<Item, StoreError> {
            unreachable!("not used in this test")
        }

        async fn delete(&self, _id: Uuid) -> Result<Uuid, StoreError> {
            unreachable!("not used in this test")
        }
    }

    #[tokio::test]
    async fn stale_fetch_result_is_discarded() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let store = Arc::new(GatedStore {
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
        });
        let screen = ListScreen::spawn(store);
        let mut frames = screen.frames();

        let stale = vec![Item {
            id: Uuid::new_v4(),
            name: "stale".to_string(),
        }];
        let fresh = vec![Item {
            id: Uuid::new_v4(),
            name: "fresh".to_string(),
        }];

        // First fetch starts and parks on its gate before the second is issued.
        screen.refresh().await;
        sleep(Duration::from_millis(20)).await;
        screen.load().await;
        sleep(Duration::from_millis(20)).await;

        // The later fetch resolves first and wins.
        second_tx.send(fresh).unwrap();
        let frame = wait_for(&mut frames, |f| f.state == LoadState::Loaded).await;
        assert_eq!(names(&frame), ["fresh"]);

        // The superseded fetch resolves late; its result must be dropped.
        first_tx.send(stale).unwrap();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(names(&screen.frame()), ["fresh"]);
    }
}
