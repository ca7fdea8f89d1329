//! Canonical board ownership and change notification.

use crate::board::Board;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::Sender;

/// Whether committed boards reach the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Commits are forwarded to observers.
    #[default]
    Persistent,
    /// Example/demo board: commits only update the in-memory snapshot.
    Example,
}

impl SessionMode {
    pub fn from_example_flag(is_example: bool) -> Self {
        if is_example { Self::Example } else { Self::Persistent }
    }

    pub fn is_example(self) -> bool {
        self == Self::Example
    }
}

/// A committed board together with the project it belongs to.
#[derive(Debug, Clone)]
pub struct BoardChanged {
    pub project_key: String,
    pub board: Arc<Board>,
}

/// Receives every committed board (the persistence collaborator).
pub trait BoardObserver {
    fn on_board_changed(&mut self, board: &Arc<Board>, project_key: &str);
}

impl<F> BoardObserver for F
where
    F: FnMut(&Arc<Board>, &str),
{
    fn on_board_changed(&mut self, board: &Arc<Board>, project_key: &str) {
        self(board, project_key)
    }
}

/// Forwards changes over a channel, e.g. to an auto-saver.
impl BoardObserver for Sender<BoardChanged> {
    fn on_board_changed(&mut self, board: &Arc<Board>, project_key: &str) {
        let change = BoardChanged {
            project_key: project_key.to_string(),
            board: Arc::clone(board),
        };
        if self.send(change).is_err() {
            log::warn!("Board change receiver dropped; change for '{}' not delivered", project_key);
        }
    }
}

/// Owns the canonical board.
///
/// Readers get `Arc<Board>` snapshots. Every mutation goes through
/// [`BoardStore::commit`], which swaps the whole board in one step, so no
/// reader ever sees a half-applied transaction.
pub struct BoardStore {
    board: Arc<Board>,
    project_key: String,
    mode: SessionMode,
    revision: u64,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore")
            .field("project_key", &self.project_key)
            .field("mode", &self.mode)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl BoardStore {
    /// Create a store holding `board`.
    pub fn new(board: Board, project_key: impl Into<String>, mode: SessionMode) -> Self {
        Self {
            board: Arc::new(board),
            project_key: project_key.into(),
            mode,
            revision: 0,
            observers: Vec::new(),
        }
    }

    /// Register a persistence observer.
    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Read-only snapshot of the current board.
    pub fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Borrow the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Number of commits since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the canonical board with `next` and notify observers, unless
    /// the store is in example mode.
    pub fn commit(&mut self, next: Board) -> Arc<Board> {
        self.board = Arc::new(next);
        self.revision += 1;

        if self.mode.is_example() {
            log::debug!("Example mode: revision {} kept in memory only", self.revision);
        } else {
            log::info!(
                "Committed revision {} of '{}' ({} cards)",
                self.revision,
                self.project_key,
                self.board.total_cards()
            );
            for observer in &mut self.observers {
                observer.on_board_changed(&self.board, &self.project_key);
            }
        }
        self.snapshot()
    }

    /// Replace the board without notifying anyone, e.g. after loading it
    /// from storage.
    pub fn reset(&mut self, board: Board) {
        self.board = Arc::new(board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::channel;

    fn recording_store(mode: SessionMode) -> (BoardStore, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = BoardStore::new(Board::new("demo"), "project-1", mode);
        let log = Rc::clone(&seen);
        store.subscribe(move |board: &Arc<Board>, key: &str| {
            log.borrow_mut().push(format!("{}:{}", key, board.project_name));
        });
        (store, seen)
    }

    #[test]
    fn test_commit_notifies() {
        let (mut store, seen) = recording_store(SessionMode::Persistent);
        store.commit(Board::new("renamed"));

        assert_eq!(store.revision(), 1);
        assert_eq!(store.board().project_name, "renamed");
        assert_eq!(*seen.borrow(), vec!["project-1:renamed".to_string()]);
    }

    #[test]
    fn test_example_mode_never_notifies() {
        let (mut store, seen) = recording_store(SessionMode::Example);
        store.commit(Board::new("one"));
        store.commit(Board::new("two"));

        assert_eq!(store.board().project_name, "two");
        assert_eq!(store.revision(), 2);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_snapshot_survives_commit() {
        let (mut store, _) = recording_store(SessionMode::Persistent);
        let before = store.snapshot();
        store.commit(Board::new("after"));

        assert_eq!(before.project_name, "demo");
        assert_eq!(store.snapshot().project_name, "after");
    }

    #[test]
    fn test_reset_is_silent() {
        let (mut store, seen) = recording_store(SessionMode::Persistent);
        store.reset(Board::new("loaded"));
        assert_eq!(store.revision(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = channel();
        let mut store = BoardStore::new(Board::new("demo"), "key", SessionMode::Persistent);
        store.subscribe(tx);

        store.commit(Board::new("a"));
        store.commit(Board::new("b"));

        let changes: Vec<BoardChanged> = rx.try_iter().collect();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].project_key, "key");
        assert_eq!(changes[1].board.project_name, "b");
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (tx, rx) = channel::<BoardChanged>();
        drop(rx);
        let mut store = BoardStore::new(Board::new("demo"), "key", SessionMode::Persistent);
        store.subscribe(tx);
        store.commit(Board::new("a"));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(SessionMode::from_example_flag(true), SessionMode::Example);
        assert_eq!(SessionMode::from_example_flag(false), SessionMode::Persistent);
    }
}
