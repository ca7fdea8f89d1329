//! Debounced persistence of committed boards.

use super::{Storage, StorageResult};
use crate::board::Board;
use crate::store::BoardChanged;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key under which the most recently saved board is mirrored, so a host can
/// reopen it without knowing its project key.
pub const LAST_BOARD_KEY: &str = "__last_board__";

/// Collects [`BoardChanged`] notifications and writes the newest boards to
/// storage at most once per interval.
///
/// Intermediate commits between two saves are coalesced per project: only
/// the latest pending board of each project key is written.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    pending: BTreeMap<String, Arc<Board>>,
    /// Key of the most recent change; written last so it lands in the
    /// last-board mirror.
    latest: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            pending: BTreeMap::new(),
            latest: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Queue `change` for the next save, replacing anything queued earlier
    /// for the same project.
    pub fn record(&mut self, change: BoardChanged) {
        self.latest = Some(change.project_key.clone());
        self.pending.insert(change.project_key, change.board);
    }

    /// Whether a recorded change has not reached storage yet.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Project keys with unsaved changes.
    pub fn pending_keys(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    pub fn should_save(&self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save the pending boards if the interval has elapsed.
    /// Returns whether a save happened.
    pub async fn maybe_save(&mut self) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.flush().await
    }

    /// Save every pending board now. A board stays queued until its save
    /// succeeds. Returns whether anything was saved.
    pub async fn flush(&mut self) -> StorageResult<bool> {
        if self.pending.is_empty() {
            return Ok(false);
        }
        let mut keys: Vec<String> = self
            .pending
            .keys()
            .filter(|key| Some(*key) != self.latest.as_ref())
            .cloned()
            .collect();
        keys.extend(self.latest.clone());

        for key in keys {
            let Some(board) = self.pending.get(&key).cloned() else {
                continue;
            };
            self.save(&key, &board).await?;
            self.pending.remove(&key);
        }
        self.latest = None;
        Ok(true)
    }

    /// Write `board` under `project_key` and mirror it to [`LAST_BOARD_KEY`].
    pub async fn save(&mut self, project_key: &str, board: &Board) -> StorageResult<()> {
        self.storage.save(project_key, board).await?;
        self.storage.save(LAST_BOARD_KEY, board).await?;
        self.last_save = Some(Instant::now());
        log::info!("Saved board '{}' ({} cards)", project_key, board.total_cards());
        Ok(())
    }

    pub async fn load(&mut self, project_key: &str) -> StorageResult<Board> {
        let board = self.storage.load(project_key).await?;
        self.last_save = Some(Instant::now());
        Ok(board)
    }

    /// The most recently saved board, if any.
    pub async fn load_last(&mut self) -> Option<Board> {
        match self.storage.load(LAST_BOARD_KEY).await {
            Ok(board) => {
                self.last_save = Some(Instant::now());
                Some(board)
            }
            Err(e) => {
                log::debug!("No last board: {}", e);
                None
            }
        }
    }

    pub async fn delete(&self, project_key: &str) -> StorageResult<()> {
        self.storage.delete(project_key).await
    }

    /// Saved project keys, without the last-board mirror.
    pub async fn list_boards(&self) -> StorageResult<Vec<String>> {
        let mut keys = self.storage.list().await?;
        keys.retain(|key| key != LAST_BOARD_KEY);
        Ok(keys)
    }

    pub async fn exists(&self, project_key: &str) -> StorageResult<bool> {
        self.storage.exists(project_key).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError, block_on};
    use crate::store::{BoardStore, SessionMode};
    use std::sync::mpsc::channel;

    fn change(key: &str, name: &str) -> BoardChanged {
        BoardChanged {
            project_key: key.to_string(),
            board: Arc::new(Board::new(name)),
        }
    }

    fn manager() -> AutoSaveManager<MemoryStorage> {
        AutoSaveManager::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_clean_manager_does_not_save() {
        let mut manager = manager();
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert!(!block_on(manager.maybe_save()).unwrap());
        assert!(manager.storage().is_empty());
    }

    #[test]
    fn test_first_change_saves_immediately() {
        let mut manager = manager();
        manager.record(change("alpha", "Alpha"));
        assert!(manager.should_save());
        assert!(block_on(manager.maybe_save()).unwrap());
        assert!(!manager.is_dirty());

        let saved = block_on(manager.load("alpha")).unwrap();
        assert_eq!(saved.project_name, "Alpha");
    }

    #[test]
    fn test_interval_coalesces_changes() {
        let mut manager = manager().with_interval(Duration::from_secs(3600));
        manager.record(change("alpha", "v1"));
        assert!(block_on(manager.maybe_save()).unwrap());

        manager.record(change("alpha", "v2"));
        manager.record(change("alpha", "v3"));
        assert!(!block_on(manager.maybe_save()).unwrap());
        assert!(manager.is_dirty());

        assert!(block_on(manager.flush()).unwrap());
        assert_eq!(block_on(manager.load("alpha")).unwrap().project_name, "v3");
        assert!(!block_on(manager.flush()).unwrap());
    }

    #[test]
    fn test_changes_to_different_projects_are_all_saved() {
        let mut manager = manager();
        manager.record(change("alpha", "a1"));
        manager.record(change("beta", "b1"));
        manager.record(change("alpha", "a2"));
        assert_eq!(manager.pending_keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);

        assert!(block_on(manager.flush()).unwrap());
        assert!(!manager.is_dirty());
        assert_eq!(block_on(manager.load("alpha")).unwrap().project_name, "a2");
        assert_eq!(block_on(manager.load("beta")).unwrap().project_name, "b1");
        // alpha changed last, so it is the board to reopen
        let last = block_on(manager.load_last()).unwrap();
        assert_eq!(last.project_name, "a2");
    }

    #[test]
    fn test_load_last_from_fresh_manager() {
        let mut manager = manager();
        manager.record(change("alpha", "Alpha"));
        block_on(manager.flush()).unwrap();

        let mut reopened = AutoSaveManager::new(Arc::clone(manager.storage()));
        let last = block_on(reopened.load_last()).unwrap();
        assert_eq!(last.project_name, "Alpha");
    }

    #[test]
    fn test_load_last_when_empty() {
        let mut manager = manager();
        assert!(block_on(manager.load_last()).is_none());
        assert!(matches!(block_on(manager.load("x")), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_excludes_last_board_key() {
        let mut manager = manager();
        block_on(manager.save("alpha", &Board::new("a"))).unwrap();
        block_on(manager.save("beta", &Board::new("b"))).unwrap();

        assert_eq!(block_on(manager.list_boards()).unwrap(), vec!["alpha", "beta"]);
        assert!(block_on(manager.storage().exists(LAST_BOARD_KEY)).unwrap());

        block_on(manager.delete("alpha")).unwrap();
        assert!(!block_on(manager.exists("alpha")).unwrap());
    }

    #[test]
    fn test_fed_from_store_channel() {
        let (tx, rx) = channel();
        let mut store = BoardStore::new(Board::new("start"), "proj", SessionMode::Persistent);
        store.subscribe(tx);
        store.commit(Board::new("first"));
        store.commit(Board::new("second"));

        let mut manager = manager();
        for change in rx.try_iter() {
            manager.record(change);
        }
        block_on(manager.flush()).unwrap();
        assert_eq!(block_on(manager.load("proj")).unwrap().project_name, "second");
    }
}
