//! In-memory board storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::board::Board;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Keeps boards in a map. Used by tests and by example sessions that should
/// never touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, Arc<Board>>>,
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Other(format!("Lock poisoned: {}", e))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored boards, including the last-board mirror.
    pub fn len(&self) -> usize {
        self.boards.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, board: &Board) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let board = Arc::new(board.clone());
        Box::pin(async move {
            self.boards.write().map_err(poisoned)?.insert(key, board);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Board>> {
        let key = key.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(poisoned)?;
            boards
                .get(&key)
                .map(|b| (**b).clone())
                .ok_or(StorageError::NotFound(key))
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            self.boards.write().map_err(poisoned)?.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let mut keys: Vec<String> = self.boards.read().map_err(poisoned)?.keys().cloned().collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.boards.read().map_err(poisoned)?.contains_key(&key)) })
    }
}
