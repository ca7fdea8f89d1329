//! A headless board session: open a board, replay UI events, persist.

use crate::config::{AppConfig, ConfigError};
use driftboard_core::storage::{AutoSaveManager, FileStorage, Storage, StorageError};
use driftboard_core::{
    Board, BoardChanged, BoardController, BoardEvent, BoardLayout, CardIdGenerator, ColumnId,
    ProjectAnalysis, seed_board,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse an analysis document from `path`.
pub fn read_analysis(path: &Path) -> Result<ProjectAnalysis, AppError> {
    ProjectAnalysis::from_json(&read_file(path)?).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a recorded event script from `path`.
pub fn read_script(path: &Path) -> Result<Vec<BoardEvent>, AppError> {
    BoardEvent::parse_script(&read_file(path)?).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Summary of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub commits: usize,
    pub saves: usize,
}

/// One open board wired to the engine and to auto-save.
pub struct App<S: Storage> {
    config: AppConfig,
    controller: BoardController,
    changes: Receiver<BoardChanged>,
    autosave: AutoSaveManager<S>,
}

impl App<FileStorage> {
    /// Open the configured board from the file store.
    pub async fn open(config: AppConfig, analysis: Option<ProjectAnalysis>) -> Result<Self, AppError> {
        let storage = FileStorage::new(config.storage_path()?)?;
        log::info!("Using board storage at {}", storage.base_path().display());
        Self::with_storage(config, Arc::new(storage), analysis).await
    }
}

impl<S: Storage> App<S> {
    /// Open the configured board from `storage`.
    ///
    /// Example sessions always start from the analysis (or an empty board)
    /// and never read or write storage. Persistent sessions load the saved
    /// board, seeding a new one only if none exists yet.
    pub async fn with_storage(
        config: AppConfig,
        storage: Arc<S>,
        analysis: Option<ProjectAnalysis>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let mut autosave = AutoSaveManager::new(storage).with_interval(config.autosave_interval());

        let board = if config.mode().is_example() {
            log::info!("Opening example board; changes will not be saved");
            initial_board(&config, analysis.as_ref())
        } else {
            match autosave.load(&config.project_key).await {
                Ok(board) => {
                    log::info!("Loaded board '{}' ({} cards)", config.project_key, board.total_cards());
                    board
                }
                Err(StorageError::NotFound(_)) => {
                    log::info!("No saved board for '{}', starting a new one", config.project_key);
                    initial_board(&config, analysis.as_ref())
                }
                Err(e) => return Err(e.into()),
            }
        };

        let (tx, changes) = channel();
        let mut controller =
            BoardController::with_board(board, config.project_key.clone(), config.mode());
        controller.subscribe(tx);

        Ok(Self {
            config,
            controller,
            changes,
            autosave,
        })
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    pub fn board(&self) -> Arc<Board> {
        self.controller.board()
    }

    pub fn autosave(&self) -> &AutoSaveManager<S> {
        &self.autosave
    }

    /// Layout of the current board, used as the hit-test geometry.
    pub fn layout(&self) -> BoardLayout {
        BoardLayout::compute(&self.controller.board(), &self.config.layout)
    }

    /// Apply `events` in order, saving committed boards as the auto-save
    /// interval allows.
    pub async fn replay(&mut self, events: &[BoardEvent]) -> Result<ReplayStats, AppError> {
        let mut stats = ReplayStats::default();
        for event in events {
            let layout = self.layout();
            if self.controller.handle_event(event, &layout) {
                stats.commits += 1;
            }
            stats.events += 1;

            self.drain_changes();
            if self.autosave.maybe_save().await? {
                stats.saves += 1;
            }
        }
        log::info!(
            "Replayed {} events: {} commits, {} saves",
            stats.events,
            stats.commits,
            stats.saves
        );
        Ok(stats)
    }

    /// Write any pending change regardless of the interval.
    pub async fn flush(&mut self) -> Result<bool, AppError> {
        self.drain_changes();
        Ok(self.autosave.flush().await?)
    }

    fn drain_changes(&mut self) {
        for change in self.changes.try_iter() {
            self.autosave.record(change);
        }
    }

    /// One line per column: title, count, and card titles.
    pub fn summary(&self) -> Vec<String> {
        let board = self.controller.board();
        ColumnId::ALL
            .iter()
            .map(|&id| {
                let column = board.column(id);
                let titles: Vec<&str> = column.cards.iter().map(|c| c.title.as_str()).collect();
                format!("{} ({}): {}", column.title, column.len(), titles.join(", "))
            })
            .collect()
    }
}

fn initial_board(config: &AppConfig, analysis: Option<&ProjectAnalysis>) -> Board {
    match analysis {
        Some(analysis) => seed_board(analysis, &CardIdGenerator::new()),
        None => Board::new(config.project_key.clone()),
    }
}
