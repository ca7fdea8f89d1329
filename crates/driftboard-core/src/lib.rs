//! Driftboard Core Library
//!
//! Board model and interactive reorder engine for the Driftboard Kanban
//! board: hit-testing, drag sessions, reorder and card transactions, and the
//! board store that commits them.

pub mod analysis;
pub mod board;
pub mod card;
pub mod column;
pub mod controller;
pub mod events;
pub mod geometry;
pub mod lifecycle;
pub mod reorder;
pub mod session;
pub mod storage;
pub mod store;

pub use analysis::{ProjectAnalysis, seed_board};
pub use board::{Board, BoardError};
pub use card::{Card, CardDraft, CardId, CardIdGenerator, CardPatch, Difficulty, Priority};
pub use column::{Column, ColumnId, Columns, UnknownColumn};
pub use controller::BoardController;
pub use events::BoardEvent;
pub use geometry::{BoardLayout, GeometryProvider, LayoutConfig, StaticGeometry};
pub use hit_test::DropTarget;
pub use reorder::Reorder;
pub use session::{DragOutcome, DragSession, DragTracker};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{BoardChanged, BoardObserver, BoardStore, SessionMode};
