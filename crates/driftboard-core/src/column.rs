//! The four fixed board columns.

use crate::card::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Identity of a board column. The set is closed: columns are never created
/// or destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl ColumnId {
    /// All columns in board order (left to right).
    pub const ALL: [ColumnId; 4] = [
        ColumnId::Backlog,
        ColumnId::Todo,
        ColumnId::InProgress,
        ColumnId::Done,
    ];

    /// The serialized key of this column.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Backlog => "backlog",
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "inProgress",
            ColumnId::Done => "done",
        }
    }

    /// Title shown for a freshly created board.
    pub fn default_title(self) -> &'static str {
        match self {
            ColumnId::Backlog => "Backlog",
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Done => "Done",
        }
    }

    /// Position of this column in [`ColumnId::ALL`].
    pub fn position(self) -> usize {
        match self {
            ColumnId::Backlog => 0,
            ColumnId::Todo => 1,
            ColumnId::InProgress => 2,
            ColumnId::Done => 3,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column key outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for ColumnId {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// One column and its ordered cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    /// An empty column with its default title.
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            title: id.default_title().to_string(),
            cards: Vec::new(),
        }
    }

    /// Position of a card in this column.
    pub fn position_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The four columns of a board, indexed by [`ColumnId`].
///
/// Columns are reference counted so that successive board snapshots share
/// every column a transaction did not touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Columns {
    backlog: Arc<Column>,
    todo: Arc<Column>,
    in_progress: Arc<Column>,
    done: Arc<Column>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            backlog: Arc::new(Column::new(ColumnId::Backlog)),
            todo: Arc::new(Column::new(ColumnId::Todo)),
            in_progress: Arc::new(Column::new(ColumnId::InProgress)),
            done: Arc::new(Column::new(ColumnId::Done)),
        }
    }
}

impl Columns {
    fn slot(&self, id: ColumnId) -> &Arc<Column> {
        match id {
            ColumnId::Backlog => &self.backlog,
            ColumnId::Todo => &self.todo,
            ColumnId::InProgress => &self.in_progress,
            ColumnId::Done => &self.done,
        }
    }

    fn slot_mut(&mut self, id: ColumnId) -> &mut Arc<Column> {
        match id {
            ColumnId::Backlog => &mut self.backlog,
            ColumnId::Todo => &mut self.todo,
            ColumnId::InProgress => &mut self.in_progress,
            ColumnId::Done => &mut self.done,
        }
    }

    /// Shared handle to a column.
    pub fn shared(&self, id: ColumnId) -> &Arc<Column> {
        self.slot(id)
    }

    /// Mutable access to a column, cloning it first if another snapshot
    /// still shares it.
    pub(crate) fn make_mut(&mut self, id: ColumnId) -> &mut Column {
        Arc::make_mut(self.slot_mut(id))
    }

    /// Iterate columns in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        ColumnId::ALL.into_iter().map(move |id| self.slot(id).as_ref())
    }

    /// Keys deserialized into the wrong slot (e.g. `"todo": { "id": "done" }`)
    /// are corrected to the slot they were read from.
    pub(crate) fn normalize_ids(&mut self) {
        for id in ColumnId::ALL {
            if self.slot(id).id != id {
                log::warn!("Column stored under '{}' claimed id '{}'", id, self.slot(id).id);
                self.make_mut(id).id = id;
            }
        }
    }
}

impl Index<ColumnId> for Columns {
    type Output = Column;

    fn index(&self, id: ColumnId) -> &Column {
        self.slot(id)
    }
}
