//! Board document: a project's four ordered columns of cards.

use crate::card::{Card, CardId};
use crate::column::{Column, ColumnId, Columns, UnknownColumn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when a board read from outside the engine is malformed.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumn),
    #[error("Card {id} appears in both {first} and {second}")]
    DuplicateCard {
        id: CardId,
        first: ColumnId,
        second: ColumnId,
    },
    #[error("Invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The complete board for one project.
///
/// A `Board` value is never mutated once it has been committed; transactions
/// build a new board from the previous one. Cloning is cheap because columns
/// are shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub project_name: String,
    columns: Columns,
}

impl Default for Board {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Board {
    /// Create an empty board.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            columns: Columns::default(),
        }
    }

    /// Get a column.
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id]
    }

    /// Get the shared column container.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Copy-on-write access to a column. Only transactions use this, and only
    /// on a board that has not been committed yet.
    pub(crate) fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        self.columns.make_mut(id)
    }

    /// Find the column and position holding a card.
    pub fn locate(&self, id: &CardId) -> Option<(ColumnId, usize)> {
        ColumnId::ALL
            .into_iter()
            .find_map(|column| self.column(column).position_of(id).map(|index| (column, index)))
    }

    /// Get a card by id.
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.locate(id)
            .map(|(column, index)| &self.column(column).cards[index])
    }

    /// Total number of cards across all columns.
    pub fn total_cards(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Card ids of a column, in order.
    pub fn card_ids(&self, column: ColumnId) -> Vec<CardId> {
        self.column(column).cards.iter().map(|c| c.id.clone()).collect()
    }

    /// Check that every card id occurs in exactly one place.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut seen: HashMap<&CardId, ColumnId> = HashMap::with_capacity(self.total_cards());
        for column in self.columns.iter() {
            for card in &column.cards {
                if let Some(first) = seen.insert(&card.id, column.id) {
                    return Err(BoardError::DuplicateCard {
                        id: card.id.clone(),
                        first,
                        second: column.id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let mut board: Board = serde_json::from_str(json)?;
        board.columns.normalize_ids();
        board.validate()?;
        Ok(board)
    }
}
