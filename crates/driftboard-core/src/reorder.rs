//! Applying a finished drag as one card move.

use crate::board::Board;
use crate::card::CardId;
use crate::column::ColumnId;
use crate::hit_test::DropTarget;
use crate::session::DragOutcome;

/// A single card move between or within columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    pub card: CardId,
    pub source: ColumnId,
    pub target: DropTarget,
}

impl Reorder {
    /// Build the move a finished drag asks for. A gesture that ended with no
    /// drop target yields nothing.
    pub fn from_outcome(outcome: &DragOutcome) -> Option<Self> {
        let target = outcome.target?;
        Some(Self {
            card: outcome.session.card().id.clone(),
            source: outcome.session.source(),
            target,
        })
    }

    /// Produce the board after the move, leaving `board` untouched.
    ///
    /// Returns `None` if the card is no longer in its source column. Only the
    /// source and destination columns are copied; the rest stay shared.
    pub fn apply(&self, board: &Board) -> Option<Board> {
        let Some(from) = board.column(self.source).position_of(&self.card) else {
            log::warn!("Dragged card {} not found in {}; ignoring drop", self.card, self.source);
            return None;
        };

        let same_column = self.source == self.target.column;
        let mut index = self.target.index;
        // Removal shifts every later slot left by one.
        if same_column && from < index {
            index -= 1;
        }

        let mut next = board.clone();
        let card = next.column_mut(self.source).cards.remove(from);
        let destination = next.column_mut(self.target.column);
        let index = index.min(destination.cards.len());
        destination.cards.insert(index, card);

        log::debug!(
            "Moved {} from {}[{}] to {}[{}]",
            self.card,
            self.source,
            from,
            self.target.column,
            index
        );
        Some(next)
    }
}

/// Resolve a finished drag against `board`. `None` means nothing changes.
pub fn apply_drop(board: &Board, outcome: &DragOutcome) -> Option<Board> {
    Reorder::from_outcome(outcome)?.apply(board)
}
