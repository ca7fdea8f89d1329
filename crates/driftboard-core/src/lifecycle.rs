//! Card lifecycle transactions: add, update, delete.
//!
//! Each function builds the next board from the previous one and never
//! touches its input. A `None` result means there is nothing to commit.

use crate::board::Board;
use crate::card::{Card, CardDraft, CardId, CardIdGenerator, CardPatch};
use crate::column::ColumnId;

/// Prepend a new card built from `draft` to `column`.
///
/// Drafts with a blank title are rejected. Returns the new board and the id
/// assigned to the card.
pub fn add_card(
    board: &Board,
    column: ColumnId,
    draft: CardDraft,
    ids: &CardIdGenerator,
) -> Option<(Board, CardId)> {
    if !draft.is_valid() {
        log::debug!("Ignoring card draft with blank title");
        return None;
    }

    let id = ids.next_id();
    let mut next = board.clone();
    next.column_mut(column)
        .cards
        .insert(0, Card::from_draft(id.clone(), draft));
    log::debug!("Added {} to {}", id, column);
    Some((next, id))
}

/// Replace the card `id` in place with its patched value.
///
/// Returns `None` if no column holds `id`, the patch would blank the title,
/// or the patch changes nothing.
pub fn update_card(board: &Board, id: &CardId, patch: &CardPatch) -> Option<Board> {
    if patch.title.as_ref().is_some_and(|title| title.trim().is_empty()) {
        log::debug!("Ignoring update of {} with blank title", id);
        return None;
    }
    let (column, index) = board.locate(id)?;
    let current = &board.column(column).cards[index];
    let updated = current.patched(patch);
    if &updated == current {
        return None;
    }

    let mut next = board.clone();
    next.column_mut(column).cards[index] = updated;
    Some(next)
}

/// Remove the card `id` from whichever column holds it.
///
/// Returns `None` if no column holds `id`, so deleting twice is harmless.
pub fn delete_card(board: &Board, id: &CardId) -> Option<Board> {
    let (column, index) = board.locate(id)?;
    let mut next = board.clone();
    next.column_mut(column).cards.remove(index);
    log::debug!("Deleted {} from {}", id, column);
    Some(next)
}
