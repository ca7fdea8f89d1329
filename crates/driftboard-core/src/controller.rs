//! The engine facade the UI layer talks to.

use crate::board::Board;
use crate::card::{Card, CardDraft, CardId, CardIdGenerator, CardPatch};
use crate::column::ColumnId;
use crate::events::BoardEvent;
use crate::geometry::GeometryProvider;
use crate::hit_test::DropTarget;
use crate::lifecycle;
use crate::reorder;
use crate::session::DragTracker;
use crate::store::{BoardObserver, BoardStore, SessionMode};
use kurbo::Point;
use std::sync::Arc;

/// Routes UI calls to the drag tracker and the card transactions, and commits
/// their results through the store.
///
/// Pointer moves only touch the tracker; the board changes on drag end and on
/// lifecycle calls, nowhere else.
#[derive(Debug)]
pub struct BoardController {
    store: BoardStore,
    drag: DragTracker,
    ids: CardIdGenerator,
}

impl BoardController {
    pub fn new(store: BoardStore) -> Self {
        Self {
            store,
            drag: DragTracker::new(),
            ids: CardIdGenerator::new(),
        }
    }

    /// Convenience constructor for a fresh store around `board`.
    pub fn with_board(board: Board, project_key: impl Into<String>, mode: SessionMode) -> Self {
        Self::new(BoardStore::new(board, project_key, mode))
    }

    /// Register a persistence observer on the underlying store.
    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.store.subscribe(observer);
    }

    /// Current board snapshot.
    pub fn board(&self) -> Arc<Board> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    /// Drop slot to highlight, if a drag is in progress over a column.
    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drag.drop_target()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Begin dragging `card` out of `source`.
    pub fn drag_start(&mut self, card: &Card, source: ColumnId) {
        self.drag.start(card, source);
    }

    /// Begin dragging the card with `id` from wherever it currently is.
    /// Returns `false` if the board holds no such card.
    pub fn drag_start_by_id(&mut self, id: &CardId) -> bool {
        let board = self.store.snapshot();
        match board.locate(id) {
            Some((column, index)) => {
                self.drag.start(&board.column(column).cards[index], column);
                true
            }
            None => {
                log::warn!("Cannot drag unknown card {}", id);
                false
            }
        }
    }

    /// Pointer sample during a drag. Appends are sized from the committed
    /// board, not from however many cards `geometry` has rendered.
    pub fn drag_move(&mut self, point: Point, geometry: &impl GeometryProvider) -> Option<DropTarget> {
        self.drag.update(point, geometry, self.store.board())
    }

    /// Pointer left the board mid-drag. The gesture stays active but a
    /// release now would not move anything.
    pub fn drag_leave(&mut self) {
        self.drag.clear_target();
    }

    /// Pointer released. Ends the session in every case and commits the move
    /// if the last sample was over a column. Returns whether the board changed.
    pub fn drag_end(&mut self) -> bool {
        let Some(outcome) = self.drag.end() else {
            return false;
        };
        match reorder::apply_drop(self.store.board(), &outcome) {
            Some(next) => {
                self.store.commit(next);
                true
            }
            None => {
                log::debug!("Drag of {} ended without a drop", outcome.session.card().id);
                false
            }
        }
    }

    /// Abort the current gesture without touching the board.
    pub fn drag_cancel(&mut self) {
        if let Some(outcome) = self.drag.cancel() {
            log::debug!("Drag of {} cancelled", outcome.session.card().id);
        }
    }

    /// Add a card to the top of `column`. Returns the new card's id, or
    /// `None` if the draft was rejected.
    pub fn add_card(&mut self, column: ColumnId, draft: CardDraft) -> Option<CardId> {
        let (next, id) = lifecycle::add_card(self.store.board(), column, draft, &self.ids)?;
        self.store.commit(next);
        Some(id)
    }

    /// Patch a card in place. Returns whether the board changed.
    pub fn update_card(&mut self, id: &CardId, patch: &CardPatch) -> bool {
        match lifecycle::update_card(self.store.board(), id, patch) {
            Some(next) => {
                self.store.commit(next);
                true
            }
            None => false,
        }
    }

    /// Delete a card. Returns whether the board changed.
    pub fn delete_card(&mut self, id: &CardId) -> bool {
        match lifecycle::delete_card(self.store.board(), id) {
            Some(next) => {
                self.store.commit(next);
                true
            }
            None => false,
        }
    }

    /// Dispatch a recorded UI event. Returns whether the board changed.
    pub fn handle_event(&mut self, event: &BoardEvent, geometry: &impl GeometryProvider) -> bool {
        match event {
            BoardEvent::DragStart { card_id } => {
                self.drag_start_by_id(card_id);
                false
            }
            BoardEvent::DragMove { x, y } => {
                self.drag_move(Point::new(*x, *y), geometry);
                false
            }
            BoardEvent::DragLeave => {
                self.drag_leave();
                false
            }
            BoardEvent::DragEnd => self.drag_end(),
            BoardEvent::DragCancel => {
                self.drag_cancel();
                false
            }
            BoardEvent::AddCard { column, draft } => match column.parse::<ColumnId>() {
                Ok(column) => self.add_card(column, draft.clone()).is_some(),
                Err(e) => {
                    log::warn!("Ignoring add_card: {}", e);
                    false
                }
            },
            BoardEvent::UpdateCard { id, patch } => self.update_card(id, patch),
            BoardEvent::DeleteCard { id } => self.delete_card(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoardLayout, LayoutConfig, StaticGeometry};
    use kurbo::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    fn controller(mode: SessionMode) -> (BoardController, Rc<Cell<usize>>) {
        let notified = Rc::new(Cell::new(0));
        let mut controller = BoardController::with_board(Board::new("demo"), "demo", mode);
        let counter = Rc::clone(&notified);
        controller.subscribe(move |_: &Arc<Board>, _: &str| counter.set(counter.get() + 1));
        (controller, notified)
    }

    fn titles(controller: &BoardController, column: ColumnId) -> Vec<String> {
        controller
            .board()
            .column(column)
            .cards
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }

    /// Backlog holds D, C, B, A top to bottom (each add prepends).
    fn with_four_cards(mode: SessionMode) -> (BoardController, Rc<Cell<usize>>) {
        let (mut controller, notified) = controller(mode);
        for title in ["A", "B", "C", "D"] {
            controller.add_card(ColumnId::Backlog, CardDraft::titled(title)).unwrap();
        }
        (controller, notified)
    }

    fn layout(controller: &BoardController) -> BoardLayout {
        BoardLayout::compute(&controller.board(), &LayoutConfig::default())
    }

    #[test]
    fn test_drag_across_columns() {
        let (mut controller, notified) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let top = controller.board().column(ColumnId::Backlog).cards[0].id.clone();

        assert!(controller.drag_start_by_id(&top));
        let todo = geometry.column_bounds(ColumnId::Todo).unwrap();
        let target = controller.drag_move(todo.center(), &geometry);
        assert_eq!(target, Some(DropTarget::new(ColumnId::Todo, 0)));
        assert!(controller.drag_end());

        assert_eq!(titles(&controller, ColumnId::Backlog), vec!["C", "B", "A"]);
        assert_eq!(titles(&controller, ColumnId::Todo), vec!["D"]);
        assert_eq!(controller.board().total_cards(), 4);
        assert_eq!(notified.get(), 5);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_drag_within_column_uses_midpoints() {
        let (mut controller, _) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let top = controller.board().column(ColumnId::Backlog).cards[0].id.clone();

        // just below the third card's midpoint: slot 3, in front of A
        let third = geometry.card_center(ColumnId::Backlog, 2).unwrap();
        controller.drag_start_by_id(&top);
        controller.drag_move(Point::new(third.x, third.y + 1.0), &geometry);
        assert!(controller.drag_end());

        assert_eq!(titles(&controller, ColumnId::Backlog), vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_release_outside_is_no_op() {
        let (mut controller, notified) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let before = controller.board();
        let top = before.column(ColumnId::Backlog).cards[0].id.clone();

        controller.drag_start_by_id(&top);
        controller.drag_move(Point::new(-100.0, -100.0), &geometry);
        assert!(!controller.drag_end());

        assert_eq!(*controller.board(), *before);
        assert_eq!(notified.get(), 4);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_moves_never_commit() {
        let (mut controller, notified) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let top = controller.board().column(ColumnId::Backlog).cards[0].id.clone();
        let revision = controller.store().revision();

        controller.drag_start_by_id(&top);
        for i in 0..50 {
            controller.drag_move(Point::new(i as f64 * 20.0, 100.0), &geometry);
        }
        assert_eq!(controller.store().revision(), revision);
        assert_eq!(notified.get(), 4);
    }

    #[test]
    fn test_cancel_discards_target() {
        let (mut controller, _) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let before = controller.board();
        let top = before.column(ColumnId::Backlog).cards[0].id.clone();

        controller.drag_start_by_id(&top);
        controller.drag_move(geometry.column_bounds(ColumnId::Done).unwrap().center(), &geometry);
        controller.drag_cancel();
        assert!(!controller.drag_end());
        assert_eq!(*controller.board(), *before);
    }

    #[test]
    fn test_drop_below_partially_rendered_column_appends() {
        let (mut controller, _) = controller(SessionMode::Persistent);
        for title in ["A", "B", "C"] {
            controller.add_card(ColumnId::Todo, CardDraft::titled(title)).unwrap();
        }
        controller.add_card(ColumnId::Backlog, CardDraft::titled("X")).unwrap();
        let moving = controller.board().card_ids(ColumnId::Backlog)[0].clone();

        // only the first todo card is on screen
        let geometry = StaticGeometry::new()
            .with_column(ColumnId::Todo, Rect::new(0.0, 0.0, 100.0, 1000.0))
            .with_cards(ColumnId::Todo, vec![Rect::new(0.0, 40.0, 100.0, 120.0)]);

        controller.drag_start_by_id(&moving);
        let target = controller.drag_move(Point::new(50.0, 900.0), &geometry);
        assert_eq!(target, Some(DropTarget::new(ColumnId::Todo, 3)));
        assert!(controller.drag_end());

        assert_eq!(controller.board().locate(&moving), Some((ColumnId::Todo, 3)));
        assert_eq!(titles(&controller, ColumnId::Todo), vec!["C", "B", "A", "X"]);
    }

    #[test]
    fn test_leaving_board_then_release_is_no_op() {
        let (mut controller, notified) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let before = controller.board();
        let top = before.column(ColumnId::Backlog).cards[0].id.clone();

        controller.drag_start_by_id(&top);
        controller.drag_move(geometry.column_bounds(ColumnId::Done).unwrap().center(), &geometry);
        controller.drag_leave();
        assert!(controller.is_dragging());
        assert_eq!(controller.drop_target(), None);

        assert!(!controller.drag_end());
        assert_eq!(*controller.board(), *before);
        assert_eq!(notified.get(), 4);
    }

    #[test]
    fn test_card_deleted_mid_drag_is_ignored() {
        let (mut controller, _) = with_four_cards(SessionMode::Persistent);
        let geometry = layout(&controller);
        let top = controller.board().column(ColumnId::Backlog).cards[0].id.clone();

        controller.drag_start_by_id(&top);
        controller.drag_move(geometry.column_bounds(ColumnId::Done).unwrap().center(), &geometry);
        assert!(controller.delete_card(&top));
        assert!(!controller.drag_end());
        assert_eq!(controller.board().total_cards(), 3);
        controller.board().validate().unwrap();
    }

    #[test]
    fn test_example_mode_updates_without_notifying() {
        let (mut controller, notified) = with_four_cards(SessionMode::Example);
        let geometry = layout(&controller);
        let top = controller.board().column(ColumnId::Backlog).cards[0].id.clone();

        controller.drag_start_by_id(&top);
        controller.drag_move(geometry.column_bounds(ColumnId::Done).unwrap().center(), &geometry);
        assert!(controller.drag_end());

        assert_eq!(titles(&controller, ColumnId::Done), vec!["D"]);
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_conservation_over_mixed_operations() {
        let (mut controller, _) = with_four_cards(SessionMode::Persistent);
        let geometry = StaticGeometry::new()
            .with_column(ColumnId::InProgress, Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut adds = 4;
        let mut deletes = 0;

        let ids: Vec<CardId> = controller.board().card_ids(ColumnId::Backlog);
        for id in &ids[..2] {
            controller.drag_start_by_id(id);
            controller.drag_move(Point::new(50.0, 50.0), &geometry);
            controller.drag_end();
        }
        if controller.add_card(ColumnId::Done, CardDraft::titled("E")).is_some() {
            adds += 1;
        }
        if controller.delete_card(&ids[3]) {
            deletes += 1;
        }
        controller.delete_card(&ids[3]);

        let board = controller.board();
        assert_eq!(board.total_cards(), adds - deletes);
        board.validate().unwrap();
        assert_eq!(board.column(ColumnId::InProgress).len(), 2);
    }

    #[test]
    fn test_handle_event_rejects_unknown_column() {
        let (mut controller, notified) = controller(SessionMode::Persistent);
        let geometry = StaticGeometry::new();
        let event = BoardEvent::AddCard {
            column: "archive".to_string(),
            draft: CardDraft::titled("x"),
        };
        assert!(!controller.handle_event(&event, &geometry));
        assert_eq!(controller.board().total_cards(), 0);
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_handle_event_replays_script() {
        let (mut controller, _) = controller(SessionMode::Persistent);
        let geometry = StaticGeometry::new()
            .with_column(ColumnId::Todo, Rect::new(0.0, 0.0, 100.0, 400.0));

        let add = BoardEvent::AddCard {
            column: "backlog".to_string(),
            draft: CardDraft::titled("Only"),
        };
        assert!(controller.handle_event(&add, &geometry));
        let id = controller.board().card_ids(ColumnId::Backlog)[0].clone();

        let script = vec![
            BoardEvent::DragStart { card_id: id.clone() },
            BoardEvent::DragMove { x: 50.0, y: 10.0 },
            BoardEvent::DragLeave,
            BoardEvent::DragMove { x: 50.0, y: 10.0 },
            BoardEvent::DragEnd,
        ];
        let changed: Vec<bool> = script.iter().map(|e| controller.handle_event(e, &geometry)).collect();
        assert_eq!(changed, vec![false, false, false, false, true]);
        assert_eq!(controller.board().locate(&id), Some((ColumnId::Todo, 0)));

        let patch = CardPatch {
            notes: Some("done soon".to_string()),
            ..CardPatch::default()
        };
        assert!(controller.handle_event(&BoardEvent::UpdateCard { id: id.clone(), patch }, &geometry));
        assert!(controller.handle_event(&BoardEvent::DeleteCard { id: id.clone() }, &geometry));
        assert!(!controller.handle_event(&BoardEvent::DeleteCard { id }, &geometry));
    }
}
