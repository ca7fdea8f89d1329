//! Drag session tracking for a single pointer-driven move gesture.

use crate::board::Board;
use crate::card::Card;
use crate::column::ColumnId;
use crate::geometry::GeometryProvider;
use crate::hit_test::{self, DropTarget};
use kurbo::Point;

/// Snapshot taken when a drag starts. Read-only for the whole gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    card: Card,
    source: ColumnId,
}

impl DragSession {
    pub fn new(card: Card, source: ColumnId) -> Self {
        Self { card, source }
    }

    /// The dragged card, as it was when the drag started.
    pub fn card(&self) -> &Card {
        &self.card
    }

    /// Column the card was picked up from.
    pub fn source(&self) -> ColumnId {
        self.source
    }
}

/// State of the drag tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A card is being dragged. `target` is the last resolved drop slot.
    Dragging {
        session: DragSession,
        target: Option<DropTarget>,
    },
}

/// What a finished gesture left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub session: DragSession,
    pub target: Option<DropTarget>,
}

/// Two-state machine (`Idle` / `Dragging`) for the current gesture.
///
/// Only one session is ever active. Starting a new drag while one is in
/// progress replaces the old session; the replaced gesture never commits.
/// The tracker is never persisted, so a reload always starts `Idle`.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging { session, .. } => Some(session),
            DragState::Idle => None,
        }
    }

    /// The current drop target. Always `None` while idle.
    pub fn drop_target(&self) -> Option<DropTarget> {
        match &self.state {
            DragState::Dragging { target, .. } => *target,
            DragState::Idle => None,
        }
    }

    /// `Idle -> Dragging`. The card is copied, so later board commits cannot
    /// change the snapshot.
    pub fn start(&mut self, card: &Card, source: ColumnId) {
        if let DragState::Dragging { session, .. } = &self.state {
            log::warn!(
                "Drag of {} started while {} was still being dragged; replacing",
                card.id,
                session.card.id
            );
        }
        log::debug!("Drag start: {} from {}", card.id, source);
        self.state = DragState::Dragging {
            session: DragSession::new(card.clone(), source),
            target: None,
        };
    }

    /// Recompute the drop target for a pointer sample over `board`. Ignored
    /// while idle.
    pub fn update(
        &mut self,
        point: Point,
        geometry: &impl GeometryProvider,
        board: &Board,
    ) -> Option<DropTarget> {
        match &mut self.state {
            DragState::Dragging { target, .. } => {
                *target = hit_test::resolve(point, geometry, board);
                *target
            }
            DragState::Idle => None,
        }
    }

    /// Clear the drop target while keeping the session, e.g. when the
    /// pointer leaves the board.
    pub fn clear_target(&mut self) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = None;
        }
    }

    /// `Dragging -> Idle`, unconditionally. Returns the finished session and
    /// its last drop target, or `None` if no drag was active.
    pub fn end(&mut self) -> Option<DragOutcome> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { session, target } => Some(DragOutcome { session, target }),
            DragState::Idle => None,
        }
    }

    /// Abort the gesture. The returned outcome never carries a target.
    pub fn cancel(&mut self) -> Option<DragOutcome> {
        self.end().map(|outcome| DragOutcome {
            target: None,
            ..outcome
        })
    }
}
