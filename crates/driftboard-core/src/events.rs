//! Inbound UI events, in a serializable form so sessions can be recorded and
//! replayed.

use crate::card::{CardDraft, CardId, CardPatch};
use serde::{Deserialize, Serialize};

/// A call from the UI layer into the board engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Pick up a card from the column currently holding it.
    DragStart { card_id: CardId },
    /// Pointer sample while dragging.
    DragMove { x: f64, y: f64 },
    /// Pointer left the board; the drag continues without a target.
    DragLeave,
    /// Pointer released.
    DragEnd,
    /// Gesture aborted (escape, focus loss, pointer capture lost).
    DragCancel,
    /// Column keys arrive as raw strings; unknown keys are ignored.
    AddCard {
        column: String,
        #[serde(default)]
        draft: CardDraft,
    },
    UpdateCard { id: CardId, patch: CardPatch },
    DeleteCard { id: CardId },
}

impl BoardEvent {
    /// Parse a JSON array of events.
    pub fn parse_script(json: &str) -> Result<Vec<BoardEvent>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
