//! Cards: the unit of work placed on a board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique card identifier. Assigned once at creation, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Wrap an existing identifier (e.g. one read back from storage).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Monotonic sequence shared by every generator in the process.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Produces collision-safe card ids.
///
/// Each id combines a process-wide increasing sequence number with a random
/// tiebreaker, so ids stay unique across generators and across reloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardIdGenerator;

impl CardIdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh id.
    pub fn next_id(&self) -> CardId {
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let tiebreak = Uuid::new_v4().simple().to_string();
        CardId(format!("card-{}-{}", seq, &tiebreak[..12]))
    }
}

/// Three-level scale used by both priority and difficulty.
macro_rules! level_enum {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            High,
            #[default]
            Medium,
            Low,
        }

        impl $name {
            /// All levels, highest first.
            pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

            /// Display name, identical to the serialized form.
            pub fn as_str(self) -> &'static str {
                match self {
                    Self::High => "High",
                    Self::Medium => "Medium",
                    Self::Low => "Low",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

level_enum!(
    /// How urgent a card is.
    Priority
);
level_enum!(
    /// How much effort a card is expected to take.
    Difficulty
);

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl Card {
    /// Build a card from a draft under the given id.
    pub fn from_draft(id: CardId, draft: CardDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            difficulty: draft.difficulty,
            tags: draft.tags,
            notes: draft.notes,
        }
    }

    /// Return a copy of this card with `patch` applied. The id is kept.
    pub fn patched(&self, patch: &CardPatch) -> Self {
        let mut card = self.clone();
        if let Some(title) = &patch.title {
            card.title = title.clone();
        }
        if let Some(description) = &patch.description {
            card.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            card.priority = priority;
        }
        if let Some(difficulty) = patch.difficulty {
            card.difficulty = difficulty;
        }
        if let Some(tags) = &patch.tags {
            card.tags = tags.clone();
        }
        if let Some(notes) = &patch.notes {
            card.notes = notes.clone();
        }
        card
    }
}

/// The content of a card that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDraft {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub notes: String,
}

impl Default for CardDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Some(Priority::Medium),
            difficulty: Difficulty::Medium,
            tags: Vec::new(),
            notes: String::new(),
        }
    }
}

impl CardDraft {
    /// A draft with the given title and default fields.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the draft can become a card. A blank title cannot.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// A partial update to an existing card. `None` leaves a field untouched.
///
/// `priority` is doubly optional: `Some(None)` clears the priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Option<Priority>>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl CardPatch {
    /// Check whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
