//! Seeding a board from a completed project analysis.
//!
//! Only the fields the board needs are modeled; anything else in the
//! analysis document is ignored on deserialization.

use crate::board::Board;
use crate::card::{Card, CardIdGenerator, Difficulty, Priority};
use crate::column::ColumnId;
use serde::{Deserialize, Serialize};

/// A suggested improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub difficulty: Difficulty,
}

/// A suggested next step. Next steps carry no priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NextSteps {
    pub short_term: Vec<NextStep>,
    pub long_term: Vec<NextStep>,
}

/// The parts of an analysis that become backlog cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    pub project_name: String,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(default)]
    pub next_steps: NextSteps,
}

impl ProjectAnalysis {
    /// Parse an analysis document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

const SHORT_TERM_TAG: &str = "short-term";
const LONG_TERM_TAG: &str = "long-term";

/// Build the initial board for `analysis`.
///
/// Every card lands in the backlog: improvements first (tagged with their
/// priority), then short-term and long-term next steps (tagged with their
/// horizon). Other columns start empty.
pub fn seed_board(analysis: &ProjectAnalysis, ids: &CardIdGenerator) -> Board {
    let improvements = analysis.improvements.iter().map(|imp| Card {
        id: ids.next_id(),
        title: imp.title.clone(),
        description: imp.description.clone(),
        priority: Some(imp.priority),
        difficulty: imp.difficulty,
        tags: vec![imp.priority.to_string()],
        notes: String::new(),
    });

    let steps = |steps: &[NextStep], tag: &'static str| {
        steps
            .iter()
            .map(move |step| Card {
                id: ids.next_id(),
                title: step.title.clone(),
                description: step.description.clone(),
                priority: None,
                difficulty: step.difficulty,
                tags: vec![tag.to_string()],
                notes: String::new(),
            })
            .collect::<Vec<_>>()
    };

    let mut board = Board::new(analysis.project_name.clone());
    let backlog = &mut board.column_mut(ColumnId::Backlog).cards;
    backlog.extend(improvements);
    backlog.extend(steps(&analysis.next_steps.short_term, SHORT_TERM_TAG));
    backlog.extend(steps(&analysis.next_steps.long_term, LONG_TERM_TAG));

    log::info!(
        "Seeded board '{}' with {} backlog cards",
        board.project_name,
        board.column(ColumnId::Backlog).len()
    );
    board
}
