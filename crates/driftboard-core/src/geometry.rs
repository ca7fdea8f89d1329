//! Board geometry: where columns and cards currently sit on screen.
//!
//! The hit-tester never queries a real layout engine directly. Hosts hand it a
//! [`GeometryProvider`], which keeps the drop logic testable with synthetic
//! rectangles and usable outside a browser.

use crate::board::Board;
use crate::column::ColumnId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of column and card rectangles for the current layout.
pub trait GeometryProvider {
    /// Bounding region of a column, if it is laid out.
    fn column_bounds(&self, column: ColumnId) -> Option<Rect>;

    /// Bounding regions of the column's rendered cards, in sequence order.
    fn card_bounds(&self, column: ColumnId) -> Vec<Rect>;

    /// Vertical midpoints of the column's cards, in sequence order.
    fn card_midpoints(&self, column: ColumnId) -> Vec<f64> {
        self.card_bounds(column)
            .into_iter()
            .map(|rect| rect.center().y)
            .collect()
    }
}

/// Closed-interval containment on all four edges.
///
/// `Rect::contains` excludes the right and bottom edges; a pointer sitting on
/// a column border still belongs to that column here.
pub fn contains_closed(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Geometry supplied directly by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    columns: HashMap<ColumnId, Rect>,
    cards: HashMap<ColumnId, Vec<Rect>>,
}

impl StaticGeometry {
    /// Create geometry with no columns laid out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region of a column.
    pub fn with_column(mut self, column: ColumnId, bounds: Rect) -> Self {
        self.columns.insert(column, bounds);
        self
    }

    /// Set the card regions of a column, in sequence order.
    pub fn with_cards(mut self, column: ColumnId, cards: Vec<Rect>) -> Self {
        self.cards.insert(column, cards);
        self
    }
}

impl GeometryProvider for StaticGeometry {
    fn column_bounds(&self, column: ColumnId) -> Option<Rect> {
        self.columns.get(&column).copied()
    }

    fn card_bounds(&self, column: ColumnId) -> Vec<Rect> {
        self.cards.get(&column).cloned().unwrap_or_default()
    }
}

/// Dimensions used to lay a board out without a rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Top-left corner of the first column.
    pub origin_x: f64,
    pub origin_y: f64,
    pub column_width: f64,
    /// Horizontal space between columns.
    pub column_gap: f64,
    /// Height of a column; cards past the bottom still get rectangles.
    pub column_height: f64,
    /// Space above the first card (column title and counter).
    pub header_height: f64,
    pub card_height: f64,
    /// Vertical space between cards.
    pub card_gap: f64,
    /// Horizontal inset of cards inside their column.
    pub card_inset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            column_width: 280.0,
            column_gap: 24.0,
            column_height: 800.0,
            header_height: 48.0,
            card_height: 88.0,
            card_gap: 12.0,
            card_inset: 16.0,
        }
    }
}

/// A computed grid layout: columns side by side, cards stacked top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    columns: [Rect; 4],
    cards: [Vec<Rect>; 4],
}

impl BoardLayout {
    /// Lay out every card of `board`.
    pub fn compute(board: &Board, config: &LayoutConfig) -> Self {
        let mut columns = [Rect::ZERO; 4];
        let mut cards: [Vec<Rect>; 4] = Default::default();

        for column in ColumnId::ALL {
            let slot = column.position();
            let x0 = config.origin_x + slot as f64 * (config.column_width + config.column_gap);
            let count = board.column(column).len();
            let stacked = config.header_height
                + count as f64 * (config.card_height + config.card_gap);
            let height = config.column_height.max(stacked);
            columns[slot] = Rect::new(x0, config.origin_y, x0 + config.column_width, config.origin_y + height);

            cards[slot] = (0..count)
                .map(|i| {
                    let y0 = config.origin_y
                        + config.header_height
                        + i as f64 * (config.card_height + config.card_gap);
                    Rect::new(
                        x0 + config.card_inset,
                        y0,
                        x0 + config.column_width - config.card_inset,
                        y0 + config.card_height,
                    )
                })
                .collect();
        }

        Self { columns, cards }
    }

    /// Center of a card's rectangle, useful for synthesizing pointer input.
    pub fn card_center(&self, column: ColumnId, index: usize) -> Option<Point> {
        self.cards[column.position()].get(index).map(|rect| rect.center())
    }
}

impl GeometryProvider for BoardLayout {
    fn column_bounds(&self, column: ColumnId) -> Option<Rect> {
        Some(self.columns[column.position()])
    }

    fn card_bounds(&self, column: ColumnId) -> Vec<Rect> {
        self.cards[column.position()].clone()
    }
}
