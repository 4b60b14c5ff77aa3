//! Node content measurement and the fixed layout of a node's parts.
//!
//! A node's box is the smallest grid-aligned rectangle that fits its head
//! and one row per check. Text is measured with a fixed advance width, which
//! is all a headless engine can know; a GUI host can feed real metrics
//! through [`Metrics`].

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{
    BODY_PADDING_BOTTOM, BUTTON_GAP, BUTTON_SIZE, CHAR_WIDTH, HEAD_CONTROLS_WIDTH, HEAD_HEIGHT, MIN_NODE_WIDTH,
    ROW_CHROME_WIDTH, ROW_HEIGHT,
};
use crate::geom::{Rect, Size, round_up_to_grid};

/// Text and chrome metrics used to size nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub head_height: f64,
    pub row_height: f64,
    pub body_padding_bottom: f64,
    pub min_width: f64,
    pub char_width: f64,
    pub head_controls_width: f64,
    pub row_chrome_width: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            head_height: HEAD_HEIGHT,
            row_height: ROW_HEIGHT,
            body_padding_bottom: BODY_PADDING_BOTTOM,
            min_width: MIN_NODE_WIDTH,
            char_width: CHAR_WIDTH,
            head_controls_width: HEAD_CONTROLS_WIDTH,
            row_chrome_width: ROW_CHROME_WIDTH,
        }
    }
}

impl Metrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    /// Natural (unrounded) size of a node with `title` and the given check labels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn natural_size<'a>(&self, title: &str, checks: impl IntoIterator<Item = &'a str>) -> Size {
        let mut width = self.min_width.max(self.text_width(title) + self.head_controls_width);
        let mut rows = 0usize;
        for label in checks {
            rows += 1;
            width = width.max(self.text_width(label) + self.row_chrome_width);
        }
        let height = self.head_height + rows as f64 * self.row_height + self.body_padding_bottom;
        Size::new(width, height)
    }

    /// Grid-aligned box size for a node.
    #[must_use]
    pub fn node_size<'a>(&self, title: &str, checks: impl IntoIterator<Item = &'a str>, grid: f64) -> Size {
        let natural = self.natural_size(title, checks);
        Size::new(round_up_to_grid(natural.width, grid), round_up_to_grid(natural.height, grid))
    }

    /// Rectangle of the head strip of a node box.
    #[must_use]
    pub fn head_rect(&self, node: &Rect) -> Rect {
        Rect::new(node.x, node.y, node.width, self.head_height)
    }

    /// Rectangle of check row `index` of a node box.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn row_rect(&self, node: &Rect, index: usize) -> Rect {
        Rect::new(node.x, node.y + self.head_height + index as f64 * self.row_height, node.width, self.row_height)
    }

    /// Index of the check row containing world-space `y`, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_at(&self, node: &Rect, y: f64, rows: usize) -> Option<usize> {
        let offset = y - node.y - self.head_height;
        if offset < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let index = (offset / self.row_height).floor() as usize;
        (index < rows).then_some(index)
    }
}

/// Rectangle of the delete button in the head of a node box.
#[must_use]
pub fn delete_button_rect(node: &Rect) -> Rect {
    Rect::new(node.right() - BUTTON_GAP - BUTTON_SIZE, node.y + BUTTON_GAP, BUTTON_SIZE, BUTTON_SIZE)
}

/// Rectangle of the edit button, left of the delete button.
#[must_use]
pub fn edit_button_rect(node: &Rect) -> Rect {
    let delete = delete_button_rect(node);
    Rect::new(delete.x - BUTTON_GAP - BUTTON_SIZE, delete.y, BUTTON_SIZE, BUTTON_SIZE)
}
