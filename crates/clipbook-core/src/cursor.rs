//! Traversal cursor over a [`RowSet`].

use clipbook_model::RowSet;

/// Index of the first unreviewed row, or `rows.len()` when review is
/// complete.
///
/// Moves forward only by scanning; [`rewind_to`](Self::rewind_to) is the
/// single way back and is used by undo and reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalCursor {
    position: usize,
}

impl TraversalCursor {
    /// Place a cursor on the first unreviewed row.
    pub fn start(rows: &RowSet) -> Self {
        let mut cursor = Self::default();
        cursor.advance(rows);
        cursor
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self, rows: &RowSet) -> bool {
        self.position >= rows.len()
    }

    /// Skip reviewed rows from the current position onwards.
    pub fn advance(&mut self, rows: &RowSet) -> usize {
        while self.position < rows.len() && rows.is_reviewed(self.position) {
            self.position += 1;
        }
        self.position
    }

    /// Move to `index`, then skip forward past reviewed rows.
    pub fn rewind_to(&mut self, index: usize, rows: &RowSet) -> usize {
        self.position = index.min(rows.len());
        self.advance(rows)
    }
}
