//! Content queue - append-only card sequence with a read cursor
//!
//! The cursor never passes the end. `current()` is `None` exactly when the
//! cursor sits at the end, which is the "exhausted" state that waits for a
//! replenishment. Appending and advancing are the only mutations; `reseed`
//! replaces the whole sequence at session start.

use crate::types::ContentItem;

#[derive(Debug, Clone, Default)]
pub struct ContentQueue {
    items: Vec<ContentItem>,
    cursor: usize,
}

impl ContentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents and rewind the cursor.
    pub fn reseed(&mut self, items: Vec<ContentItem>) {
        self.items = items;
        self.cursor = 0;
    }

    pub fn append(&mut self, items: impl IntoIterator<Item = ContentItem>) -> usize {
        let before = self.items.len();
        self.items.extend(items);
        self.items.len() - before
    }

    pub fn current(&self) -> Option<&ContentItem> {
        self.items.get(self.cursor)
    }

    /// Move past the current card. Returns false when already exhausted.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.items.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cards not yet dealt, including the current one.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }
}
