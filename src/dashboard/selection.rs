//! Which feed record, if any, is open in the detail overlay.

use crate::backend::FeedItem;

/// At most one selected record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    None,
    Selected(FeedItem),
}

impl Selection {
    #[must_use]
    pub const fn item(&self) -> Option<&FeedItem> {
        match self {
            Self::None => None,
            Self::Selected(item) => Some(item),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Sole owner of the [`Selection`]. Never talks to the backend.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `item`, replacing any previous selection.
    pub fn select(&mut self, item: FeedItem) {
        self.state = Selection::Selected(item);
    }

    pub fn clear(&mut self) {
        self.state = Selection::None;
    }

    #[must_use]
    pub const fn current(&self) -> &Selection {
        &self.state
    }
}
