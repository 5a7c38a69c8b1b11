//! Entity page controllers: search, selection and the Edit / Add / Remove actions.
//!
//! A page cycles `Idle -> {Editing, Adding, Removing} -> Persisted -> Idle`. Idle is the plain
//! [`PageView`]; the chosen [`PageAction`] decides which form the view carries; a successful
//! submit returns an [`ActionOutcome`] whose `reload_requested` flag sends the caller back to a
//! freshly loaded Idle view.

mod controller;
mod form;
mod reference;

pub use controller::{apply_command, ActionRequest, EntityPage, PageCommand, PageQuery, PageView};
pub use form::FormFields;
pub use reference::{ReferencePage, ReferenceView};

use std::fmt;
use std::str::FromStr;

use crate::records::RecordId;
use crate::storage::StorageError;

/// The three mutually exclusive actions offered on an entity page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageAction {
    #[default]
    Edit,
    Add,
    Remove,
}

impl PageAction {
    pub const ALL: [PageAction; 3] = [PageAction::Edit, PageAction::Add, PageAction::Remove];

    pub fn slug(self) -> &'static str {
        match self {
            PageAction::Edit => "edit",
            PageAction::Add => "add",
            PageAction::Remove => "remove",
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageAction {
    type Err = PageError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        PageAction::ALL
            .into_iter()
            .find(|action| action.slug().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| PageError::InvalidField {
                field: "action",
                value: raw.to_string(),
                reason: "expected edit, add or remove".to_string(),
            })
    }
}

/// Result of a persisted action, consumed by the caller's render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: PageAction,
    pub id: RecordId,
    pub message: String,
    /// The next render must reload the table from storage.
    pub reload_requested: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("identifier {id} is not among the current search results")]
    NotSelectable { id: RecordId },
    #[error("no identifier was selected")]
    MissingSelection,
    #[error("the table already uses the largest possible identifier")]
    IdentifiersExhausted,
    #[error("invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}
