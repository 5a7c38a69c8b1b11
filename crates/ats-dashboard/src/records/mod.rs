//! Typed row records for the dashboard tables.

pub mod job_requirement;
pub mod phone;
pub mod recruiter;
pub mod status;
pub mod submission;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::pages::{FormFields, PageError};

pub use job_requirement::JOB_REQUIREMENTS_RESOURCE;
pub use phone::format_phone_number;
pub use recruiter::{Recruiter, RecruiterForm};
pub use status::{StatusParseError, StatusSet, SubmissionStatus};
pub use submission::{Submission, SubmissionDraft, SubmissionNotes};

/// Numeric row identifier shared by every mutable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The following identifier, or `None` once `u64::MAX` is taken.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid row identifier")]
pub struct RecordIdParseError {
    pub value: String,
}

impl FromStr for RecordId {
    type Err = RecordIdParseError;

    /// Accepts plain integers and integral float spellings such as `8.0`, which dataframe
    /// exports leave behind.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || RecordIdParseError {
            value: raw.to_string(),
        };

        if let Ok(value) = trimmed.parse::<u64>() {
            return Ok(Self(value));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
                if value >= u64::MAX as f64 {
                    Err(invalid())
                } else {
                    Ok(Self(value as u64))
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A row type persisted as one CSV object.
pub trait Record: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Short entity name used in logs.
    const ENTITY: &'static str;
    /// Object name under the storage root.
    const RESOURCE: &'static str;
    /// Declared column set, in canonical order.
    const COLUMNS: &'static [&'static str];
    /// Column searched by the page's search box.
    const SEARCH_COLUMN: &'static str;

    fn id(&self) -> RecordId;

    /// Text matched by the search box.
    fn search_key(&self) -> Cow<'_, str>;

    /// Cell values in [`Record::COLUMNS`] order.
    fn cells(&self) -> Vec<String>;
}

/// Records that the page controller can add, edit and remove.
pub trait EditableRecord: Record {
    /// Values collected by the blank "add" form.
    type Draft: fmt::Debug + Send;
    /// Values collected by the "edit" form.
    type Changes: fmt::Debug + Send;

    /// Placeholder shown first in the identifier selector; never selectable.
    const SELECT_PLACEHOLDER: &'static str;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    /// Current values used to pre-fill the edit form.
    fn edit_form(&self) -> Self::Changes;

    /// Overwrite the editable columns in place; the identifier never changes.
    fn apply_changes(&mut self, changes: Self::Changes);

    fn draft_from_form(fields: &FormFields) -> Result<Self::Draft, PageError>;

    fn changes_from_form(fields: &FormFields) -> Result<Self::Changes, PageError>;

    fn updated_message(id: RecordId) -> String;

    fn added_message(id: RecordId) -> String;

    fn removed_message(id: RecordId) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_integral_float_spellings() {
        assert_eq!("8".parse::<RecordId>(), Ok(RecordId(8)));
        assert_eq!(" 12.0 ".parse::<RecordId>(), Ok(RecordId(12)));
        assert!("8.5".parse::<RecordId>().is_err());
        assert!("-1".parse::<RecordId>().is_err());
        assert!("".parse::<RecordId>().is_err());
        assert!("abc".parse::<RecordId>().is_err());
    }

    #[test]
    fn record_id_rejects_out_of_range_values() {
        assert_eq!(
            "18446744073709551615".parse::<RecordId>(),
            Ok(RecordId(u64::MAX))
        );
        assert!("18446744073709551616".parse::<RecordId>().is_err());
        assert!("18446744073709551616.0".parse::<RecordId>().is_err());
        assert_eq!(RecordId(u64::MAX).next(), None);
    }

    #[test]
    fn record_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&RecordId(42)).expect("serializes");
        assert_eq!(json, "42");
        assert_eq!(RecordId(7).next(), Some(RecordId(8)));
    }
}
