use chrono::NaiveDate;

use super::PageError;
use crate::records::submission::parse_submission_date;
use crate::records::RecordId;

/// Decoded `application/x-www-form-urlencoded` pairs, in submission order.
///
/// Kept as pairs so that multi-select fields can repeat a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `name`, or an empty string when absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value submitted under `name`.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// A selected identifier; the selector placeholder and blanks count as no selection.
    pub fn record_id(&self, name: &'static str) -> Result<RecordId, PageError> {
        let raw = self
            .get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(PageError::MissingSelection)?;

        raw.parse().map_err(|_| PageError::InvalidField {
            field: name,
            value: raw.to_string(),
            reason: "expected a numeric identifier".to_string(),
        })
    }

    pub fn optional_date(&self, name: &'static str) -> Result<Option<NaiveDate>, PageError> {
        let raw = self.text(name);
        parse_submission_date(&raw).map_err(|reason| PageError::InvalidField {
            field: name,
            value: raw,
            reason,
        })
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn reads_first_and_repeated_values() {
        let form = fields(&[("status", "Interview"), ("status", "Selected"), ("name", "Ada")]);
        assert_eq!(form.text("name"), "Ada");
        assert_eq!(form.text("missing"), "");
        assert_eq!(form.values("status"), vec!["Interview", "Selected"]);
    }

    #[test]
    fn selection_requires_a_numeric_identifier() {
        assert_eq!(
            fields(&[("selected", "8")]).record_id("selected").expect("parses"),
            RecordId(8)
        );
        assert!(matches!(
            fields(&[("selected", "")]).record_id("selected"),
            Err(PageError::MissingSelection)
        ));
        assert!(matches!(
            fields(&[("selected", "Select Recruiter ID")]).record_id("selected"),
            Err(PageError::InvalidField { field: "selected", .. })
        ));
    }
}
