use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Pipeline stages a submission can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubmissionStatus {
    InitialDiscussion,
    Interview,
    Submitted,
    Selected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::InitialDiscussion,
        SubmissionStatus::Interview,
        SubmissionStatus::Submitted,
        SubmissionStatus::Selected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::InitialDiscussion => "Initial discussion",
            SubmissionStatus::Interview => "Interview",
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::Selected => "Selected",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission status '{label}'")]
pub struct StatusParseError {
    pub label: String,
}

/// The multi-valued `Status` cell.
///
/// Persisted as a bracketed list of quoted labels (`['Interview', 'Submitted']`, `[]` when
/// empty). Parsing also accepts a bare `;` or `,` separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSet(BTreeSet<SubmissionStatus>);

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, status: SubmissionStatus) -> bool {
        self.0.insert(status)
    }

    pub fn contains(&self, status: SubmissionStatus) -> bool {
        self.0.contains(&status)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = SubmissionStatus> + '_ {
        self.0.iter().copied()
    }

    /// Human readable form for tables: `Interview, Submitted`.
    pub fn labels(&self) -> String {
        self.iter()
            .map(SubmissionStatus::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<SubmissionStatus> for StatusSet {
    fn from_iter<I: IntoIterator<Item = SubmissionStatus>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, status) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", status.label())?;
        }
        f.write_str("]")
    }
}

impl FromStr for StatusSet {
    type Err = StatusParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        inner
            .split([',', ';'])
            .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
            .filter(|part| !part.is_empty())
            .map(|part| {
                SubmissionStatus::from_label(part).ok_or_else(|| StatusParseError {
                    label: part.to_string(),
                })
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for StatusSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracketed_list_encoding() {
        let set: StatusSet = "['Submitted', 'Initial discussion']".parse().expect("parses");
        assert_eq!(set.len(), 2);
        assert!(set.contains(SubmissionStatus::InitialDiscussion));
        assert!(set.contains(SubmissionStatus::Submitted));
        assert_eq!(set.to_string(), "['Initial discussion', 'Submitted']");
    }

    #[test]
    fn parses_plain_lists_and_blank_cells() {
        let set: StatusSet = "interview; selected".parse().expect("parses");
        assert_eq!(set.labels(), "Interview, Selected");

        assert!("".parse::<StatusSet>().expect("blank").is_empty());
        assert!("[]".parse::<StatusSet>().expect("empty list").is_empty());
        assert_eq!(StatusSet::new().to_string(), "[]");
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = "['Hired']".parse::<StatusSet>().expect_err("unknown label");
        assert_eq!(err.label, "Hired");
    }
}
