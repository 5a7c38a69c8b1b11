use std::borrow::Cow;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::status::{StatusSet, SubmissionStatus};
use super::{EditableRecord, Record, RecordId};
use crate::pages::{FormFields, PageError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the submission log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Submission {
    #[serde(rename = "Job_Id")]
    pub job_id: RecordId,
    #[serde(
        rename = "Date_of_Submission",
        default,
        deserialize_with = "deserialize_optional_date"
    )]
    pub date_of_submission: Option<NaiveDate>,
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "Job_Title")]
    pub job_title: String,
    #[serde(rename = "Candidate_City")]
    pub candidate_city: String,
    #[serde(rename = "Candidate_State")]
    pub candidate_state: String,
    #[serde(rename = "Candidate_Country")]
    pub candidate_country: String,
    #[serde(rename = "Visa")]
    pub visa: String,
    #[serde(rename = "Recruiter")]
    pub recruiter: String,
    #[serde(rename = "Pay_Rate")]
    pub pay_rate: String,
    #[serde(rename = "Status")]
    pub status: StatusSet,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Values collected by the blank "add submission" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    /// Defaults to today when left blank.
    pub date_of_submission: Option<NaiveDate>,
    pub client_name: String,
    pub job_title: String,
    pub candidate_city: String,
    pub candidate_state: String,
    pub candidate_country: String,
    pub visa: String,
    pub recruiter: String,
    pub pay_rate: String,
    pub status: StatusSet,
    pub notes: String,
}

/// Submissions only have their notes edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionNotes {
    pub notes: String,
}

impl Record for Submission {
    const ENTITY: &'static str = "submission";
    const RESOURCE: &'static str = "submission_table.csv";
    const COLUMNS: &'static [&'static str] = &[
        "Job_Id",
        "Date_of_Submission",
        "Client_Name",
        "Job_Title",
        "Candidate_City",
        "Candidate_State",
        "Candidate_Country",
        "Visa",
        "Recruiter",
        "Pay_Rate",
        "Status",
        "Notes",
    ];
    const SEARCH_COLUMN: &'static str = "Client_Name";

    fn id(&self) -> RecordId {
        self.job_id
    }

    fn search_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.client_name)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.job_id.to_string(),
            self.date_of_submission
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            self.client_name.clone(),
            self.job_title.clone(),
            self.candidate_city.clone(),
            self.candidate_state.clone(),
            self.candidate_country.clone(),
            self.visa.clone(),
            self.recruiter.clone(),
            self.pay_rate.clone(),
            self.status.to_string(),
            self.notes.clone(),
        ]
    }
}

impl EditableRecord for Submission {
    type Draft = SubmissionDraft;
    type Changes = SubmissionNotes;

    const SELECT_PLACEHOLDER: &'static str = "Select Job ID";

    fn from_draft(id: RecordId, draft: SubmissionDraft) -> Self {
        Self {
            job_id: id,
            date_of_submission: Some(
                draft
                    .date_of_submission
                    .unwrap_or_else(|| Local::now().date_naive()),
            ),
            client_name: draft.client_name,
            job_title: draft.job_title,
            candidate_city: draft.candidate_city,
            candidate_state: draft.candidate_state,
            candidate_country: draft.candidate_country,
            visa: draft.visa,
            recruiter: draft.recruiter,
            pay_rate: draft.pay_rate,
            status: draft.status,
            notes: draft.notes,
        }
    }

    fn edit_form(&self) -> SubmissionNotes {
        SubmissionNotes {
            notes: self.notes.clone(),
        }
    }

    fn apply_changes(&mut self, changes: SubmissionNotes) {
        self.notes = changes.notes;
    }

    fn draft_from_form(fields: &FormFields) -> Result<SubmissionDraft, PageError> {
        let status = fields
            .values("status")
            .into_iter()
            .filter(|label| !label.trim().is_empty())
            .map(|label| {
                SubmissionStatus::from_label(label).ok_or_else(|| PageError::InvalidField {
                    field: "status",
                    value: label.to_string(),
                    reason: "not a known submission status".to_string(),
                })
            })
            .collect::<Result<StatusSet, PageError>>()?;

        Ok(SubmissionDraft {
            date_of_submission: fields.optional_date("date_of_submission")?,
            client_name: fields.text("client_name"),
            job_title: fields.text("job_title"),
            candidate_city: fields.text("candidate_city"),
            candidate_state: fields.text("candidate_state"),
            candidate_country: fields.text("candidate_country"),
            visa: fields.text("visa"),
            recruiter: fields.text("recruiter"),
            pay_rate: fields.text("pay_rate"),
            status,
            notes: fields.text("notes"),
        })
    }

    fn changes_from_form(fields: &FormFields) -> Result<SubmissionNotes, PageError> {
        Ok(SubmissionNotes {
            notes: fields.text("notes"),
        })
    }

    fn updated_message(id: RecordId) -> String {
        format!("Notes updated for Job ID {id}!")
    }

    fn added_message(_id: RecordId) -> String {
        "New submission added successfully!".to_string()
    }

    fn removed_message(id: RecordId) -> String {
        format!("Submission with Job ID {id} removed successfully!")
    }
}

/// Parse a submission date cell or form value; blank means "no date".
pub fn parse_submission_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map(Some)
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(value) => parse_submission_date(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn draft_collects_repeated_status_values() {
        let form = fields(&[
            ("date_of_submission", "2024-05-01"),
            ("client_name", "Globex"),
            ("status", "Interview"),
            ("status", "Initial discussion"),
            ("notes", "strong Rust background"),
        ]);

        let draft = Submission::draft_from_form(&form).expect("draft parses");
        assert_eq!(
            draft.date_of_submission,
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(draft.status.labels(), "Initial discussion, Interview");
        assert_eq!(draft.visa, "");
    }

    #[test]
    fn draft_rejects_unknown_status_and_bad_dates() {
        let bad_status = fields(&[("status", "Hired")]);
        assert!(matches!(
            Submission::draft_from_form(&bad_status),
            Err(PageError::InvalidField { field: "status", .. })
        ));

        let bad_date = fields(&[("date_of_submission", "yesterday")]);
        assert!(matches!(
            Submission::draft_from_form(&bad_date),
            Err(PageError::InvalidField {
                field: "date_of_submission",
                ..
            })
        ));
    }

    #[test]
    fn blank_date_defaults_to_today_and_cells_follow_columns() {
        let submission = Submission::from_draft(RecordId(4), SubmissionDraft::default());
        assert_eq!(submission.date_of_submission, Some(Local::now().date_naive()));

        let cells = submission.cells();
        assert_eq!(cells.len(), Submission::COLUMNS.len());
        assert_eq!(cells[0], "4");
        assert_eq!(cells[10], "[]");
    }

    #[test]
    fn editing_only_touches_notes() {
        let mut submission = Submission::from_draft(
            RecordId(2),
            SubmissionDraft {
                client_name: "Initech".to_string(),
                notes: "first call".to_string(),
                ..SubmissionDraft::default()
            },
        );
        let before = submission.clone();

        submission.apply_changes(SubmissionNotes {
            notes: "offer extended".to_string(),
        });

        assert_eq!(submission.notes, "offer extended");
        assert_eq!(submission.client_name, before.client_name);
        assert_eq!(submission.job_id, before.job_id);
    }

    #[test]
    fn parses_both_date_spellings() {
        assert_eq!(
            parse_submission_date("03/15/2024").expect("us date"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_submission_date("  ").expect("blank"), None);
        assert!(parse_submission_date("2024-13-01").is_err());
    }
}
