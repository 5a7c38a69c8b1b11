use std::borrow::Cow;

use serde::Deserialize;

use super::phone::format_phone_number;
use super::{EditableRecord, Record, RecordId};
use crate::pages::{FormFields, PageError};

/// One row of the recruiter roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Recruiter {
    #[serde(rename = "Recruiter_Id")]
    pub recruiter_id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone_Number")]
    pub phone_number: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Designation")]
    pub designation: String,
}

/// Values collected by both the add and the edit recruiter forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecruiterForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub location: String,
    pub designation: String,
}

impl RecruiterForm {
    fn from_fields(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            email: fields.text("email"),
            phone_number: fields.text("phone_number"),
            location: fields.text("location"),
            designation: fields.text("designation"),
        }
    }
}

impl Record for Recruiter {
    const ENTITY: &'static str = "recruiter";
    const RESOURCE: &'static str = "recruiter_detail.csv";
    const COLUMNS: &'static [&'static str] = &[
        "Recruiter_Id",
        "Name",
        "Email",
        "Phone_Number",
        "Location",
        "Designation",
    ];
    const SEARCH_COLUMN: &'static str = "Recruiter_Id";

    fn id(&self) -> RecordId {
        self.recruiter_id
    }

    fn search_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.recruiter_id.to_string())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.recruiter_id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone_number.clone(),
            self.location.clone(),
            self.designation.clone(),
        ]
    }
}

impl EditableRecord for Recruiter {
    type Draft = RecruiterForm;
    type Changes = RecruiterForm;

    const SELECT_PLACEHOLDER: &'static str = "Select Recruiter ID";

    fn from_draft(id: RecordId, draft: RecruiterForm) -> Self {
        Self {
            recruiter_id: id,
            name: draft.name,
            email: draft.email,
            phone_number: format_phone_number(&draft.phone_number),
            location: draft.location,
            designation: draft.designation,
        }
    }

    fn edit_form(&self) -> RecruiterForm {
        RecruiterForm {
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            location: self.location.clone(),
            designation: self.designation.clone(),
        }
    }

    fn apply_changes(&mut self, changes: RecruiterForm) {
        self.name = changes.name;
        self.email = changes.email;
        self.phone_number = format_phone_number(&changes.phone_number);
        self.location = changes.location;
        self.designation = changes.designation;
    }

    fn draft_from_form(fields: &FormFields) -> Result<RecruiterForm, PageError> {
        Ok(RecruiterForm::from_fields(fields))
    }

    fn changes_from_form(fields: &FormFields) -> Result<RecruiterForm, PageError> {
        Ok(RecruiterForm::from_fields(fields))
    }

    fn updated_message(id: RecordId) -> String {
        format!("Details updated for Recruiter ID {id}!")
    }

    fn added_message(_id: RecordId) -> String {
        "New recruiter added successfully!".to_string()
    }

    fn removed_message(id: RecordId) -> String {
        format!("Recruiter ID {id} removed successfully!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(phone_number: &str) -> RecruiterForm {
        RecruiterForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: phone_number.to_string(),
            location: "Austin".to_string(),
            designation: "Senior Recruiter".to_string(),
        }
    }

    #[test]
    fn drafts_normalize_ten_digit_phone_numbers() {
        let recruiter = Recruiter::from_draft(RecordId(8), form("5551234567"));
        assert_eq!(recruiter.recruiter_id, RecordId(8));
        assert_eq!(recruiter.phone_number, "555-123-4567");
        assert_eq!(recruiter.cells()[3], "555-123-4567");
    }

    #[test]
    fn changes_keep_identifier_and_pass_through_loose_phone_numbers() {
        let mut recruiter = Recruiter::from_draft(RecordId(3), form(""));
        let mut changes = recruiter.edit_form();
        changes.phone_number = "ext. 42".to_string();
        changes.designation = "Lead".to_string();

        recruiter.apply_changes(changes);

        assert_eq!(recruiter.recruiter_id, RecordId(3));
        assert_eq!(recruiter.phone_number, "ext. 42");
        assert_eq!(recruiter.designation, "Lead");
    }

    #[test]
    fn search_key_is_the_identifier_text() {
        let recruiter = Recruiter::from_draft(RecordId(12), form(""));
        assert_eq!(recruiter.search_key(), "12");
        assert_eq!(Recruiter::COLUMNS.len(), recruiter.cells().len());
    }
}
