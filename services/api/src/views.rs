//! Server-rendered HTML for the dashboard pages.

use ats_dashboard::pages::{PageAction, PageView, ReferenceView};
use ats_dashboard::records::{
    EditableRecord, RecordId, Recruiter, StatusSet, Submission, SubmissionStatus,
};
use axum::http::StatusCode;
use std::fmt::{self, Write};

const MISSING_WARNING: &str = "File not found. Starting with an empty dataset.";

/// Page-level wording and form fields for one editable entity.
pub(crate) trait PageTemplate: EditableRecord {
    const PATH: &'static str;
    const EDIT_PATH: &'static str;
    const ADD_PATH: &'static str;
    const REMOVE_PATH: &'static str;
    const HEADING: &'static str;
    const SEARCH_LABEL: &'static str;

    fn action_label(action: PageAction) -> &'static str;

    fn submit_label(action: PageAction) -> &'static str;

    fn write_edit_fields(html: &mut String, row: &Self) -> fmt::Result;

    fn write_add_fields(html: &mut String) -> fmt::Result;
}

impl PageTemplate for Recruiter {
    const PATH: &'static str = "/recruiters";
    const EDIT_PATH: &'static str = "/recruiters/edit";
    const ADD_PATH: &'static str = "/recruiters/add";
    const REMOVE_PATH: &'static str = "/recruiters/remove";
    const HEADING: &'static str = "Recruiter Details";
    const SEARCH_LABEL: &'static str = "Search by Recruiter ID:";

    fn action_label(action: PageAction) -> &'static str {
        match action {
            PageAction::Edit => "Edit Recruiter Details",
            PageAction::Add => "Add New Recruiter",
            PageAction::Remove => "Remove Recruiter",
        }
    }

    fn submit_label(action: PageAction) -> &'static str {
        match action {
            PageAction::Edit => "Save Changes",
            PageAction::Add => "Add Recruiter",
            PageAction::Remove => "Remove Recruiter",
        }
    }

    fn write_edit_fields(html: &mut String, row: &Self) -> fmt::Result {
        let form = row.edit_form();
        text_input(html, "Name", "name", &form.name)?;
        text_input(html, "Email", "email", &form.email)?;
        text_input(html, "Phone Number", "phone_number", &form.phone_number)?;
        text_input(html, "Location", "location", &form.location)?;
        text_input(html, "Designation", "designation", &form.designation)
    }

    fn write_add_fields(html: &mut String) -> fmt::Result {
        for (label, name) in [
            ("Name", "name"),
            ("Email", "email"),
            ("Phone Number", "phone_number"),
            ("Location", "location"),
            ("Designation", "designation"),
        ] {
            text_input(html, label, name, "")?;
        }
        Ok(())
    }
}

impl PageTemplate for Submission {
    const PATH: &'static str = "/submissions";
    const EDIT_PATH: &'static str = "/submissions/edit";
    const ADD_PATH: &'static str = "/submissions/add";
    const REMOVE_PATH: &'static str = "/submissions/remove";
    const HEADING: &'static str = "Submission Table";
    const SEARCH_LABEL: &'static str = "Search by Client Name:";

    fn action_label(action: PageAction) -> &'static str {
        match action {
            PageAction::Edit => "Edit Notes for a Submission",
            PageAction::Add => "Add a New Submission",
            PageAction::Remove => "Remove Submission",
        }
    }

    fn submit_label(action: PageAction) -> &'static str {
        match action {
            PageAction::Edit => "Save Notes",
            PageAction::Add => "Add Submission",
            PageAction::Remove => "Remove Submission",
        }
    }

    fn write_edit_fields(html: &mut String, row: &Self) -> fmt::Result {
        writeln!(
            html,
            "<p>{} &middot; {} &middot; {}</p>",
            escape_html(&row.client_name),
            escape_html(&row.job_title),
            escape_html(&row.status.labels())
        )?;
        textarea(html, "Notes", "notes", &row.edit_form().notes)
    }

    fn write_add_fields(html: &mut String) -> fmt::Result {
        writeln!(
            html,
            "<label>Date of Submission <input type=\"date\" name=\"date_of_submission\"></label>"
        )?;
        for (label, name) in [
            ("Client Name", "client_name"),
            ("Job Title", "job_title"),
            ("Candidate City", "candidate_city"),
            ("Candidate State", "candidate_state"),
            ("Candidate Country", "candidate_country"),
            ("Visa", "visa"),
            ("Recruiter", "recruiter"),
            ("Pay Rate", "pay_rate"),
        ] {
            text_input(html, label, name, "")?;
        }
        status_select(html, &StatusSet::new())?;
        textarea(html, "Notes", "notes", "")
    }
}

pub(crate) fn render_index() -> Result<String, fmt::Error> {
    document("Recruiting Dashboard", |html| {
        writeln!(html, "<h1>Recruiting Dashboard</h1>")?;
        writeln!(html, "<ul>")?;
        for (path, label) in [
            (Recruiter::PATH, Recruiter::HEADING),
            (Submission::PATH, Submission::HEADING),
            ("/job-requirements", "Job Requirements"),
        ] {
            writeln!(html, "<li><a href=\"{path}\">{label}</a></li>")?;
        }
        writeln!(html, "</ul>")
    })
}

pub(crate) fn render_entity_page<R: PageTemplate>(
    view: &PageView<R>,
    notice: Option<&str>,
) -> Result<String, fmt::Error> {
    document(R::HEADING, |html| {
        writeln!(html, "<h1>{}</h1>", R::HEADING)?;
        if let Some(notice) = notice.filter(|text| !text.is_empty()) {
            writeln!(html, "<p class=\"notice\">{}</p>", escape_html(notice))?;
        }
        if view.missing {
            writeln!(html, "<p class=\"warning\">{MISSING_WARNING}</p>")?;
        }

        writeln!(html, "<form method=\"get\" action=\"{}\">", R::PATH)?;
        hidden(html, "action", view.action.slug())?;
        text_input(html, R::SEARCH_LABEL, "search", &view.search)?;
        writeln!(html, "<button type=\"submit\">Search</button>")?;
        writeln!(html, "</form>")?;

        let open = if view.search.is_empty() { "" } else { " open" };
        writeln!(html, "<details{open}>")?;
        writeln!(
            html,
            "<summary>Showing {} of {} rows</summary>",
            view.results.len(),
            view.total_rows
        )?;
        let headers: Vec<&str> = view.columns.clone();
        data_table(html, &headers, &view.rows_in_column_order())?;
        writeln!(html, "</details>")?;

        writeln!(html, "<form method=\"get\" action=\"{}\">", R::PATH)?;
        hidden(html, "search", &view.search)?;
        for action in PageAction::ALL {
            let checked = if action == view.action { " checked" } else { "" };
            writeln!(
                html,
                "<label><input type=\"radio\" name=\"action\" value=\"{}\"{checked}> {}</label>",
                action.slug(),
                R::action_label(action)
            )?;
        }
        writeln!(html, "<button type=\"submit\">Choose</button>")?;
        writeln!(html, "</form>")?;

        writeln!(html, "<h2>{}</h2>", R::action_label(view.action))?;
        match view.action {
            PageAction::Edit => write_edit_section(html, view),
            PageAction::Add => write_add_section(html, view),
            PageAction::Remove => write_remove_section(html, view),
        }
    })
}

fn write_edit_section<R: PageTemplate>(html: &mut String, view: &PageView<R>) -> fmt::Result {
    let ids = view.selectable_ids();
    let chosen = view.selected.as_ref().map(|row| row.id());

    writeln!(html, "<form method=\"get\" action=\"{}\">", R::PATH)?;
    hidden(html, "action", PageAction::Edit.slug())?;
    hidden(html, "search", &view.search)?;
    id_selector::<R>(html, &ids, chosen)?;
    writeln!(html, "<button type=\"submit\">Load</button>")?;
    writeln!(html, "</form>")?;

    let Some(row) = view.selected.as_ref() else {
        return Ok(());
    };

    action_form_open(html, R::EDIT_PATH, view)?;
    hidden(html, "selected", &row.id().to_string())?;
    R::write_edit_fields(html, row)?;
    writeln!(
        html,
        "<button type=\"submit\">{}</button>",
        R::submit_label(PageAction::Edit)
    )?;
    writeln!(html, "</form>")
}

fn write_add_section<R: PageTemplate>(html: &mut String, view: &PageView<R>) -> fmt::Result {
    action_form_open(html, R::ADD_PATH, view)?;
    R::write_add_fields(html)?;
    writeln!(
        html,
        "<button type=\"submit\">{}</button>",
        R::submit_label(PageAction::Add)
    )?;
    writeln!(html, "</form>")
}

fn write_remove_section<R: PageTemplate>(html: &mut String, view: &PageView<R>) -> fmt::Result {
    action_form_open(html, R::REMOVE_PATH, view)?;
    id_selector::<R>(html, &view.selectable_ids(), None)?;
    writeln!(
        html,
        "<button type=\"submit\">{}</button>",
        R::submit_label(PageAction::Remove)
    )?;
    writeln!(html, "</form>")
}

/// Opens a POST form carrying the search term and table version it was rendered from.
fn action_form_open<R: PageTemplate>(
    html: &mut String,
    path: &str,
    view: &PageView<R>,
) -> fmt::Result {
    writeln!(html, "<form method=\"post\" action=\"{path}\">")?;
    hidden(html, "search", &view.search)?;
    hidden(html, "version", &view.version_token())
}

pub(crate) fn render_reference_page(view: &ReferenceView) -> Result<String, fmt::Error> {
    document("Job Requirements", |html| {
        writeln!(html, "<h1>Job Requirements</h1>")?;
        if view.missing {
            writeln!(html, "<p class=\"warning\">{MISSING_WARNING}</p>")?;
        }
        writeln!(html, "<form method=\"get\" action=\"/job-requirements\">")?;
        text_input(html, "Search job requirements:", "search", &view.search)?;
        writeln!(html, "<button type=\"submit\">Search</button>")?;
        writeln!(html, "</form>")?;
        writeln!(
            html,
            "<p>Showing {} of {} rows</p>",
            view.results.len(),
            view.total_rows
        )?;
        let headers: Vec<&str> = view.headers.iter().map(String::as_str).collect();
        data_table(html, &headers, &view.results)
    })
}

/// Error pages are plain `format!` output so that rendering them cannot fail.
pub(crate) fn render_error_page(status: StatusCode, message: &str, back: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{reason}</title></head>\n<body>\n<h1>{code} {reason}</h1>\n<p class=\"error\">{message}</p>\n<p><a href=\"{back}\">Back</a></p>\n</body>\n</html>\n",
        code = status.as_u16(),
        message = escape_html(message),
        back = escape_html(back),
    )
}

fn document<F>(title: &str, body: F) -> Result<String, fmt::Error>
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>")?;
    writeln!(
        html,
        "<head><meta charset=\"utf-8\"><title>{}</title></head>",
        escape_html(title)
    )?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<nav><a href=\"/\">Home</a> | <a href=\"{}\">Recruiters</a> | <a href=\"{}\">Submissions</a> | <a href=\"/job-requirements\">Job Requirements</a></nav>",
        Recruiter::PATH,
        Submission::PATH
    )?;
    body(&mut html)?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn data_table(html: &mut String, headers: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    writeln!(html, "<table>")?;
    write!(html, "<tr>")?;
    for header in headers {
        write!(html, "<th>{}</th>", escape_html(header))?;
    }
    writeln!(html, "</tr>")?;
    for row in rows {
        write!(html, "<tr>")?;
        for cell in row {
            write!(html, "<td>{}</td>", escape_html(cell))?;
        }
        writeln!(html, "</tr>")?;
    }
    writeln!(html, "</table>")
}

fn id_selector<R: EditableRecord>(
    html: &mut String,
    ids: &[RecordId],
    chosen: Option<RecordId>,
) -> fmt::Result {
    writeln!(html, "<select name=\"selected\">")?;
    let placeholder_selected = if chosen.is_none() { " selected" } else { "" };
    writeln!(
        html,
        "<option value=\"\" disabled{placeholder_selected}>{}</option>",
        R::SELECT_PLACEHOLDER
    )?;
    for id in ids {
        let selected = if chosen == Some(*id) { " selected" } else { "" };
        writeln!(html, "<option value=\"{id}\"{selected}>{id}</option>")?;
    }
    writeln!(html, "</select>")
}

fn status_select(html: &mut String, chosen: &StatusSet) -> fmt::Result {
    writeln!(html, "<label>Status <select name=\"status\" multiple>")?;
    for status in SubmissionStatus::ALL {
        let selected = if chosen.contains(status) { " selected" } else { "" };
        writeln!(
            html,
            "<option value=\"{label}\"{selected}>{label}</option>",
            label = status.label()
        )?;
    }
    writeln!(html, "</select></label>")
}

fn text_input(html: &mut String, label: &str, name: &str, value: &str) -> fmt::Result {
    writeln!(
        html,
        "<label>{} <input type=\"text\" name=\"{name}\" value=\"{}\"></label>",
        escape_html(label),
        escape_html(value)
    )
}

fn textarea(html: &mut String, label: &str, name: &str, value: &str) -> fmt::Result {
    writeln!(
        html,
        "<label>{label} <textarea name=\"{name}\">{}</textarea></label>",
        escape_html(value)
    )
}

fn hidden(html: &mut String, name: &str, value: &str) -> fmt::Result {
    writeln!(
        html,
        "<input type=\"hidden\" name=\"{name}\" value=\"{}\">",
        escape_html(value)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_dashboard::records::{RecruiterForm, Record};
    use ats_dashboard::storage::StorageVersion;

    fn recruiter(id: u64, name: &str) -> Recruiter {
        Recruiter::from_draft(
            RecordId(id),
            RecruiterForm {
                name: name.to_string(),
                ..RecruiterForm::default()
            },
        )
    }

    fn view(action: PageAction, selected: Option<Recruiter>) -> PageView<Recruiter> {
        PageView {
            search: "3".to_string(),
            action,
            columns: Recruiter::COLUMNS.to_vec(),
            results: vec![recruiter(3, "Ada <Ops>")],
            total_rows: 2,
            version: StorageVersion::Absent,
            missing: false,
            selected,
        }
    }

    #[test]
    fn edit_page_prefills_the_selected_row() {
        let html = render_entity_page(&view(PageAction::Edit, Some(recruiter(3, "Ada <Ops>"))), None)
            .expect("renders");

        assert!(html.contains("<details open>"));
        assert!(html.contains("Showing 1 of 2 rows"));
        assert!(html.contains("<option value=\"\" disabled>Select Recruiter ID</option>"));
        assert!(html.contains("<option value=\"3\" selected>3</option>"));
        assert!(html.contains("<form method=\"post\" action=\"/recruiters/edit\">"));
        assert!(html.contains("value=\"Ada &lt;Ops&gt;\""));
        assert!(html.contains("<input type=\"hidden\" name=\"version\" value=\"absent\">"));
    }

    #[test]
    fn remove_page_offers_only_filtered_ids_and_shows_notice() {
        let html = render_entity_page(
            &view(PageAction::Remove, None),
            Some("Recruiter ID 9 removed successfully!"),
        )
        .expect("renders");

        assert!(html.contains("<p class=\"notice\">Recruiter ID 9 removed successfully!</p>"));
        assert!(html.contains("<form method=\"post\" action=\"/recruiters/remove\">"));
        assert!(html.contains("<option value=\"\" disabled selected>Select Recruiter ID</option>"));
        assert!(html.contains("<option value=\"3\">3</option>"));
        assert!(!html.contains("/recruiters/edit\""));
    }

    #[test]
    fn submission_add_form_has_status_multiselect() {
        let view = PageView::<Submission> {
            search: String::new(),
            action: PageAction::Add,
            columns: Submission::COLUMNS.to_vec(),
            results: Vec::new(),
            total_rows: 0,
            version: StorageVersion::Absent,
            missing: true,
            selected: None,
        };
        let html = render_entity_page(&view, None).expect("renders");

        assert!(html.contains(MISSING_WARNING));
        assert!(html.contains("<details>"));
        assert!(html.contains("<select name=\"status\" multiple>"));
        assert!(html.contains("<option value=\"Initial discussion\">Initial discussion</option>"));
        assert!(html.contains("type=\"date\" name=\"date_of_submission\""));
    }

    #[test]
    fn error_page_escapes_the_message() {
        let html = render_error_page(StatusCode::CONFLICT, "table <changed>", "/recruiters");
        assert!(html.contains("<h1>409 Conflict</h1>"));
        assert!(html.contains("table &lt;changed&gt;"));
    }
}
