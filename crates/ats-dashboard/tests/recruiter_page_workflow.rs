//! End-to-end scenarios for the recruiter and submission pages, driven through the public
//! controller and storage accessor against an in-memory object store.

use std::sync::Arc;

use ats_dashboard::pages::{
    ActionRequest, EntityPage, FormFields, PageAction, PageCommand, PageError, PageQuery,
};
use ats_dashboard::records::{
    EditableRecord, Record, RecordId, Recruiter, RecruiterForm, Submission, SubmissionStatus,
};
use ats_dashboard::storage::{StorageAccessor, StorageError};
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};

const ROSTER: &str = "\
Recruiter_Id,Name,Email,Phone_Number,Location,Designation
2,Ada Park,ada@example.com,555-010-0001,Dallas,Recruiter
7,Sam Lee,sam@example.com,,Remote,Lead Recruiter
5,Kim Cho,kim@example.com,555-010-0005,Austin,Sourcer
";

async fn seeded(resource: &str, csv: &str) -> (Arc<InMemory>, Arc<StorageAccessor>) {
    let store = Arc::new(InMemory::new());
    store
        .put(&Path::from(resource), PutPayload::from(csv.as_bytes().to_vec()))
        .await
        .expect("seed object");
    let storage = Arc::new(StorageAccessor::new(store.clone()));
    (store, storage)
}

async fn stored_text(store: &InMemory, resource: &str) -> String {
    let bytes = store
        .get(&Path::from(resource))
        .await
        .expect("object exists")
        .bytes()
        .await
        .expect("read object");
    String::from_utf8(bytes.to_vec()).expect("utf8 csv")
}

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    FormFields::new(
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn adding_jane_doe_after_id_seven_assigns_eight() {
    let (store, storage) = seeded(Recruiter::RESOURCE, ROSTER).await;
    let page = EntityPage::<Recruiter>::new(storage);

    let request = ActionRequest::<Recruiter>::from_form(
        PageAction::Add,
        &fields(&[
            ("name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("phone_number", "5551234567"),
            ("location", "Chicago"),
            ("designation", "Recruiter"),
        ]),
    )
    .expect("form parses");
    let outcome = page.submit(request).await.expect("add persists");

    assert_eq!(outcome.id, RecordId(8));
    assert!(outcome.reload_requested);

    let text = stored_text(&store, Recruiter::RESOURCE).await;
    assert!(text.starts_with(ROSTER), "existing rows are rewritten unchanged");
    assert!(text.ends_with("8,Jane Doe,jane@example.com,555-123-4567,Chicago,Recruiter\n"));
}

#[tokio::test]
async fn missing_resource_shows_empty_declared_table() {
    let storage = Arc::new(StorageAccessor::in_memory());
    let page = EntityPage::<Recruiter>::new(storage);

    let view = page.view(&PageQuery::default()).await.expect("view renders");

    assert!(view.missing);
    assert!(view.results.is_empty());
    assert_eq!(view.columns, Recruiter::COLUMNS.to_vec());
}

#[tokio::test]
async fn edit_round_trip_leaves_other_rows_byte_identical() {
    let (store, storage) = seeded(Recruiter::RESOURCE, ROSTER).await;
    let page = EntityPage::<Recruiter>::new(storage);

    let view = page
        .view(&PageQuery {
            search: "7".to_string(),
            action: PageAction::Edit,
            selected: Some(RecordId(7)),
        })
        .await
        .expect("view");
    let mut changes = view.selected.as_ref().expect("row 7 selected").edit_form();
    changes.phone_number = "5559876543".to_string();

    page.submit(ActionRequest {
        search: view.search.clone(),
        version_token: Some(view.version_token()),
        command: PageCommand::Edit {
            id: RecordId(7),
            changes,
        },
    })
    .await
    .expect("edit persists");

    let text = stored_text(&store, Recruiter::RESOURCE).await;
    let lines: Vec<&str> = text.lines().collect();
    let original: Vec<&str> = ROSTER.lines().collect();
    assert_eq!(lines.len(), original.len());
    assert_eq!(lines[0], original[0]);
    assert_eq!(lines[1], original[1]);
    assert_eq!(
        lines[2],
        "7,Sam Lee,sam@example.com,555-987-6543,Remote,Lead Recruiter"
    );
    assert_eq!(lines[3], original[3]);
}

#[tokio::test]
async fn remove_deletes_only_the_selected_identifier() {
    let (_store, storage) = seeded(Recruiter::RESOURCE, ROSTER).await;
    let page = EntityPage::<Recruiter>::new(storage.clone());

    let outcome = page
        .submit(ActionRequest::new(PageCommand::Remove { id: RecordId(5) }))
        .await
        .expect("remove persists");
    assert_eq!(outcome.message, "Recruiter ID 5 removed successfully!");

    let snapshot = storage.load::<Recruiter>().await.expect("reload");
    assert_eq!(snapshot.table.len(), 2);
    assert!(!snapshot.table.contains(RecordId(5)));

    let err = page
        .submit(ActionRequest::new(PageCommand::Remove { id: RecordId(5) }))
        .await
        .expect_err("already removed");
    assert!(matches!(err, PageError::NotSelectable { id: RecordId(5) }));
}

#[tokio::test]
async fn concurrent_adds_do_not_clobber_each_other() {
    let (_store, storage) = seeded(Recruiter::RESOURCE, ROSTER).await;
    let page = EntityPage::<Recruiter>::new(storage.clone());

    let first_session = page.view(&PageQuery::default()).await.expect("first view");
    let second_session = page.view(&PageQuery::default()).await.expect("second view");

    let add = |token: String, name: &str| ActionRequest::<Recruiter> {
        search: String::new(),
        version_token: Some(token),
        command: PageCommand::Add {
            draft: RecruiterForm {
                name: name.to_string(),
                ..RecruiterForm::default()
            },
        },
    };

    page.submit(add(first_session.version_token(), "First"))
        .await
        .expect("first add wins");
    let err = page
        .submit(add(second_session.version_token(), "Second"))
        .await
        .expect_err("second add conflicts");
    assert!(matches!(
        err,
        PageError::Storage(StorageError::Conflict { .. })
    ));

    let snapshot = storage.load::<Recruiter>().await.expect("reload");
    assert_eq!(snapshot.table.len(), 4);
    assert_eq!(
        snapshot.table.get(RecordId(8)).map(|row| row.name.as_str()),
        Some("First")
    );
}

#[tokio::test]
async fn submissions_search_by_client_and_edit_notes() {
    let csv = "\
Job_Id,Date_of_Submission,Client_Name,Job_Title,Candidate_City,Candidate_State,Candidate_Country,Visa,Recruiter,Pay_Rate,Status,Notes
1,2024-04-02,Globex,Rust Engineer,Austin,TX,USA,GC,Ada Park,$70/hr,['Submitted'],
2,2024-04-03,Initech,Analyst,Dallas,TX,USA,H1B,Sam Lee,$55/hr,\"['Initial discussion', 'Interview']\",first call done
";
    let (_store, storage) = seeded(Submission::RESOURCE, csv).await;
    let page = EntityPage::<Submission>::new(storage.clone());

    let view = page
        .view(&PageQuery {
            search: "INIT".to_string(),
            ..PageQuery::default()
        })
        .await
        .expect("view");
    assert_eq!(view.selectable_ids(), vec![RecordId(2)]);

    let request = ActionRequest::<Submission>::from_form(
        PageAction::Edit,
        &fields(&[
            ("search", "INIT"),
            ("selected", "2"),
            ("notes", "interview booked"),
        ]),
    )
    .expect("form parses");
    let outcome = page.submit(request).await.expect("notes saved");
    assert_eq!(outcome.message, "Notes updated for Job ID 2!");

    let snapshot = storage.load::<Submission>().await.expect("reload");
    let edited = snapshot.table.get(RecordId(2)).expect("row 2");
    assert_eq!(edited.notes, "interview booked");
    assert!(edited.status.contains(SubmissionStatus::Interview));
    assert_eq!(snapshot.table.get(RecordId(1)).expect("row 1").notes, "");
}

#[tokio::test]
async fn add_after_the_largest_identifier_is_rejected_without_writing() {
    let csv = "\
Recruiter_Id,Name,Email,Phone_Number,Location,Designation
18446744073709551615,Max,,,,
";
    let (store, storage) = seeded(Recruiter::RESOURCE, csv).await;
    let page = EntityPage::<Recruiter>::new(storage);

    let err = page
        .submit(ActionRequest::new(PageCommand::Add {
            draft: RecruiterForm {
                name: "Overflow".to_string(),
                ..RecruiterForm::default()
            },
        }))
        .await
        .expect_err("no identifier left");
    assert!(matches!(err, PageError::IdentifiersExhausted));

    assert_eq!(stored_text(&store, Recruiter::RESOURCE).await, csv);
}
