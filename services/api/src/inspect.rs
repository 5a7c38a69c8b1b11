use ats_dashboard::config::AppConfig;
use ats_dashboard::error::AppError;
use ats_dashboard::pages::{EntityPage, PageQuery, ReferencePage};
use ats_dashboard::records::{EditableRecord, Recruiter, Submission};
use ats_dashboard::storage::StorageAccessor;
use clap::{Args, ValueEnum};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum TableName {
    Recruiters,
    Submissions,
    JobRequirements,
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Table to print
    #[arg(value_enum)]
    pub(crate) table: TableName,
    /// Case-insensitive filter applied to the table's search column
    #[arg(long, default_value = "")]
    pub(crate) search: String,
}

/// Rows printed by `inspect`, independent of which table they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableReport {
    pub(crate) title: &'static str,
    pub(crate) missing: bool,
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) total_rows: usize,
}

pub(crate) async fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let storage = Arc::new(StorageAccessor::from_config(&config.storage)?);
    let report = build_report(storage, args.table, &args.search).await?;
    print!("{}", render_report(&report));
    Ok(())
}

pub(crate) async fn build_report(
    storage: Arc<StorageAccessor>,
    table: TableName,
    search: &str,
) -> Result<TableReport, AppError> {
    match table {
        TableName::Recruiters => entity_report::<Recruiter>(storage, "Recruiters", search).await,
        TableName::Submissions => entity_report::<Submission>(storage, "Submissions", search).await,
        TableName::JobRequirements => {
            let view = ReferencePage::job_requirements(storage).view(search).await?;
            Ok(TableReport {
                title: "Job Requirements",
                missing: view.missing,
                headers: view.headers,
                rows: view.results,
                total_rows: view.total_rows,
            })
        }
    }
}

async fn entity_report<R: EditableRecord>(
    storage: Arc<StorageAccessor>,
    title: &'static str,
    search: &str,
) -> Result<TableReport, AppError> {
    let query = PageQuery {
        search: search.to_string(),
        ..PageQuery::default()
    };
    let view = EntityPage::<R>::new(storage).view(&query).await?;

    Ok(TableReport {
        title,
        missing: view.missing,
        headers: view.columns.iter().map(|column| column.to_string()).collect(),
        rows: view.rows_in_column_order(),
        total_rows: view.total_rows,
    })
}

pub(crate) fn render_report(report: &TableReport) -> String {
    let mut output = format!(
        "{} ({} of {} rows)\n",
        report.title,
        report.rows.len(),
        report.total_rows
    );
    if report.missing {
        output.push_str("File not found. Starting with an empty dataset.\n");
    }
    if !report.headers.is_empty() {
        output.push_str(&report.headers.join(" | "));
        output.push('\n');
    }
    for row in &report.rows {
        output.push_str(&row.join(" | "));
        output.push('\n');
    }
    output
}
