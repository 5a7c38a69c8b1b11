use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{info, warn};

use super::{ActionOutcome, FormFields, PageAction, PageError};
use crate::records::{EditableRecord, Record, RecordId};
use crate::storage::{StorageAccessor, StorageError, StorageVersion, TableSnapshot};
use crate::table::Table;

/// What the browser asked to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub search: String,
    pub action: PageAction,
    pub selected: Option<RecordId>,
}

/// Everything needed to render one entity page.
#[derive(Debug, Clone)]
pub struct PageView<R> {
    pub search: String,
    pub action: PageAction,
    /// Persisted column order.
    pub columns: Vec<&'static str>,
    /// Rows matching the search term; the only rows the selectors offer.
    pub results: Vec<R>,
    pub total_rows: usize,
    pub version: StorageVersion,
    /// The resource was absent and the table is an empty stand-in.
    pub missing: bool,
    /// Row chosen in the edit selector, when it is among the results.
    pub selected: Option<R>,
}

impl<R: Record> PageView<R> {
    pub fn selectable_ids(&self) -> Vec<RecordId> {
        self.results.iter().map(Record::id).collect()
    }

    pub fn version_token(&self) -> String {
        self.version.token()
    }

    /// Result rows as text cells, in the same order as [`PageView::columns`].
    pub fn rows_in_column_order(&self) -> Vec<Vec<String>> {
        let indices: Vec<usize> = self
            .columns
            .iter()
            .filter_map(|column| R::COLUMNS.iter().position(|declared| declared == column))
            .collect();

        self.results
            .iter()
            .map(|row| {
                let cells = row.cells();
                indices.iter().map(|&index| cells[index].clone()).collect()
            })
            .collect()
    }
}

/// One submitted action, addressed by identifier where it needs one.
pub enum PageCommand<R: EditableRecord> {
    Edit { id: RecordId, changes: R::Changes },
    Add { draft: R::Draft },
    Remove { id: RecordId },
}

impl<R: EditableRecord> fmt::Debug for PageCommand<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageCommand::Edit { id, changes } => f
                .debug_struct("Edit")
                .field("id", id)
                .field("changes", changes)
                .finish(),
            PageCommand::Add { draft } => f.debug_struct("Add").field("draft", draft).finish(),
            PageCommand::Remove { id } => f.debug_struct("Remove").field("id", id).finish(),
        }
    }
}

impl<R: EditableRecord> PageCommand<R> {
    pub fn action(&self) -> PageAction {
        match self {
            PageCommand::Edit { .. } => PageAction::Edit,
            PageCommand::Add { .. } => PageAction::Add,
            PageCommand::Remove { .. } => PageAction::Remove,
        }
    }

    pub fn from_form(action: PageAction, fields: &FormFields) -> Result<Self, PageError> {
        match action {
            PageAction::Edit => Ok(PageCommand::Edit {
                id: fields.record_id("selected")?,
                changes: R::changes_from_form(fields)?,
            }),
            PageAction::Add => Ok(PageCommand::Add {
                draft: R::draft_from_form(fields)?,
            }),
            PageAction::Remove => Ok(PageCommand::Remove {
                id: fields.record_id("selected")?,
            }),
        }
    }
}

/// A command plus the page context it was issued from.
#[derive(Debug)]
pub struct ActionRequest<R: EditableRecord> {
    /// Search term the selector was filtered by.
    pub search: String,
    /// Version token the form was rendered from, if the client sent one.
    pub version_token: Option<String>,
    pub command: PageCommand<R>,
}

impl<R: EditableRecord> ActionRequest<R> {
    pub fn new(command: PageCommand<R>) -> Self {
        Self {
            search: String::new(),
            version_token: None,
            command,
        }
    }

    pub fn from_form(action: PageAction, fields: &FormFields) -> Result<Self, PageError> {
        Ok(Self {
            search: fields.text("search"),
            version_token: fields.get("version").map(str::to_string),
            command: PageCommand::from_form(action, fields)?,
        })
    }
}

/// Controller for one editable entity.
pub struct EntityPage<R> {
    storage: Arc<StorageAccessor>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for EntityPage<R> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: EditableRecord> EntityPage<R> {
    pub fn new(storage: Arc<StorageAccessor>) -> Self {
        Self {
            storage,
            _record: PhantomData,
        }
    }

    /// Load the table and build the view for one render.
    pub async fn view(&self, query: &PageQuery) -> Result<PageView<R>, PageError> {
        let TableSnapshot { table, version } = self.storage.load::<R>().await?;
        let missing = version.is_absent();

        let results: Vec<R> = table.search(&query.search).into_iter().cloned().collect();
        let selected = match (query.action, query.selected) {
            (PageAction::Edit, Some(id)) => results.iter().find(|row| row.id() == id).cloned(),
            _ => None,
        };

        Ok(PageView {
            search: query.search.clone(),
            action: query.action,
            columns: table.columns(),
            total_rows: table.len(),
            results,
            version,
            missing,
            selected,
        })
    }

    /// Apply one action against freshly loaded data and persist the whole table.
    pub async fn submit(&self, request: ActionRequest<R>) -> Result<ActionOutcome, PageError> {
        let ActionRequest {
            search,
            version_token,
            command,
        } = request;

        let TableSnapshot { mut table, version } = self.storage.load::<R>().await?;

        if self.storage.conflict_check() {
            if let Some(token) = version_token {
                if token != version.token() {
                    warn!(entity = R::ENTITY, "form was rendered from an older table");
                    return Err(StorageError::Conflict {
                        resource: R::RESOURCE.to_string(),
                    }
                    .into());
                }
            }
        }

        let outcome = apply_command(&mut table, &search, command)?;
        self.storage.save(&table, &version).await?;

        info!(
            entity = R::ENTITY,
            action = %outcome.action,
            id = %outcome.id,
            rows = table.len(),
            "table persisted"
        );
        Ok(outcome)
    }
}

/// Apply a command to an in-memory table.
///
/// Edit and Remove only accept identifiers present in the rows matching `search`.
pub fn apply_command<R: EditableRecord>(
    table: &mut Table<R>,
    search: &str,
    command: PageCommand<R>,
) -> Result<ActionOutcome, PageError> {
    let action = command.action();
    let (id, message) = match command {
        PageCommand::Edit { id, changes } => {
            ensure_selectable(table, search, id)?;
            table.update(id, |row| row.apply_changes(changes));
            (id, R::updated_message(id))
        }
        PageCommand::Add { draft } => {
            let id = table
                .insert_with(|id| R::from_draft(id, draft))
                .ok_or(PageError::IdentifiersExhausted)?;
            (id, R::added_message(id))
        }
        PageCommand::Remove { id } => {
            ensure_selectable(table, search, id)?;
            table.remove(id);
            (id, R::removed_message(id))
        }
    };

    Ok(ActionOutcome {
        action,
        id,
        message,
        reload_requested: true,
    })
}

fn ensure_selectable<R: Record>(
    table: &Table<R>,
    search: &str,
    id: RecordId,
) -> Result<(), PageError> {
    if table.search(search).iter().any(|row| row.id() == id) {
        Ok(())
    } else {
        Err(PageError::NotSelectable { id })
    }
}
