//! In-memory table store used for the length of one request.

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::records::{Record, RecordId};
use crate::storage::SchemaError;

/// Persisted column order of a table, as indices into [`Record::COLUMNS`].
///
/// Tables remember the order their header was loaded in so that rewrites keep it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout<R> {
    order: Vec<usize>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> ColumnLayout<R> {
    /// Canonical order, used for tables that were never persisted.
    pub fn declared() -> Self {
        Self {
            order: (0..R::COLUMNS.len()).collect(),
            _record: PhantomData,
        }
    }

    /// Validate a loaded header: it must hold exactly the declared columns, in any order.
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut order = Vec::with_capacity(R::COLUMNS.len());
        for header in headers {
            let index = R::COLUMNS
                .iter()
                .position(|column| *column == header)
                .ok_or_else(|| SchemaError::UnknownColumn {
                    column: header.to_string(),
                })?;
            if order.contains(&index) {
                return Err(SchemaError::DuplicateColumn {
                    column: header.to_string(),
                });
            }
            order.push(index);
        }

        if let Some(missing) = (0..R::COLUMNS.len()).find(|index| !order.contains(index)) {
            return Err(SchemaError::MissingColumn {
                column: R::COLUMNS[missing].to_string(),
            });
        }

        Ok(Self {
            order,
            _record: PhantomData,
        })
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.order.iter().map(|&index| R::COLUMNS[index]).collect()
    }

    /// Reorder a row's cells from declared order into persisted order.
    pub fn arrange(&self, cells: &[String]) -> Vec<String> {
        self.order.iter().map(|&index| cells[index].clone()).collect()
    }
}

/// Mutable rows of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<R: Record> {
    layout: ColumnLayout<R>,
    rows: Vec<R>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: Record> Table<R> {
    pub fn empty() -> Self {
        Self {
            layout: ColumnLayout::declared(),
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, rejecting duplicated identifiers.
    pub fn from_rows(layout: ColumnLayout<R>, rows: Vec<R>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.id()) {
                return Err(SchemaError::DuplicateId { id: row.id() });
            }
        }

        Ok(Self { layout, rows })
    }

    pub fn layout(&self) -> &ColumnLayout<R> {
        &self.layout
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.layout.columns()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Case-insensitive substring match on the search column; a blank term matches all rows.
    pub fn search(&self, term: &str) -> Vec<&R> {
        if term.is_empty() {
            return self.rows.iter().collect();
        }

        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.search_key().to_lowercase().contains(&needle))
            .collect()
    }

    /// `max(existing) + 1`, or `1` for an empty table; `None` when the maximum is `u64::MAX`.
    pub fn next_id(&self) -> Option<RecordId> {
        match self.rows.iter().map(Record::id).max() {
            Some(max) => max.next(),
            None => Some(RecordId(1)),
        }
    }

    /// Append a row built around the next identifier and return that identifier.
    ///
    /// Leaves the table untouched and returns `None` when no identifier is left.
    pub fn insert_with<F>(&mut self, build: F) -> Option<RecordId>
    where
        F: FnOnce(RecordId) -> R,
    {
        let id = self.next_id()?;
        self.rows.push(build(id));
        Some(id)
    }

    /// Mutate the row with `id` in place; returns `false` when no such row exists.
    pub fn update<F>(&mut self, id: RecordId, apply: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        match self.rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                apply(row);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<R> {
        let position = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(position))
    }
}

/// Read-only table of string cells for data without a declared column set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where any cell contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&[String]> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || row
                        .iter()
                        .any(|cell| cell.to_lowercase().contains(&needle))
            })
            .map(Vec::as_slice)
            .collect()
    }
}
