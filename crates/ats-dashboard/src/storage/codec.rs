use crate::records::{Record, RecordId};
use crate::table::{ColumnLayout, ReferenceTable, Table};

/// Problems with the shape or content of a stored CSV object.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },
    #[error("missing column '{column}'")]
    MissingColumn { column: String },
    #[error("column '{column}' appears more than once")]
    DuplicateColumn { column: String },
    #[error("identifier {id} appears more than once")]
    DuplicateId { id: RecordId },
    #[error("invalid row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to encode CSV: {0}")]
    Encode(String),
}

fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes)
}

/// Decode a typed table, validating the header against the record's declared columns.
///
/// A zero-length object decodes to an empty table in declared column order.
pub fn decode_table<R: Record>(bytes: &[u8]) -> Result<Table<R>, SchemaError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::empty());
    }

    let mut csv_reader = reader(bytes);
    let headers = csv_reader.headers()?.clone();
    let layout = ColumnLayout::<R>::from_headers(headers.iter())?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: R = record
            .deserialize(Some(&headers))
            .map_err(|source| SchemaError::Row { line, source })?;
        rows.push(row);
    }

    Table::from_rows(layout, rows)
}

/// Encode a typed table in its remembered column order. No index column is written.
pub fn encode_table<R: Record>(table: &Table<R>) -> Result<Vec<u8>, SchemaError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;

    let layout = table.layout();
    for row in table.rows() {
        writer.write_record(layout.arrange(&row.cells()))?;
    }

    writer
        .into_inner()
        .map_err(|err| SchemaError::Encode(err.to_string()))
}

/// Decode an untyped table, keeping every column as text.
pub fn decode_reference(bytes: &[u8]) -> Result<ReferenceTable, SchemaError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReferenceTable::default());
    }

    let mut csv_reader = reader(bytes);
    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(ReferenceTable { headers, rows })
}
