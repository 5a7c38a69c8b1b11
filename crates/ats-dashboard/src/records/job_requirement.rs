//! Job requirements are reference data: they are loaded and displayed, never written.
//!
//! No column set is declared for this table, so it is held as a
//! [`ReferenceTable`](crate::table::ReferenceTable) of string cells.

/// Object name of the job requirements table under the storage root.
pub const JOB_REQUIREMENTS_RESOURCE: &str = "job_requirements.csv";
