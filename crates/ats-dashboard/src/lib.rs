//! Recruiting operations tables kept as CSV objects in object storage.
//!
//! Three entities live here: the recruiter roster, the submission log and the (read-only) job
//! requirements. Each request loads a table through the [`storage::StorageAccessor`], the page
//! controllers in [`pages`] apply at most one user action to it, and the table is written back
//! wholesale with a compare-and-swap against the version it was loaded at.

pub mod config;
pub mod error;
pub mod pages;
pub mod records;
pub mod storage;
pub mod table;
pub mod telemetry;
