use std::sync::Arc;

use super::PageError;
use crate::records::JOB_REQUIREMENTS_RESOURCE;
use crate::storage::StorageAccessor;

/// Rendering data for a read-only table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceView {
    pub search: String,
    pub headers: Vec<String>,
    pub results: Vec<Vec<String>>,
    pub total_rows: usize,
    pub missing: bool,
}

/// Read-only page over an untyped table such as the job requirements.
#[derive(Clone)]
pub struct ReferencePage {
    storage: Arc<StorageAccessor>,
    resource: &'static str,
}

impl ReferencePage {
    pub fn new(storage: Arc<StorageAccessor>, resource: &'static str) -> Self {
        Self { storage, resource }
    }

    pub fn job_requirements(storage: Arc<StorageAccessor>) -> Self {
        Self::new(storage, JOB_REQUIREMENTS_RESOURCE)
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub async fn view(&self, search: &str) -> Result<ReferenceView, PageError> {
        let snapshot = self.storage.load_reference(self.resource).await?;
        let missing = snapshot.is_missing();
        let table = snapshot.table;

        Ok(ReferenceView {
            search: search.to_string(),
            results: table.search(search).into_iter().map(<[String]>::to_vec).collect(),
            total_rows: table.len(),
            headers: table.headers,
            missing,
        })
    }
}
