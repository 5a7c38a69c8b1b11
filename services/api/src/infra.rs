use ats_dashboard::pages::{EntityPage, ReferencePage};
use ats_dashboard::records::EditableRecord;
use ats_dashboard::storage::StorageAccessor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) storage: Arc<StorageAccessor>,
}

impl AppState {
    pub(crate) fn page<R: EditableRecord>(&self) -> EntityPage<R> {
        EntityPage::new(self.storage.clone())
    }

    pub(crate) fn job_requirements(&self) -> ReferencePage {
        ReferencePage::job_requirements(self.storage.clone())
    }
}

#[cfg(test)]
pub(crate) fn test_state(storage: StorageAccessor) -> AppState {
    use metrics_exporter_prometheus::PrometheusBuilder;

    AppState {
        readiness: Arc::new(AtomicBool::new(true)),
        metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        storage: Arc::new(storage),
    }
}
