use crate::errors::DashboardResult;
use crate::fields::MetricField;
use crate::paginate::PageSize;
use crate::persistence::Persistence;
use crate::session::{EditSession, EditTarget};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;
use crate::transfer::{self, ExportFile, SnapshotRenderer};
use chrono::NaiveDate;
use tracing::{debug, info};

/// The dashboard as one unit: entity store, the single edit slot, and the
/// storage mirror. Every path that mutates the store ends with a flush, so
/// storage always reflects the last completed operation.
#[derive(Debug)]
pub struct Dashboard<S> {
    store: EntityStore,
    session: EditSession,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn load(storage: S) -> Self {
        let persistence = Persistence::new(storage);
        let store = persistence.load();
        info!(
            title = store.title(),
            charts = store.charts().len(),
            categories = store.categories().len(),
            "dashboard loaded"
        );
        Self {
            store,
            session: EditSession::new(),
            persistence,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    fn flush(&mut self) {
        if self.store.has_changes() {
            self.persistence.flush(&mut self.store);
        }
    }

    /// Runs a store mutation and mirrors its effect to storage.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut EntityStore) -> R) -> R {
        let result = mutate(&mut self.store);
        self.flush();
        result
    }

    /// Writes every collection, changed or not.
    pub fn save_all(&mut self) -> usize {
        self.persistence.save_all(&mut self.store)
    }

    pub fn open_edit(&mut self, target: EditTarget) -> DashboardResult<()> {
        self.session.open(target, &self.store)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> DashboardResult<()> {
        self.session.set_draft(text)
    }

    pub fn set_metric_field(&mut self, field: MetricField, text: &str) -> DashboardResult<()> {
        self.session.set_metric_field(field, text)
    }

    pub fn commit_edit(&mut self) -> DashboardResult<bool> {
        let result = self.session.commit(&mut self.store);
        self.flush();
        result
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    pub fn export_snapshot(&self) -> DashboardResult<ExportFile> {
        transfer::export_snapshot(&self.store)
    }

    pub fn import_snapshot(&mut self, contents: &str) -> DashboardResult<()> {
        let result = transfer::import_snapshot(&mut self.store, contents);
        self.flush();
        result
    }

    /// Renders the current dashboard into a paginated document. An open edit
    /// session is left as it is; the renderer draws committed state only.
    pub fn export_visual_snapshot<R: SnapshotRenderer>(
        &self,
        renderer: &mut R,
        page: PageSize,
        date: NaiveDate,
    ) -> DashboardResult<ExportFile> {
        debug!(
            title = self.store.title(),
            editing = self.session.is_editing(),
            "exporting dashboard document"
        );
        transfer::export_visual_snapshot(renderer, page, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSection;
    use crate::paginate::{PagePlan, SnapshotRegion};
    use crate::storage::MemoryStore;
    use crate::transfer::Raster;

    struct TallMetrics;

    impl SnapshotRenderer for TallMetrics {
        fn capture(&mut self, region: SnapshotRegion) -> Result<Raster, String> {
            let height = match region {
                SnapshotRegion::Metrics => 4000,
                SnapshotRegion::Charts => 1000,
            };
            Ok(Raster {
                width: 1900,
                height,
                bytes: Vec::new(),
            })
        }

        fn compose(&mut self, plan: &PagePlan, _metrics: &Raster, _charts: &Raster) -> Result<Vec<u8>, String> {
            Ok(plan.page_count.to_string().into_bytes())
        }
    }

    #[test]
    fn commit_is_mirrored_to_storage() {
        let mut dashboard = Dashboard::load(MemoryStore::new());
        dashboard.open_edit(EditTarget::DashboardTitle).unwrap();
        dashboard.set_draft("Продажи").unwrap();
        assert!(dashboard.commit_edit().unwrap());
        assert_eq!(dashboard.storage().entries()["dashboardTitle"], "Продажи");
    }

    #[test]
    fn update_flushes_changed_collections() {
        let mut dashboard = Dashboard::load(MemoryStore::new());
        let removed = dashboard.update(|store| store.remove_section_metric(MetricSection::Client, 0));
        assert!(removed.is_some());
        let stored = &dashboard.storage().entries()["clientMetrics"];
        let metrics: Vec<crate::models::Metric> = serde_json::from_str(stored).unwrap();
        assert_eq!(metrics.len(), 3);
        assert!(!dashboard.store().has_changes());
    }

    #[test]
    fn cancel_leaves_storage_empty() {
        let mut dashboard = Dashboard::load(MemoryStore::new());
        dashboard.open_edit(EditTarget::DashboardTitle).unwrap();
        dashboard.set_draft("x").unwrap();
        dashboard.cancel_edit();
        assert!(dashboard.storage().entries().is_empty());
    }

    #[test]
    fn visual_export_leaves_dashboard_untouched() {
        let mut dashboard = Dashboard::load(MemoryStore::new());
        dashboard.open_edit(EditTarget::DashboardTitle).unwrap();
        dashboard.set_draft("черновик").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let file = dashboard
            .export_visual_snapshot(&mut TallMetrics, PageSize::A4, date)
            .unwrap();

        assert_eq!(file.file_name, "dashboard-2026-10-18.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.bytes, b"2".to_vec());
        assert!(dashboard.session().is_editing());
        assert!(dashboard.storage().entries().is_empty());
    }
}
