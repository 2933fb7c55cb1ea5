//! Whole-dashboard file transfer: JSON snapshot export/import and the
//! rendered document export.

use crate::errors::{DashboardError, DashboardResult};
use crate::models::DashboardLayout;
use crate::paginate::{plan_pages, PagePlan, PageSize, RegionSize, SnapshotRegion};
use crate::store::EntityStore;
use chrono::NaiveDate;
use tracing::{error, info, warn};

/// A file handed to the user for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a dashboard title into a file stem: alphanumeric characters are kept,
/// every other run collapses into a single `-`.
pub fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            stem.extend(ch.to_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    if stem.is_empty() {
        "dashboard".to_string()
    } else {
        stem.to_string()
    }
}

pub fn export_snapshot(store: &EntityStore) -> DashboardResult<ExportFile> {
    let snapshot = store.snapshot();
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    Ok(ExportFile {
        file_name: format!("{}.json", file_stem(&snapshot.title)),
        content_type: "application/json",
        bytes,
    })
}

/// Parses `contents` as an export envelope and, only if that succeeds,
/// replaces the snapshot-covered parts of the store.
pub fn import_snapshot(store: &mut EntityStore, contents: &str) -> DashboardResult<()> {
    let layout: DashboardLayout = serde_json::from_str(contents).map_err(|err| {
        warn!(%err, "rejected dashboard import");
        DashboardError::MalformedImport(err)
    })?;
    info!(id = %layout.id, title = %layout.title, charts = layout.charts.len(), "importing dashboard");
    store.restore(layout);
    Ok(())
}

/// A captured region image.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl Raster {
    pub fn size(&self) -> RegionSize {
        RegionSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Presentation-side collaborator that rasterises dashboard regions and
/// composes them into a paginated document.
pub trait SnapshotRenderer {
    fn capture(&mut self, region: SnapshotRegion) -> Result<Raster, String>;

    fn compose(&mut self, plan: &PagePlan, metrics: &Raster, charts: &Raster) -> Result<Vec<u8>, String>;
}

pub fn document_file_name(date: NaiveDate) -> String {
    format!("dashboard-{}.pdf", date.format("%Y-%m-%d"))
}

fn render_document<R: SnapshotRenderer>(renderer: &mut R, page: PageSize) -> DashboardResult<(PagePlan, Vec<u8>)> {
    let metrics = renderer
        .capture(SnapshotRegion::Metrics)
        .map_err(DashboardError::Render)?;
    let charts = renderer
        .capture(SnapshotRegion::Charts)
        .map_err(DashboardError::Render)?;
    let plan = plan_pages(page, metrics.size(), charts.size())?;
    let bytes = renderer
        .compose(&plan, &metrics, &charts)
        .map_err(DashboardError::Render)?;
    Ok((plan, bytes))
}

/// Renders the metrics and charts regions into a paginated document. Any
/// renderer failure aborts the export without producing a file.
pub fn export_visual_snapshot<R: SnapshotRenderer>(
    renderer: &mut R,
    page: PageSize,
    date: NaiveDate,
) -> DashboardResult<ExportFile> {
    match render_document(renderer, page) {
        Ok((plan, bytes)) => {
            info!(pages = plan.page_count, "exported dashboard document");
            Ok(ExportFile {
                file_name: document_file_name(date),
                content_type: "application/pdf",
                bytes,
            })
        }
        Err(err) => {
            error!(%err, "dashboard document export failed");
            Err(err)
        }
    }
}
