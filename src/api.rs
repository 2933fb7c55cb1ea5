//! Request and response bodies of the HTTP surface.

use crate::dashboard::Dashboard;
use crate::fields::MetricField;
use crate::models::{
    Chart, CustomLayout, CustomTheme, DashboardMeta, DashboardRequirement, Metric,
    MetricCategory, MetricSection, SectionTitle, Template, ThemeColors,
};
use crate::paginate::{PageSize, RegionSize};
use crate::session::SessionState;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate<F> {
    pub field: F,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct EditingRequest {
    pub editing: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewThemeRequest {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Deserialize)]
pub struct NewTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MetricDraftRequest {
    pub field: MetricField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PagesRequest {
    #[serde(default)]
    pub page: PageSize,
    pub metrics: RegionSize,
    pub charts: RegionSize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangedResponse {
    pub changed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpandedResponse {
    pub expanded: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: MetricSection,
    pub title: String,
    pub metrics: Vec<Metric>,
}

/// Everything the presentation layer needs to draw the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: String,
    pub sections: Vec<SectionView>,
    pub section_titles: Vec<SectionTitle>,
    pub charts: Vec<Chart>,
    pub categories: Vec<MetricCategory>,
    pub expanded_categories: Vec<String>,
    pub requirements: Vec<DashboardRequirement>,
    pub themes: Vec<CustomTheme>,
    pub layouts: Vec<CustomLayout>,
    pub templates: Vec<Template>,
    pub current_theme: CustomTheme,
    pub current_layout: CustomLayout,
    pub meta: DashboardMeta,
    pub session: SessionState,
}

impl DashboardView {
    pub fn build<S: KeyValueStore>(dashboard: &Dashboard<S>) -> Self {
        let store = dashboard.store();
        let sections = MetricSection::ALL
            .into_iter()
            .map(|section| SectionView {
                id: section,
                title: store
                    .section_title(section.as_str())
                    .map(|title| title.title.clone())
                    .unwrap_or_default(),
                metrics: store.section_metrics(section).to_vec(),
            })
            .collect();
        Self {
            title: store.title().to_string(),
            sections,
            section_titles: store.section_titles().to_vec(),
            charts: store.charts().to_vec(),
            categories: store.categories().to_vec(),
            expanded_categories: store.expanded_categories().to_vec(),
            requirements: store.requirements().to_vec(),
            themes: store.themes().to_vec(),
            layouts: store.layouts().to_vec(),
            templates: store.templates().to_vec(),
            current_theme: store.current_theme().clone(),
            current_layout: store.current_layout().clone(),
            meta: store.meta().clone(),
            session: dashboard.session().state().clone(),
        }
    }
}
