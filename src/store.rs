use crate::defaults;
use crate::errors::{DashboardError, DashboardResult};
use crate::fields::{ChartField, EditableField, LayoutField, MetricField, RequirementField, ThemeField};
use crate::ids::IdGenerator;
use crate::models::{
    Chart, CustomLayout, CustomTheme, DashboardLayout, DashboardMeta, DashboardRequirement,
    Metric, MetricCategory, MetricSection, Priority, RequirementCategory, RequirementStatus,
    SectionTitle, Template, ThemeColors,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::debug;

/// One persisted collection of the store. Each maps to a fixed storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionKey {
    ClientMetrics,
    FinancialMetrics,
    SatisfactionMetrics,
    SectionTitles,
    DashboardTitle,
    Charts,
    Categories,
    ExpandedCategories,
    Requirements,
    Themes,
    Layouts,
    Templates,
    CurrentTheme,
    CurrentLayout,
    Meta,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 15] = [
        Self::ClientMetrics,
        Self::FinancialMetrics,
        Self::SatisfactionMetrics,
        Self::SectionTitles,
        Self::DashboardTitle,
        Self::Charts,
        Self::Categories,
        Self::ExpandedCategories,
        Self::Requirements,
        Self::Themes,
        Self::Layouts,
        Self::Templates,
        Self::CurrentTheme,
        Self::CurrentLayout,
        Self::Meta,
    ];

    pub fn storage_key(self) -> &'static str {
        match self {
            Self::ClientMetrics => "clientMetrics",
            Self::FinancialMetrics => "financialMetrics",
            Self::SatisfactionMetrics => "satisfactionMetrics",
            Self::SectionTitles => "sectionTitles",
            Self::DashboardTitle => "dashboardTitle",
            Self::Charts => "charts",
            Self::Categories => "metricCategories",
            Self::ExpandedCategories => "expandedCategories",
            Self::Requirements => "dashboardRequirements",
            Self::Themes => "customThemes",
            Self::Layouts => "customLayouts",
            Self::Templates => "dashboardTemplates",
            Self::CurrentTheme => "currentTheme",
            Self::CurrentLayout => "currentLayout",
            Self::Meta => "dashboardMeta",
        }
    }

    pub fn for_section(section: MetricSection) -> Self {
        match section {
            MetricSection::Client => Self::ClientMetrics,
            MetricSection::Financial => Self::FinancialMetrics,
            MetricSection::Satisfaction => Self::SatisfactionMetrics,
        }
    }
}

pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(Chart, MetricCategory, SectionTitle, DashboardRequirement, CustomTheme, CustomLayout, Template);

fn find_mut<'a, T: Identified>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}

/// Applies a field edit to a record that may not exist. A missing record is
/// not an error: the edit simply does not apply.
fn edit<F: EditableField>(entity: Option<&mut F::Entity>, field: F, value: &str) -> DashboardResult<bool> {
    match entity {
        Some(entity) => field.write(entity, value),
        None => Ok(false),
    }
}

/// Input for a new requirement note.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRequirement {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: RequirementCategory,
    pub priority: Priority,
}

/// Input for a new layout preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLayout {
    pub name: String,
    pub spacing: u32,
    pub card_height: u32,
    pub columns: u32,
    pub border_radius: u32,
}

/// In-memory dashboard state. Every mutation that changes a value records the
/// affected collection so the persistence layer can mirror it.
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub(crate) title: String,
    pub(crate) client_metrics: Vec<Metric>,
    pub(crate) financial_metrics: Vec<Metric>,
    pub(crate) satisfaction_metrics: Vec<Metric>,
    pub(crate) section_titles: Vec<SectionTitle>,
    pub(crate) charts: Vec<Chart>,
    pub(crate) categories: Vec<MetricCategory>,
    pub(crate) expanded_categories: Vec<String>,
    pub(crate) requirements: Vec<DashboardRequirement>,
    pub(crate) themes: Vec<CustomTheme>,
    pub(crate) layouts: Vec<CustomLayout>,
    pub(crate) templates: Vec<Template>,
    pub(crate) current_theme: CustomTheme,
    pub(crate) current_layout: CustomLayout,
    pub(crate) meta: DashboardMeta,
    ids: IdGenerator,
    changes: BTreeSet<CollectionKey>,
}

impl Default for EntityStore {
    fn default() -> Self {
        let mut ids = IdGenerator::new();
        let now = Utc::now();
        let meta = DashboardMeta {
            id: ids.next("dashboard"),
            created_at: now,
            updated_at: now,
        };
        Self {
            title: defaults::DASHBOARD_TITLE.to_string(),
            client_metrics: defaults::section_metrics(MetricSection::Client),
            financial_metrics: defaults::section_metrics(MetricSection::Financial),
            satisfaction_metrics: defaults::section_metrics(MetricSection::Satisfaction),
            section_titles: defaults::section_titles(),
            charts: defaults::charts(),
            categories: defaults::categories(),
            expanded_categories: defaults::expanded_categories(),
            requirements: defaults::requirements(),
            themes: defaults::themes(),
            layouts: defaults::layouts(),
            templates: defaults::templates(),
            current_theme: defaults::theme(),
            current_layout: defaults::layout(),
            meta,
            ids,
            changes: BTreeSet::new(),
        }
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self, key: CollectionKey) {
        self.changes.insert(key);
        if key != CollectionKey::Meta {
            self.meta.updated_at = Utc::now();
            self.changes.insert(CollectionKey::Meta);
        }
    }

    fn touch_if(&mut self, changed: bool, key: CollectionKey) -> bool {
        if changed {
            self.touch(key);
        }
        changed
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Hands out the collections changed since the last call.
    pub fn take_changes(&mut self) -> Vec<CollectionKey> {
        std::mem::take(&mut self.changes).into_iter().collect()
    }

    /// Advances the id generator past every id currently held.
    pub(crate) fn observe_ids(&mut self) {
        let ids = self
            .charts
            .iter()
            .map(Identified::id)
            .chain(self.categories.iter().map(Identified::id))
            .chain(self.requirements.iter().map(Identified::id))
            .chain(self.themes.iter().map(Identified::id))
            .chain(self.layouts.iter().map(Identified::id))
            .chain(self.templates.iter().map(Identified::id))
            .chain(std::iter::once(self.meta.id.as_str()))
            .map(str::to_string)
            .collect::<Vec<_>>();
        for id in ids {
            self.ids.observe(&id);
        }
    }

    pub fn meta(&self) -> &DashboardMeta {
        &self.meta
    }

    // Dashboard title

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        let changed = self.title != title;
        if changed {
            self.title = title;
        }
        self.touch_if(changed, CollectionKey::DashboardTitle)
    }

    // Section metrics (positional identity)

    pub fn section_metrics(&self, section: MetricSection) -> &[Metric] {
        match section {
            MetricSection::Client => &self.client_metrics,
            MetricSection::Financial => &self.financial_metrics,
            MetricSection::Satisfaction => &self.satisfaction_metrics,
        }
    }

    fn section_metrics_mut(&mut self, section: MetricSection) -> &mut Vec<Metric> {
        match section {
            MetricSection::Client => &mut self.client_metrics,
            MetricSection::Financial => &mut self.financial_metrics,
            MetricSection::Satisfaction => &mut self.satisfaction_metrics,
        }
    }

    pub fn add_section_metric(&mut self, section: MetricSection, metric: Metric) {
        self.section_metrics_mut(section).push(metric);
        self.touch(CollectionKey::for_section(section));
    }

    pub fn update_section_metric(
        &mut self,
        section: MetricSection,
        index: usize,
        field: MetricField,
        value: &str,
    ) -> DashboardResult<bool> {
        let changed = edit(self.section_metrics_mut(section).get_mut(index), field, value)?;
        Ok(self.touch_if(changed, CollectionKey::for_section(section)))
    }

    pub fn remove_section_metric(&mut self, section: MetricSection, index: usize) -> Option<Metric> {
        let removed = remove_at(self.section_metrics_mut(section), index);
        self.touch_if(removed.is_some(), CollectionKey::for_section(section));
        removed
    }

    // Section titles (fixed set, edited in place)

    pub fn section_titles(&self) -> &[SectionTitle] {
        &self.section_titles
    }

    pub fn section_title(&self, id: &str) -> Option<&SectionTitle> {
        self.section_titles.iter().find(|section| section.id == id)
    }

    pub fn rename_section(&mut self, id: &str, title: &str) -> bool {
        let changed = match find_mut(&mut self.section_titles, id) {
            Some(section) if section.title != title => {
                section.title = title.to_string();
                true
            }
            _ => false,
        };
        self.touch_if(changed, CollectionKey::SectionTitles)
    }

    // Charts

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.id == id)
    }

    /// Appends a chart with placeholder content and returns its id.
    pub fn add_chart(&mut self) -> String {
        let id = self.ids.next("chart");
        let color = defaults::COLOR_PALETTE[self.charts.len() % defaults::COLOR_PALETTE.len()];
        self.charts.push(defaults::new_chart(id.clone(), color));
        self.touch(CollectionKey::Charts);
        id
    }

    pub fn update_chart(&mut self, id: &str, field: ChartField, value: &str) -> DashboardResult<bool> {
        let changed = edit(find_mut(&mut self.charts, id), field, value)?;
        Ok(self.touch_if(changed, CollectionKey::Charts))
    }

    pub fn remove_chart(&mut self, id: &str) -> Option<Chart> {
        let removed = remove_by_id(&mut self.charts, id);
        self.touch_if(removed.is_some(), CollectionKey::Charts);
        removed
    }

    // Categories and their metrics

    pub fn categories(&self) -> &[MetricCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&MetricCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn add_category(&mut self, name: &str) -> String {
        let id = self.ids.next("category");
        self.categories.push(MetricCategory {
            id: id.clone(),
            name: name.to_string(),
            metrics: Vec::new(),
        });
        self.expanded_categories.push(id.clone());
        self.touch(CollectionKey::Categories);
        self.touch(CollectionKey::ExpandedCategories);
        id
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> bool {
        let changed = match find_mut(&mut self.categories, id) {
            Some(category) if category.name != name => {
                category.name = name.to_string();
                true
            }
            _ => false,
        };
        self.touch_if(changed, CollectionKey::Categories)
    }

    /// Removes a category together with every metric it owns.
    pub fn remove_category(&mut self, id: &str) -> Option<MetricCategory> {
        let removed = remove_by_id(&mut self.categories, id)?;
        self.touch(CollectionKey::Categories);
        let before = self.expanded_categories.len();
        self.expanded_categories.retain(|expanded| expanded != id);
        let collapsed = before != self.expanded_categories.len();
        self.touch_if(collapsed, CollectionKey::ExpandedCategories);
        debug!(category = id, metrics = removed.metrics.len(), "removed category");
        Some(removed)
    }

    pub fn add_category_metric(&mut self, category_id: &str, metric: Metric) -> bool {
        let added = match find_mut(&mut self.categories, category_id) {
            Some(category) => {
                category.metrics.push(metric);
                true
            }
            None => false,
        };
        self.touch_if(added, CollectionKey::Categories)
    }

    pub fn update_category_metric(
        &mut self,
        category_id: &str,
        index: usize,
        field: MetricField,
        value: &str,
    ) -> DashboardResult<bool> {
        let metric = find_mut(&mut self.categories, category_id)
            .and_then(|category| category.metrics.get_mut(index));
        let changed = edit(metric, field, value)?;
        Ok(self.touch_if(changed, CollectionKey::Categories))
    }

    pub fn remove_category_metric(&mut self, category_id: &str, index: usize) -> Option<Metric> {
        let removed = find_mut(&mut self.categories, category_id)
            .and_then(|category| remove_at(&mut category.metrics, index));
        self.touch_if(removed.is_some(), CollectionKey::Categories);
        removed
    }

    pub fn expanded_categories(&self) -> &[String] {
        &self.expanded_categories
    }

    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.expanded_categories.iter().any(|id| id == category_id)
    }

    /// Flips the expanded state of a category. Returns the new state, or
    /// `None` when the category does not exist.
    pub fn toggle_category(&mut self, category_id: &str) -> Option<bool> {
        self.category(category_id)?;
        let expanded = if self.is_expanded(category_id) {
            self.expanded_categories.retain(|id| id != category_id);
            false
        } else {
            self.expanded_categories.push(category_id.to_string());
            true
        };
        self.touch(CollectionKey::ExpandedCategories);
        Some(expanded)
    }

    // Requirements

    pub fn requirements(&self) -> &[DashboardRequirement] {
        &self.requirements
    }

    pub fn requirement(&self, id: &str) -> Option<&DashboardRequirement> {
        self.requirements.iter().find(|requirement| requirement.id == id)
    }

    pub fn add_requirement(&mut self, new: NewRequirement) -> String {
        let id = self.ids.next("requirement");
        self.requirements.push(DashboardRequirement {
            id: id.clone(),
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            status: RequirementStatus::Pending,
            is_editing: false,
        });
        self.touch(CollectionKey::Requirements);
        id
    }

    pub fn update_requirement(
        &mut self,
        id: &str,
        field: RequirementField,
        value: &str,
    ) -> DashboardResult<bool> {
        let changed = edit(find_mut(&mut self.requirements, id), field, value)?;
        Ok(self.touch_if(changed, CollectionKey::Requirements))
    }

    pub fn set_requirement_editing(&mut self, id: &str, editing: bool) -> bool {
        let changed = match find_mut(&mut self.requirements, id) {
            Some(requirement) if requirement.is_editing != editing => {
                requirement.is_editing = editing;
                true
            }
            _ => false,
        };
        self.touch_if(changed, CollectionKey::Requirements)
    }

    pub fn remove_requirement(&mut self, id: &str) -> Option<DashboardRequirement> {
        let removed = remove_by_id(&mut self.requirements, id);
        self.touch_if(removed.is_some(), CollectionKey::Requirements);
        removed
    }

    // Themes

    pub fn themes(&self) -> &[CustomTheme] {
        &self.themes
    }

    pub fn current_theme(&self) -> &CustomTheme {
        &self.current_theme
    }

    pub fn add_theme(&mut self, name: &str, colors: ThemeColors) -> String {
        let id = self.ids.next("theme");
        self.themes.push(CustomTheme {
            id: id.clone(),
            name: name.to_string(),
            colors,
            is_default: false,
        });
        self.touch(CollectionKey::Themes);
        id
    }

    pub fn update_theme(&mut self, id: &str, field: ThemeField, value: &str) -> DashboardResult<bool> {
        let theme = find_mut(&mut self.themes, id);
        if let Some(theme) = &theme {
            if theme.is_default {
                return Err(DashboardError::protected("theme", id));
            }
        }
        let changed = edit(theme, field, value)?;
        Ok(self.touch_if(changed, CollectionKey::Themes))
    }

    pub fn remove_theme(&mut self, id: &str) -> DashboardResult<Option<CustomTheme>> {
        if self.themes.iter().any(|theme| theme.id == id && theme.is_default) {
            return Err(DashboardError::protected("theme", id));
        }
        let removed = remove_by_id(&mut self.themes, id);
        self.touch_if(removed.is_some(), CollectionKey::Themes);
        Ok(removed)
    }

    /// Makes a catalog theme the one the dashboard is drawn with.
    pub fn apply_theme(&mut self, id: &str) -> DashboardResult<()> {
        let theme = self
            .themes
            .iter()
            .find(|theme| theme.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found("theme", id))?;
        let changed = self.current_theme != theme;
        self.current_theme = theme;
        self.touch_if(changed, CollectionKey::CurrentTheme);
        Ok(())
    }

    // Layouts

    pub fn layouts(&self) -> &[CustomLayout] {
        &self.layouts
    }

    pub fn current_layout(&self) -> &CustomLayout {
        &self.current_layout
    }

    pub fn add_layout(&mut self, new: NewLayout) -> String {
        let id = self.ids.next("layout");
        self.layouts.push(CustomLayout {
            id: id.clone(),
            name: new.name,
            spacing: new.spacing,
            card_height: new.card_height,
            columns: new.columns,
            border_radius: new.border_radius,
            is_default: false,
        });
        self.touch(CollectionKey::Layouts);
        id
    }

    pub fn update_layout(&mut self, id: &str, field: LayoutField, value: &str) -> DashboardResult<bool> {
        let layout = find_mut(&mut self.layouts, id);
        if let Some(layout) = &layout {
            if layout.is_default {
                return Err(DashboardError::protected("layout", id));
            }
        }
        let changed = edit(layout, field, value)?;
        Ok(self.touch_if(changed, CollectionKey::Layouts))
    }

    pub fn remove_layout(&mut self, id: &str) -> DashboardResult<Option<CustomLayout>> {
        if self.layouts.iter().any(|layout| layout.id == id && layout.is_default) {
            return Err(DashboardError::protected("layout", id));
        }
        let removed = remove_by_id(&mut self.layouts, id);
        self.touch_if(removed.is_some(), CollectionKey::Layouts);
        Ok(removed)
    }

    pub fn apply_layout(&mut self, id: &str) -> DashboardResult<()> {
        let layout = self
            .layouts
            .iter()
            .find(|layout| layout.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found("layout", id))?;
        let changed = self.current_layout != layout;
        self.current_layout = layout;
        self.touch_if(changed, CollectionKey::CurrentLayout);
        Ok(())
    }

    // Templates

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Captures the section metrics and charts as a new template.
    pub fn save_template(&mut self, name: &str, description: &str) -> String {
        let id = self.ids.next("template");
        let metrics = MetricSection::ALL
            .into_iter()
            .flat_map(|section| self.section_metrics(section).to_vec())
            .collect();
        self.templates.push(Template {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            metrics,
            charts: self.charts.clone(),
            is_default: false,
        });
        self.touch(CollectionKey::Templates);
        id
    }

    pub fn remove_template(&mut self, id: &str) -> DashboardResult<Option<Template>> {
        if self.templates.iter().any(|template| template.id == id && template.is_default) {
            return Err(DashboardError::protected("template", id));
        }
        let removed = remove_by_id(&mut self.templates, id);
        self.touch_if(removed.is_some(), CollectionKey::Templates);
        Ok(removed)
    }

    /// Instantiates a template: its metrics land in a new category named
    /// after it, its charts are appended under fresh ids. Returns the new
    /// category id.
    pub fn apply_template(&mut self, id: &str) -> DashboardResult<String> {
        let template = self
            .templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found("template", id))?;

        let category_id = self.add_category(&template.name);
        if let Some(category) = find_mut(&mut self.categories, &category_id) {
            category.metrics = template.metrics;
        }
        for chart in template.charts {
            let chart_id = self.ids.next("chart");
            self.charts.push(Chart { id: chart_id, ..chart });
        }
        self.touch(CollectionKey::Charts);
        debug!(template = id, category = %category_id, "applied template");
        Ok(category_id)
    }

    // Whole-dashboard snapshot

    pub fn snapshot(&self) -> DashboardLayout {
        DashboardLayout {
            id: self.meta.id.clone(),
            title: self.title.clone(),
            client_metrics: self.client_metrics.clone(),
            financial_metrics: self.financial_metrics.clone(),
            satisfaction_metrics: self.satisfaction_metrics.clone(),
            charts: self.charts.clone(),
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
            theme: self.current_theme.clone(),
            layout: self.current_layout.clone(),
        }
    }

    /// Replaces title, section metrics, charts, theme and layout with the
    /// snapshot's content. Everything else is left as is.
    pub fn restore(&mut self, layout: DashboardLayout) {
        fn swap<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        let changed = swap(&mut self.title, layout.title);
        self.touch_if(changed, CollectionKey::DashboardTitle);
        let changed = swap(&mut self.client_metrics, layout.client_metrics);
        self.touch_if(changed, CollectionKey::ClientMetrics);
        let changed = swap(&mut self.financial_metrics, layout.financial_metrics);
        self.touch_if(changed, CollectionKey::FinancialMetrics);
        let changed = swap(&mut self.satisfaction_metrics, layout.satisfaction_metrics);
        self.touch_if(changed, CollectionKey::SatisfactionMetrics);
        let changed = swap(&mut self.charts, layout.charts);
        self.touch_if(changed, CollectionKey::Charts);
        let changed = swap(&mut self.current_theme, layout.theme);
        self.touch_if(changed, CollectionKey::CurrentTheme);
        let changed = swap(&mut self.current_layout, layout.layout);
        self.touch_if(changed, CollectionKey::CurrentLayout);

        self.meta.id = layout.id;
        self.meta.created_at = layout.created_at;
        self.touch(CollectionKey::Meta);
        self.observe_ids();
    }

    // Storage encoding

    /// Text stored under the collection's key. The title is stored raw, every
    /// other collection as JSON.
    pub(crate) fn encode(&self, key: CollectionKey) -> Result<String, serde_json::Error> {
        match key {
            CollectionKey::DashboardTitle => Ok(self.title.clone()),
            CollectionKey::ClientMetrics => serde_json::to_string(&self.client_metrics),
            CollectionKey::FinancialMetrics => serde_json::to_string(&self.financial_metrics),
            CollectionKey::SatisfactionMetrics => serde_json::to_string(&self.satisfaction_metrics),
            CollectionKey::SectionTitles => serde_json::to_string(&self.section_titles),
            CollectionKey::Charts => serde_json::to_string(&self.charts),
            CollectionKey::Categories => serde_json::to_string(&self.categories),
            CollectionKey::ExpandedCategories => serde_json::to_string(&self.expanded_categories),
            CollectionKey::Requirements => serde_json::to_string(&self.requirements),
            CollectionKey::Themes => serde_json::to_string(&self.themes),
            CollectionKey::Layouts => serde_json::to_string(&self.layouts),
            CollectionKey::Templates => serde_json::to_string(&self.templates),
            CollectionKey::CurrentTheme => serde_json::to_string(&self.current_theme),
            CollectionKey::CurrentLayout => serde_json::to_string(&self.current_layout),
            CollectionKey::Meta => serde_json::to_string(&self.meta),
        }
    }

    /// Replaces one collection with stored text. On a parse error the
    /// collection keeps its current value.
    pub(crate) fn decode(&mut self, key: CollectionKey, text: &str) -> Result<(), serde_json::Error> {
        match key {
            CollectionKey::DashboardTitle => self.title = text.to_string(),
            CollectionKey::ClientMetrics => self.client_metrics = serde_json::from_str(text)?,
            CollectionKey::FinancialMetrics => self.financial_metrics = serde_json::from_str(text)?,
            CollectionKey::SatisfactionMetrics => {
                self.satisfaction_metrics = serde_json::from_str(text)?
            }
            CollectionKey::SectionTitles => self.section_titles = serde_json::from_str(text)?,
            CollectionKey::Charts => self.charts = serde_json::from_str(text)?,
            CollectionKey::Categories => self.categories = serde_json::from_str(text)?,
            CollectionKey::ExpandedCategories => {
                self.expanded_categories = serde_json::from_str(text)?
            }
            CollectionKey::Requirements => self.requirements = serde_json::from_str(text)?,
            CollectionKey::Themes => self.themes = serde_json::from_str(text)?,
            CollectionKey::Layouts => self.layouts = serde_json::from_str(text)?,
            CollectionKey::Templates => self.templates = serde_json::from_str(text)?,
            CollectionKey::CurrentTheme => self.current_theme = serde_json::from_str(text)?,
            CollectionKey::CurrentLayout => self.current_layout = serde_json::from_str(text)?,
            CollectionKey::Meta => self.meta = serde_json::from_str(text)?,
        }
        Ok(())
    }

    /// Marks the freshly loaded state as clean.
    pub(crate) fn settle(&mut self) {
        self.changes.clear();
        self.observe_ids();
    }
}
