//! Single-slot edit controller.
//!
//! At most one target is being edited at a time. Opening a new target while
//! another is open replaces it; only the target open at commit time is ever
//! written to the store.

use crate::defaults;
use crate::errors::{DashboardError, DashboardResult};
use crate::fields::{ChartField, EditableField, MetricField, RequirementField};
use crate::models::{Metric, MetricSection, MetricValue};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a newly created metric is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MetricDestination {
    Section { section: MetricSection },
    Category { category_id: String },
}

/// What an open edit session writes to on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditTarget {
    SectionMetric {
        section: MetricSection,
        index: usize,
        field: MetricField,
    },
    CategoryMetric {
        category_id: String,
        index: usize,
        field: MetricField,
    },
    Chart {
        chart_id: String,
        field: ChartField,
    },
    SectionTitle {
        section_id: String,
    },
    DashboardTitle,
    CategoryName {
        category_id: String,
    },
    Requirement {
        requirement_id: String,
        field: RequirementField,
    },
    NewMetric {
        destination: MetricDestination,
    },
}

impl EditTarget {
    /// Current text of the targeted value, or `NotFound` when the locator
    /// points at nothing.
    fn current_text(&self, store: &EntityStore) -> DashboardResult<String> {
        match self {
            Self::SectionMetric { section, index, field } => store
                .section_metrics(*section)
                .get(*index)
                .map(|metric| field.read(metric))
                .ok_or_else(|| {
                    DashboardError::not_found("metric", format!("{}/{index}", section.as_str()))
                }),
            Self::CategoryMetric {
                category_id,
                index,
                field,
            } => store
                .category(category_id)
                .and_then(|category| category.metrics.get(*index))
                .map(|metric| field.read(metric))
                .ok_or_else(|| DashboardError::not_found("metric", format!("{category_id}/{index}"))),
            Self::Chart { chart_id, field } => store
                .chart(chart_id)
                .map(|chart| field.read(chart))
                .ok_or_else(|| DashboardError::not_found("chart", chart_id)),
            Self::SectionTitle { section_id } => store
                .section_title(section_id)
                .map(|section| section.title.clone())
                .ok_or_else(|| DashboardError::not_found("section", section_id)),
            Self::DashboardTitle => Ok(store.title().to_string()),
            Self::CategoryName { category_id } => store
                .category(category_id)
                .map(|category| category.name.clone())
                .ok_or_else(|| DashboardError::not_found("category", category_id)),
            Self::Requirement {
                requirement_id,
                field,
            } => store
                .requirement(requirement_id)
                .map(|requirement| field.read(requirement))
                .ok_or_else(|| DashboardError::not_found("requirement", requirement_id)),
            Self::NewMetric { destination } => match destination {
                MetricDestination::Category { category_id } if store.category(category_id).is_none() => {
                    Err(DashboardError::not_found("category", category_id))
                }
                _ => Ok(String::new()),
            },
        }
    }
}

/// Partial metric record assembled field by field before it is added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<MetricValue>,
    pub color: Option<String>,
    pub calculation: Option<String>,
}

impl MetricDraft {
    pub fn placeholder() -> Self {
        Self::from(&defaults::placeholder_metric())
    }

    /// Fills every unset field from the placeholder metric.
    pub fn with_defaults(self) -> Self {
        let placeholder = Self::placeholder();
        Self {
            title: self.title.or(placeholder.title),
            description: self.description.or(placeholder.description),
            value: self.value.or(placeholder.value),
            color: self.color.or(placeholder.color),
            calculation: self.calculation.or(placeholder.calculation),
        }
    }

    /// Reads a draft from JSON text, as typed into a raw editor.
    pub fn parse(text: &str) -> DashboardResult<Self> {
        serde_json::from_str(text).map_err(|err| DashboardError::InvalidDraft(err.to_string()))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_value(&mut self, value: MetricValue) -> &mut Self {
        self.value = Some(value);
        self
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.color = Some(color.into());
        self
    }

    pub fn set_calculation(&mut self, calculation: impl Into<String>) -> &mut Self {
        self.calculation = Some(calculation.into());
        self
    }

    pub fn set_field(&mut self, field: MetricField, text: &str) -> &mut Self {
        match field {
            MetricField::Title => self.set_title(text),
            MetricField::Description => self.set_description(text),
            MetricField::Value => self.set_value(MetricValue::from_input(text)),
            MetricField::Color => self.set_color(text),
            MetricField::Calculation => self.set_calculation(text),
        }
    }

    /// Produces the metric once every field is present.
    pub fn build(&self) -> DashboardResult<Metric> {
        fn required<T: Clone>(slot: &Option<T>, name: &str) -> DashboardResult<T> {
            slot.clone()
                .ok_or_else(|| DashboardError::InvalidDraft(format!("missing field `{name}`")))
        }

        Ok(Metric {
            title: required(&self.title, "title")?,
            description: required(&self.description, "description")?,
            value: required(&self.value, "value")?,
            color: required(&self.color, "color")?,
            calculation: required(&self.calculation, "calculation")?,
        })
    }
}

impl From<&Metric> for MetricDraft {
    fn from(metric: &Metric) -> Self {
        Self {
            title: Some(metric.title.clone()),
            description: Some(metric.description.clone()),
            value: Some(metric.value.clone()),
            color: Some(metric.color.clone()),
            calculation: Some(metric.calculation.clone()),
        }
    }
}

/// Scratch value of an open session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Draft {
    Text(String),
    Metric(MetricDraft),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Idle,
    Editing { target: EditTarget, draft: Draft },
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SessionState::Editing { .. })
    }

    pub fn target(&self) -> Option<&EditTarget> {
        match &self.state {
            SessionState::Editing { target, .. } => Some(target),
            SessionState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            SessionState::Editing { draft, .. } => Some(draft),
            SessionState::Idle => None,
        }
    }

    /// Opens `target`, seeding the draft with its current value. A session
    /// that is already open is replaced.
    pub fn open(&mut self, target: EditTarget, store: &EntityStore) -> DashboardResult<()> {
        let text = target.current_text(store)?;
        let draft = match target {
            EditTarget::NewMetric { .. } => Draft::Metric(MetricDraft::placeholder()),
            _ => Draft::Text(text),
        };
        if let Some(previous) = self.target() {
            debug!(?previous, ?target, "replacing open edit session");
        } else {
            debug!(?target, "opened edit session");
        }
        self.state = SessionState::Editing { target, draft };
        Ok(())
    }

    /// Replaces the draft with free text. For a new-metric session the text
    /// is kept as is and parsed as a metric record on commit.
    pub fn set_draft(&mut self, text: impl Into<String>) -> DashboardResult<()> {
        match &mut self.state {
            SessionState::Editing { draft, .. } => {
                *draft = Draft::Text(text.into());
                Ok(())
            }
            SessionState::Idle => Err(DashboardError::NoActiveEdit),
        }
    }

    /// Sets one field of a new-metric draft. A raw-text draft is parsed
    /// first; if it does not parse the draft is left as it was.
    pub fn set_metric_field(&mut self, field: MetricField, text: &str) -> DashboardResult<()> {
        let SessionState::Editing { target, draft } = &mut self.state else {
            return Err(DashboardError::NoActiveEdit);
        };
        if !matches!(target, EditTarget::NewMetric { .. }) {
            return Err(DashboardError::InvalidDraft(
                "only new-metric sessions hold a metric draft".to_string(),
            ));
        }
        let mut metric = match draft {
            Draft::Metric(metric) => metric.clone(),
            Draft::Text(raw) => MetricDraft::parse(raw)?,
        };
        metric.set_field(field, text);
        *draft = Draft::Metric(metric);
        Ok(())
    }

    /// Discards the session. Never touches the store.
    pub fn cancel(&mut self) {
        if let SessionState::Editing { target, .. } = std::mem::take(&mut self.state) {
            debug!(?target, "cancelled edit session");
        }
    }

    /// Writes the draft to the store and closes the session, whether or not
    /// the write succeeds. Returns whether the store changed.
    pub fn commit(&mut self, store: &mut EntityStore) -> DashboardResult<bool> {
        let SessionState::Editing { target, draft } = std::mem::take(&mut self.state) else {
            return Err(DashboardError::NoActiveEdit);
        };
        let result = apply(&target, draft, store);
        match &result {
            Ok(changed) => debug!(?target, changed, "committed edit session"),
            Err(err) => warn!(?target, %err, "edit session commit rejected"),
        }
        result
    }
}

fn text_draft(draft: Draft) -> DashboardResult<String> {
    match draft {
        Draft::Text(text) => Ok(text),
        Draft::Metric(_) => Err(DashboardError::InvalidDraft(
            "field edits take a text draft".to_string(),
        )),
    }
}

fn apply(target: &EditTarget, draft: Draft, store: &mut EntityStore) -> DashboardResult<bool> {
    match target {
        EditTarget::NewMetric { destination } => {
            let metric = match draft {
                Draft::Metric(metric) => metric,
                Draft::Text(raw) => MetricDraft::parse(&raw)?,
            }
            .build()?;
            Ok(match destination {
                MetricDestination::Section { section } => {
                    store.add_section_metric(*section, metric);
                    true
                }
                MetricDestination::Category { category_id } => {
                    store.add_category_metric(category_id, metric)
                }
            })
        }
        EditTarget::SectionMetric { section, index, field } => {
            store.update_section_metric(*section, *index, *field, &text_draft(draft)?)
        }
        EditTarget::CategoryMetric {
            category_id,
            index,
            field,
        } => store.update_category_metric(category_id, *index, *field, &text_draft(draft)?),
        EditTarget::Chart { chart_id, field } => {
            store.update_chart(chart_id, *field, &text_draft(draft)?)
        }
        EditTarget::SectionTitle { section_id } => {
            Ok(store.rename_section(section_id, &text_draft(draft)?))
        }
        EditTarget::DashboardTitle => Ok(store.set_title(text_draft(draft)?)),
        EditTarget::CategoryName { category_id } => {
            Ok(store.rename_category(category_id, &text_draft(draft)?))
        }
        EditTarget::Requirement {
            requirement_id,
            field,
        } => store.update_requirement(requirement_id, *field, &text_draft(draft)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartType;

    fn title_target(index: usize) -> EditTarget {
        EditTarget::SectionMetric {
            section: MetricSection::Client,
            index,
            field: MetricField::Title,
        }
    }

    #[test]
    fn open_seeds_draft_with_current_value() {
        let store = EntityStore::new();
        let mut session = EditSession::new();
        session.open(title_target(0), &store).unwrap();
        assert_eq!(session.draft(), Some(&Draft::Text("Активные клиенты".to_string())));
    }

    #[test]
    fn open_unknown_target_keeps_session_idle() {
        let store = EntityStore::new();
        let mut session = EditSession::new();
        let err = session.open(title_target(40), &store).unwrap_err();
        assert!(matches!(err, DashboardError::NotFound { entity: "metric", .. }));
        assert!(!session.is_editing());
    }

    #[test]
    fn commit_writes_field_and_returns_to_idle() {
        let mut store = EntityStore::new();
        let mut session = EditSession::new();
        session.open(title_target(1), &store).unwrap();
        session.set_draft("Новые пользователи").unwrap();
        assert!(session.commit(&mut store).unwrap());
        assert!(!session.is_editing());
        assert_eq!(store.section_metrics(MetricSection::Client)[1].title, "Новые пользователи");
        assert!(matches!(session.commit(&mut store), Err(DashboardError::NoActiveEdit)));
    }

    #[test]
    fn cancel_never_touches_store() {
        let mut store = EntityStore::new();
        store.take_changes();
        let before = store.snapshot();
        let mut session = EditSession::new();
        session.open(EditTarget::DashboardTitle, &store).unwrap();
        session.set_draft("Другой заголовок").unwrap();
        session.cancel();
        session.cancel();
        assert_eq!(store.snapshot(), before);
        assert!(!store.has_changes());
        assert!(matches!(session.set_draft("x"), Err(DashboardError::NoActiveEdit)));
    }

    #[test]
    fn later_open_replaces_earlier_target() {
        let mut store = EntityStore::new();
        let mut session = EditSession::new();
        session.open(EditTarget::DashboardTitle, &store).unwrap();
        session
            .open(
                EditTarget::SectionTitle {
                    section_id: "financial".to_string(),
                },
                &store,
            )
            .unwrap();
        session.set_draft("Деньги").unwrap();
        session.commit(&mut store).unwrap();

        assert_eq!(store.title(), defaults::DASHBOARD_TITLE);
        assert_eq!(store.section_title("financial").unwrap().title, "Деньги");
    }

    #[test]
    fn new_metric_builder_appends_to_section() {
        let mut store = EntityStore::new();
        let mut session = EditSession::new();
        let target = EditTarget::NewMetric {
            destination: MetricDestination::Section {
                section: MetricSection::Satisfaction,
            },
        };
        session.open(target, &store).unwrap();
        session.set_metric_field(MetricField::Title, "CSAT").unwrap();
        session.set_metric_field(MetricField::Value, "91").unwrap();
        assert!(session.commit(&mut store).unwrap());

        let added = store.section_metrics(MetricSection::Satisfaction).last().unwrap();
        assert_eq!(added.title, "CSAT");
        assert_eq!(added.value, MetricValue::from(91_i64));
        assert_eq!(added.description, "Описание метрики");
    }

    #[test]
    fn malformed_metric_text_aborts_without_mutation() {
        let mut store = EntityStore::new();
        store.take_changes();
        let before = store.section_metrics(MetricSection::Client).to_vec();
        let mut session = EditSession::new();
        let target = EditTarget::NewMetric {
            destination: MetricDestination::Section {
                section: MetricSection::Client,
            },
        };
        session.open(target.clone(), &store).unwrap();
        session.set_draft("{not json").unwrap();
        let err = session.commit(&mut store).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDraft(_)));
        assert!(!session.is_editing());

        session.open(target, &store).unwrap();
        session.set_draft(r#"{"title": "Без цвета"}"#).unwrap();
        assert!(session.commit(&mut store).is_err());

        assert_eq!(store.section_metrics(MetricSection::Client), before.as_slice());
        assert!(!store.has_changes());
    }

    #[test]
    fn raw_metric_json_is_accepted() {
        let mut store = EntityStore::new();
        let category_id = store.add_category("Рост");
        let mut session = EditSession::new();
        session
            .open(
                EditTarget::NewMetric {
                    destination: MetricDestination::Category {
                        category_id: category_id.clone(),
                    },
                },
                &store,
            )
            .unwrap();
        session
            .set_draft(
                r##"{"title":"MAU","description":"","value":"950","color":"#00796b","calculation":""}"##,
            )
            .unwrap();
        assert!(session.commit(&mut store).unwrap());
        let metric = &store.category(&category_id).unwrap().metrics[0];
        assert_eq!(metric.title, "MAU");
        assert_eq!(metric.value, MetricValue::from("950"));
    }

    #[test]
    fn invalid_chart_type_is_rejected_and_session_closes() {
        let mut store = EntityStore::new();
        let mut session = EditSession::new();
        let target = EditTarget::Chart {
            chart_id: "active-clients".to_string(),
            field: ChartField::Type,
        };
        session.open(target, &store).unwrap();
        assert_eq!(session.draft(), Some(&Draft::Text("bar".to_string())));
        session.set_draft("radar").unwrap();
        assert!(session.commit(&mut store).is_err());
        assert!(!session.is_editing());
        assert_eq!(store.chart("active-clients").unwrap().chart_type, ChartType::Bar);
    }

    #[test]
    fn edit_target_deserializes_from_tagged_json() {
        let target: EditTarget = serde_json::from_value(serde_json::json!({
            "kind": "categoryMetric",
            "categoryId": "clients",
            "index": 2,
            "field": "calculation"
        }))
        .unwrap();
        assert_eq!(
            target,
            EditTarget::CategoryMetric {
                category_id: "clients".to_string(),
                index: 2,
                field: MetricField::Calculation,
            }
        );
    }
}
