use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type DataRow = serde_json::Map<String, serde_json::Value>;

/// Displayed value of a metric card. Numbers keep their JSON form so an
/// integer typed by the user stays an integer on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(serde_json::Number),
    Text(String),
}

impl MetricValue {
    /// Interprets free text the way the editing dialog does: anything that
    /// reads as a JSON number becomes a number, the rest stays text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        match serde_json::from_str::<serde_json::Number>(trimmed) {
            Ok(number) if !trimmed.is_empty() => Self::Number(number),
            _ => Self::Text(input.to_string()),
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Number(0.into())
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub title: String,
    pub description: String,
    pub value: MetricValue,
    pub color: String,
    pub calculation: String,
}

/// The three fixed metric sections of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSection {
    Client,
    Financial,
    Satisfaction,
}

impl MetricSection {
    pub const ALL: [MetricSection; 3] = [Self::Client, Self::Financial, Self::Satisfaction];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Financial => "financial",
            Self::Satisfaction => "satisfaction",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Area,
    /// Declared but without a rendering contract.
    Table,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Area => "area",
            Self::Table => "table",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "pie" => Some(Self::Pie),
            "area" => Some(Self::Area),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

fn default_category_key() -> String {
    "month".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub data: Vec<DataRow>,
    pub data_key: String,
    #[serde(default = "default_category_key")]
    pub category_key: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
}

impl Chart {
    /// Pairs each row's category label with its `data_key` value. Rows that
    /// lack a numeric value yield `None` rather than being dropped.
    pub fn series(&self) -> Vec<SeriesPoint> {
        self.data
            .iter()
            .map(|row| SeriesPoint {
                label: row
                    .get(&self.category_key)
                    .map(|label| match label {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default(),
                value: row.get(&self.data_key).and_then(serde_json::Value::as_f64),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTitle {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Metrics,
    Visualization,
    Integration,
    Security,
    Performance,
    Customization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: RequirementCategory,
    pub priority: Priority,
    pub status: RequirementStatus,
    #[serde(default)]
    pub is_editing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub surface: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTheme {
    pub id: String,
    pub name: String,
    pub colors: ThemeColors,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLayout {
    pub id: String,
    pub name: String,
    pub spacing: u32,
    pub card_height: u32,
    pub columns: u32,
    pub border_radius: u32,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub charts: Vec<Chart>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Export envelope: the unit of file import and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub id: String,
    pub title: String,
    pub client_metrics: Vec<Metric>,
    pub financial_metrics: Vec<Metric>,
    pub satisfaction_metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub theme: CustomTheme,
    pub layout: CustomLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_value_from_input_keeps_integers() {
        assert_eq!(MetricValue::from_input("42"), MetricValue::from(42_i64));
        assert_eq!(MetricValue::from_input(" 42 ").to_string(), "42");
        assert_eq!(MetricValue::from_input("4.7/5"), MetricValue::from("4.7/5"));
        assert_eq!(MetricValue::from_input("NaN"), MetricValue::from("NaN"));
        assert_eq!(MetricValue::from_input(""), MetricValue::from(""));
    }

    #[test]
    fn metric_value_serializes_untagged() {
        let metric = Metric {
            title: "NPS".to_string(),
            description: String::new(),
            value: MetricValue::from(72_i64),
            color: "#1976d2".to_string(),
            calculation: String::new(),
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["value"], serde_json::json!(72));

        let parsed: Metric = serde_json::from_value(serde_json::json!({
            "title": "ARPU",
            "description": "",
            "value": "35 000 ₽",
            "color": "#0288d1",
            "calculation": ""
        }))
        .unwrap();
        assert_eq!(parsed.value, MetricValue::from("35 000 ₽"));
    }

    #[test]
    fn chart_defaults_category_key_and_renames_type() {
        let chart: Chart = serde_json::from_value(serde_json::json!({
            "id": "chart-1",
            "title": "Clients",
            "type": "line",
            "data": [{ "month": "Янв", "clients": 800 }, { "month": "Фев" }],
            "dataKey": "clients",
            "color": "#2e7d32"
        }))
        .unwrap();
        assert_eq!(chart.chart_type, ChartType::Line);
        assert_eq!(chart.category_key, "month");

        let series = chart.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Янв");
        assert_eq!(series[0].value, Some(800.0));
        assert_eq!(series[1].value, None);
    }

    #[test]
    fn requirement_status_uses_snake_case() {
        let json = serde_json::to_value(RequirementStatus::InProgress).unwrap();
        assert_eq!(json, serde_json::json!("in_progress"));
    }
}
