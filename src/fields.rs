//! Typed field addressing for in-place edits.
//!
//! Every editable attribute of every entity kind is an enum variant. A field
//! can render the current value as the text shown in the edit dialog and can
//! write dialog text back, parsing it where the attribute is not plain text.

use crate::errors::{DashboardError, DashboardResult};
use crate::models::{
    Chart, ChartType, CustomLayout, CustomTheme, DashboardRequirement, Metric, MetricValue,
    Priority, RequirementCategory, RequirementStatus,
};
use serde::{Deserialize, Serialize};

pub trait EditableField: Copy {
    type Entity;

    fn name(self) -> &'static str;

    fn read(self, entity: &Self::Entity) -> String;

    /// Writes `value` into `entity`. Returns whether the entity changed.
    /// On error the entity is left untouched.
    fn write(self, entity: &mut Self::Entity, value: &str) -> DashboardResult<bool>;
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn parse_enum<T: serde::de::DeserializeOwned>(field: &'static str, value: &str) -> DashboardResult<T> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|_| DashboardError::invalid_value(field, value))
}

fn enum_text<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(text)) => text,
        _ => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    Title,
    Description,
    Value,
    Color,
    Calculation,
}

impl EditableField for MetricField {
    type Entity = Metric;

    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Value => "value",
            Self::Color => "color",
            Self::Calculation => "calculation",
        }
    }

    fn read(self, metric: &Metric) -> String {
        match self {
            Self::Title => metric.title.clone(),
            Self::Description => metric.description.clone(),
            Self::Value => metric.value.to_string(),
            Self::Color => metric.color.clone(),
            Self::Calculation => metric.calculation.clone(),
        }
    }

    fn write(self, metric: &mut Metric, value: &str) -> DashboardResult<bool> {
        Ok(match self {
            Self::Title => replace(&mut metric.title, value.to_string()),
            Self::Description => replace(&mut metric.description, value.to_string()),
            Self::Value => replace(&mut metric.value, MetricValue::from_input(value)),
            Self::Color => replace(&mut metric.color, value.to_string()),
            Self::Calculation => replace(&mut metric.calculation, value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartField {
    Title,
    Type,
    Color,
    DataKey,
    CategoryKey,
}

impl EditableField for ChartField {
    type Entity = Chart;

    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::Color => "color",
            Self::DataKey => "dataKey",
            Self::CategoryKey => "categoryKey",
        }
    }

    fn read(self, chart: &Chart) -> String {
        match self {
            Self::Title => chart.title.clone(),
            Self::Type => chart.chart_type.as_str().to_string(),
            Self::Color => chart.color.clone(),
            Self::DataKey => chart.data_key.clone(),
            Self::CategoryKey => chart.category_key.clone(),
        }
    }

    fn write(self, chart: &mut Chart, value: &str) -> DashboardResult<bool> {
        Ok(match self {
            Self::Title => replace(&mut chart.title, value.to_string()),
            Self::Type => {
                let chart_type = ChartType::parse(value)
                    .ok_or_else(|| DashboardError::invalid_value(self.name(), value))?;
                replace(&mut chart.chart_type, chart_type)
            }
            Self::Color => replace(&mut chart.color, value.to_string()),
            Self::DataKey => replace(&mut chart.data_key, value.to_string()),
            Self::CategoryKey => replace(&mut chart.category_key, value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementField {
    Title,
    Description,
    Category,
    Priority,
    Status,
}

impl EditableField for RequirementField {
    type Entity = DashboardRequirement;

    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }

    fn read(self, requirement: &DashboardRequirement) -> String {
        match self {
            Self::Title => requirement.title.clone(),
            Self::Description => requirement.description.clone(),
            Self::Category => enum_text(&requirement.category),
            Self::Priority => enum_text(&requirement.priority),
            Self::Status => enum_text(&requirement.status),
        }
    }

    fn write(self, requirement: &mut DashboardRequirement, value: &str) -> DashboardResult<bool> {
        Ok(match self {
            Self::Title => replace(&mut requirement.title, value.to_string()),
            Self::Description => replace(&mut requirement.description, value.to_string()),
            Self::Category => {
                let category: RequirementCategory = parse_enum(self.name(), value)?;
                replace(&mut requirement.category, category)
            }
            Self::Priority => {
                let priority: Priority = parse_enum(self.name(), value)?;
                replace(&mut requirement.priority, priority)
            }
            Self::Status => {
                let status: RequirementStatus = parse_enum(self.name(), value)?;
                replace(&mut requirement.status, status)
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeField {
    Name,
    Primary,
    Secondary,
    Background,
    Surface,
    Text,
}

impl ThemeField {
    fn slot(self, theme: &mut CustomTheme) -> &mut String {
        match self {
            Self::Name => &mut theme.name,
            Self::Primary => &mut theme.colors.primary,
            Self::Secondary => &mut theme.colors.secondary,
            Self::Background => &mut theme.colors.background,
            Self::Surface => &mut theme.colors.surface,
            Self::Text => &mut theme.colors.text,
        }
    }
}

impl EditableField for ThemeField {
    type Entity = CustomTheme;

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Background => "background",
            Self::Surface => "surface",
            Self::Text => "text",
        }
    }

    fn read(self, theme: &CustomTheme) -> String {
        match self {
            Self::Name => theme.name.clone(),
            Self::Primary => theme.colors.primary.clone(),
            Self::Secondary => theme.colors.secondary.clone(),
            Self::Background => theme.colors.background.clone(),
            Self::Surface => theme.colors.surface.clone(),
            Self::Text => theme.colors.text.clone(),
        }
    }

    fn write(self, theme: &mut CustomTheme, value: &str) -> DashboardResult<bool> {
        Ok(replace(self.slot(theme), value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutField {
    Name,
    Spacing,
    CardHeight,
    Columns,
    BorderRadius,
}

impl EditableField for LayoutField {
    type Entity = CustomLayout;

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Spacing => "spacing",
            Self::CardHeight => "cardHeight",
            Self::Columns => "columns",
            Self::BorderRadius => "borderRadius",
        }
    }

    fn read(self, layout: &CustomLayout) -> String {
        match self {
            Self::Name => layout.name.clone(),
            Self::Spacing => layout.spacing.to_string(),
            Self::CardHeight => layout.card_height.to_string(),
            Self::Columns => layout.columns.to_string(),
            Self::BorderRadius => layout.border_radius.to_string(),
        }
    }

    fn write(self, layout: &mut CustomLayout, value: &str) -> DashboardResult<bool> {
        let number = || {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| DashboardError::invalid_value(self.name(), value))
        };
        Ok(match self {
            Self::Name => replace(&mut layout.name, value.to_string()),
            Self::Spacing => replace(&mut layout.spacing, number()?),
            Self::CardHeight => replace(&mut layout.card_height, number()?),
            Self::Columns => replace(&mut layout.columns, number()?),
            Self::BorderRadius => replace(&mut layout.border_radius, number()?),
        })
    }
}
