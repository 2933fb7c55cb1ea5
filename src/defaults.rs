//! Seed content used when storage holds nothing usable for a collection.

use crate::models::{
    Chart, ChartType, CustomLayout, CustomTheme, DataRow, DashboardRequirement, Metric,
    MetricCategory, MetricSection, MetricValue, SectionTitle, Template, ThemeColors,
};

pub const DASHBOARD_TITLE: &str = "Аналитика PropTech";

pub const COLOR_PALETTE: [&str; 12] = [
    "#1976d2", "#2e7d32", "#d32f2f", "#9c27b0", "#ed6c02", "#0288d1", "#7b1fa2", "#c2185b",
    "#00796b", "#5d4037", "#455a64", "#f57c00",
];

pub const DEFAULT_THEME_ID: &str = "theme-default";
pub const DEFAULT_LAYOUT_ID: &str = "layout-default";
pub const DEFAULT_TEMPLATE_ID: &str = "template-default";

fn metric(title: &str, description: &str, value: MetricValue, color: &str, calculation: &str) -> Metric {
    Metric {
        title: title.to_string(),
        description: description.to_string(),
        value,
        color: color.to_string(),
        calculation: calculation.to_string(),
    }
}

/// Placeholder record a freshly added metric starts from.
pub fn placeholder_metric() -> Metric {
    metric(
        "Новая метрика",
        "Описание метрики",
        MetricValue::default(),
        COLOR_PALETTE[0],
        "Формула расчета",
    )
}

pub fn section_metrics(section: MetricSection) -> Vec<Metric> {
    match section {
        MetricSection::Client => client_metrics(),
        MetricSection::Financial => financial_metrics(),
        MetricSection::Satisfaction => satisfaction_metrics(),
    }
}

fn client_metrics() -> Vec<Metric> {
    vec![
        metric(
            "Активные клиенты",
            "Количество клиентов, использующих сервис",
            MetricValue::from(1250_i64),
            "#1976d2",
            "Количество уникальных клиентов, совершивших хотя бы одно действие в сервисе за последние 30 дней",
        ),
        metric(
            "Новые клиенты",
            "Количество новых клиентов за период",
            MetricValue::from(180_i64),
            "#2e7d32",
            "Количество клиентов, зарегистрировавшихся в сервисе за последние 30 дней",
        ),
        metric(
            "Ушедшие клиенты",
            "Количество клиентов, прекративших использование",
            MetricValue::from(45_i64),
            "#d32f2f",
            "Количество клиентов, не совершавших действий в сервисе более 30 дней",
        ),
        metric(
            "Удержание клиентов",
            "Процент клиентов, продолжающих использовать сервис",
            "85.5%".into(),
            "#9c27b0",
            "(Количество активных клиентов / Общее количество клиентов) * 100%",
        ),
    ]
}

fn financial_metrics() -> Vec<Metric> {
    vec![
        metric(
            "Средний чек",
            "Средняя стоимость заказа",
            "45 000 ₽".into(),
            "#ed6c02",
            "Общая сумма заказов / Количество заказов",
        ),
        metric(
            "ARPU",
            "Средний доход с одного клиента",
            "35 000 ₽".into(),
            "#0288d1",
            "Общий доход / Количество активных клиентов",
        ),
        metric(
            "LTV",
            "Пожизненная ценность клиента",
            "420 000 ₽".into(),
            "#7b1fa2",
            "ARPU * (1 / Процент оттока)",
        ),
        metric(
            "Процент оттока",
            "Процент клиентов, прекративших использование",
            "3.6%".into(),
            "#c2185b",
            "(Количество ушедших клиентов / Общее количество клиентов) * 100%",
        ),
    ]
}

fn satisfaction_metrics() -> Vec<Metric> {
    vec![
        metric(
            "NPS",
            "Индекс лояльности клиентов",
            MetricValue::from(72_i64),
            "#1976d2",
            "Процент промоутеров (9-10) - Процент критиков (0-6)",
        ),
        metric(
            "Жалобы",
            "Количество жалоб за период",
            MetricValue::from(12_i64),
            "#d32f2f",
            "Количество обращений в поддержку с жалобами за последние 30 дней",
        ),
        metric(
            "Средняя оценка",
            "Средняя оценка сервиса",
            "4.7/5".into(),
            "#2e7d32",
            "Сумма всех оценок / Количество оценок",
        ),
        metric(
            "Time to First Value",
            "Среднее время до получения ценности",
            "2.5 дн.".into(),
            "#ed6c02",
            "Среднее время от регистрации до первого успешного действия",
        ),
    ]
}

pub fn section_titles() -> Vec<SectionTitle> {
    [
        (MetricSection::Client, "Клиентские метрики"),
        (MetricSection::Financial, "Финансовые метрики"),
        (MetricSection::Satisfaction, "Метрики удовлетворенности"),
    ]
    .into_iter()
    .map(|(section, title)| SectionTitle {
        id: section.as_str().to_string(),
        title: title.to_string(),
    })
    .collect()
}

/// Monthly client counts used by the seeded charts and by new charts.
pub fn clients_over_time() -> Vec<DataRow> {
    [
        ("Янв", 800),
        ("Фев", 950),
        ("Мар", 1100),
        ("Апр", 1250),
        ("Май", 1400),
        ("Июн", 1550),
    ]
    .into_iter()
    .map(|(month, clients)| {
        let mut row = DataRow::new();
        row.insert("month".to_string(), month.into());
        row.insert("clients".to_string(), clients.into());
        row
    })
    .collect()
}

pub fn new_chart(id: String, color: &str) -> Chart {
    Chart {
        id,
        title: "Новый график".to_string(),
        chart_type: ChartType::Bar,
        data: clients_over_time(),
        data_key: "clients".to_string(),
        category_key: "month".to_string(),
        color: color.to_string(),
    }
}

pub fn charts() -> Vec<Chart> {
    vec![
        Chart {
            title: "Динамика активных клиентов".to_string(),
            ..new_chart("active-clients".to_string(), "#1976d2")
        },
        Chart {
            title: "Динамика новых клиентов".to_string(),
            chart_type: ChartType::Line,
            ..new_chart("new-clients".to_string(), "#2e7d32")
        },
    ]
}

pub fn categories() -> Vec<MetricCategory> {
    [
        ("clients", "Клиенты", MetricSection::Client),
        ("financials", "Финансы", MetricSection::Financial),
        ("satisfaction", "Удовлетворенность", MetricSection::Satisfaction),
    ]
    .into_iter()
    .map(|(id, name, section)| MetricCategory {
        id: id.to_string(),
        name: name.to_string(),
        metrics: section_metrics(section),
    })
    .collect()
}

pub fn expanded_categories() -> Vec<String> {
    categories().into_iter().map(|category| category.id).collect()
}

pub fn requirements() -> Vec<DashboardRequirement> {
    Vec::new()
}

pub fn theme() -> CustomTheme {
    CustomTheme {
        id: DEFAULT_THEME_ID.to_string(),
        name: "Стандартная".to_string(),
        colors: ThemeColors {
            primary: "#1976d2".to_string(),
            secondary: "#9c27b0".to_string(),
            background: "#f5f5f5".to_string(),
            surface: "#ffffff".to_string(),
            text: "#212121".to_string(),
        },
        is_default: true,
    }
}

pub fn themes() -> Vec<CustomTheme> {
    vec![theme()]
}

pub fn layout() -> CustomLayout {
    CustomLayout {
        id: DEFAULT_LAYOUT_ID.to_string(),
        name: "Стандартный".to_string(),
        spacing: 3,
        card_height: 140,
        columns: 4,
        border_radius: 4,
        is_default: true,
    }
}

pub fn layouts() -> Vec<CustomLayout> {
    vec![layout()]
}

pub fn templates() -> Vec<Template> {
    vec![Template {
        id: DEFAULT_TEMPLATE_ID.to_string(),
        name: "Базовый шаблон".to_string(),
        description: "Клиентские метрики и динамика клиентов".to_string(),
        metrics: client_metrics(),
        charts: charts(),
        is_default: true,
    }]
}
