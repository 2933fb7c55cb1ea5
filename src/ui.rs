use crate::models::{Chart, ChartType, DashboardRequirement, Metric, MetricSection};
use crate::store::EntityStore;

pub fn render_index(store: &EntityStore) -> String {
    let theme = &store.current_theme().colors;
    let layout = store.current_layout();
    INDEX_HTML
        .replace("{{TITLE}}", &escape(store.title()))
        .replace("{{PRIMARY}}", &escape(&theme.primary))
        .replace("{{BACKGROUND}}", &escape(&theme.background))
        .replace("{{SURFACE}}", &escape(&theme.surface))
        .replace("{{TEXT}}", &escape(&theme.text))
        .replace("{{COLUMNS}}", &layout.columns.max(1).to_string())
        .replace("{{CARD_HEIGHT}}", &layout.card_height.to_string())
        .replace("{{RADIUS}}", &layout.border_radius.to_string())
        .replace("{{SECTIONS}}", &render_sections(store))
        .replace("{{CHARTS}}", &render_charts(store.charts()))
        .replace("{{REQUIREMENTS}}", &render_requirements(store.requirements()))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_sections(store: &EntityStore) -> String {
    let mut html = String::new();
    for section in MetricSection::ALL {
        let title = store
            .section_title(section.as_str())
            .map(|title| title.title.as_str())
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<section class="metrics"><h2>{}</h2><div class="grid">"#,
            escape(title)
        ));
        for (index, metric) in store.section_metrics(section).iter().enumerate() {
            html.push_str(&render_metric(section, index, metric));
        }
        html.push_str("</div></section>");
    }
    html
}

fn render_metric(section: MetricSection, index: usize, metric: &Metric) -> String {
    format!(
        r#"<article class="card" style="background:{color}" title="{calculation}">
  <button class="delete" data-section="{section}" data-index="{index}" aria-label="delete">×</button>
  <h3>{title}</h3>
  <p class="value">{value}</p>
  <p class="description">{description}</p>
</article>"#,
        color = escape(&metric.color),
        calculation = escape(&metric.calculation),
        section = section.as_str(),
        title = escape(&metric.title),
        value = escape(&metric.value.to_string()),
        description = escape(&metric.description),
    )
}

fn render_charts(charts: &[Chart]) -> String {
    let mut html = String::new();
    for chart in charts {
        html.push_str(&format!(
            r#"<article class="chart"><header><h3>{}</h3><span class="kind">{}</span></header>"#,
            escape(&chart.title),
            chart.chart_type.as_str()
        ));
        if chart.chart_type == ChartType::Table {
            html.push_str(r#"<p class="placeholder">Табличное представление не поддерживается</p>"#);
        } else {
            html.push_str(&render_bars(chart));
        }
        html.push_str("</article>");
    }
    html
}

fn render_bars(chart: &Chart) -> String {
    let series = chart.series();
    let peak = series
        .iter()
        .filter_map(|point| point.value)
        .fold(0.0_f64, f64::max);
    let mut html = String::from(r#"<div class="bars">"#);
    for point in &series {
        let share = match point.value {
            Some(value) if peak > 0.0 => (value / peak * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        };
        html.push_str(&format!(
            r#"<div class="bar"><span class="fill" style="height:{share:.1}%;background:{color}"></span><span class="label">{label}</span></div>"#,
            color = escape(&chart.color),
            label = escape(&point.label),
        ));
    }
    html.push_str("</div>");
    html
}

fn render_requirements(requirements: &[DashboardRequirement]) -> String {
    if requirements.is_empty() {
        return r#"<p class="placeholder">Требований пока нет</p>"#.to_string();
    }
    let mut html = String::from("<ul>");
    for requirement in requirements {
        let status = serde_json::to_value(requirement.status)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<li class="{status}"><strong>{}</strong><span>{}</span></li>"#,
            escape(&requirement.title),
            escape(&requirement.description),
        ));
    }
    html.push_str("</ul>");
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --primary: {{PRIMARY}};
      --bg: {{BACKGROUND}};
      --surface: {{SURFACE}};
      --ink: {{TEXT}};
      --radius: {{RADIUS}}px;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Roboto", "Helvetica", sans-serif;
      display: grid;
      grid-template-columns: minmax(0, 1fr) 300px;
      gap: 24px;
      padding: 32px;
    }

    header.top {
      grid-column: 1 / -1;
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 3vw, 2.4rem);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat({{COLUMNS}}, minmax(0, 1fr));
      gap: 16px;
    }

    .card {
      position: relative;
      height: {{CARD_HEIGHT}}px;
      border-radius: var(--radius);
      padding: 16px;
      color: white;
      display: flex;
      flex-direction: column;
    }

    .card h3 {
      margin: 0 0 4px;
      font-size: 1.05rem;
    }

    .card .value {
      margin: 0;
      font-size: 1.9rem;
      font-weight: 600;
    }

    .card .description {
      margin: auto 0 0;
      font-size: 0.85rem;
      opacity: 0.85;
    }

    .card .delete {
      position: absolute;
      top: 6px;
      right: 8px;
      border: none;
      background: transparent;
      color: white;
      font-size: 1.1rem;
      cursor: pointer;
      opacity: 0;
      transition: opacity 150ms ease;
    }

    .card:hover .delete {
      opacity: 1;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
      margin-top: 24px;
    }

    .chart {
      background: var(--surface);
      border-radius: var(--radius);
      padding: 16px;
    }

    .chart header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    .chart h3 {
      margin: 0;
    }

    .chart .kind {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      opacity: 0.6;
    }

    .bars {
      display: flex;
      align-items: flex-end;
      gap: 8px;
      height: 180px;
      margin-top: 16px;
    }

    .bar {
      flex: 1;
      height: 100%;
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
      gap: 6px;
    }

    .bar .fill {
      width: 100%;
      border-radius: 4px 4px 0 0;
    }

    .bar .label {
      font-size: 0.75rem;
    }

    aside {
      background: var(--surface);
      border-radius: var(--radius);
      padding: 16px;
      align-self: start;
    }

    aside ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    aside li {
      display: grid;
      gap: 4px;
      border-left: 3px solid var(--primary);
      padding-left: 10px;
    }

    aside li.completed {
      opacity: 0.55;
    }

    .placeholder {
      opacity: 0.6;
    }

    button.add {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      background: var(--primary);
      color: white;
      font-weight: 600;
      cursor: pointer;
    }
  </style>
</head>
<body>
  <header class="top">
    <h1>{{TITLE}}</h1>
    <div>
      <button class="add" id="add-chart">+ График</button>
      <a class="add" href="/api/export" download>Экспорт</a>
    </div>
  </header>
  <main>
    {{SECTIONS}}
    <div class="charts">{{CHARTS}}</div>
  </main>
  <aside>
    <h2>Требования</h2>
    {{REQUIREMENTS}}
  </aside>
  <script>
    document.querySelectorAll('.card .delete').forEach((button) => {
      button.addEventListener('click', async (event) => {
        event.stopPropagation();
        const { section, index } = button.dataset;
        await fetch(`/api/sections/${section}/metrics/${index}`, { method: 'DELETE' });
        window.location.reload();
      });
    });

    document.getElementById('add-chart').addEventListener('click', async () => {
      await fetch('/api/charts', { method: 'POST' });
      window.location.reload();
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_escapes_user_text() {
        let mut store = EntityStore::new();
        store.set_title("<script>alert(1)</script>");
        let html = render_index(&store);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn table_charts_render_placeholder() {
        let mut store = EntityStore::new();
        store
            .update_chart("active-clients", crate::fields::ChartField::Type, "table")
            .unwrap();
        let html = render_charts(&store.charts()[..1]);
        assert!(html.contains("Табличное представление не поддерживается"));
        assert!(!html.contains("Янв"));

        let html = render_charts(&store.charts()[1..]);
        assert!(html.contains("Янв"));
    }

    #[test]
    fn sections_and_requirements_are_rendered() {
        let mut store = EntityStore::new();
        store.add_requirement(crate::store::NewRequirement {
            title: "Экспорт <PDF>".to_string(),
            description: "по дате".to_string(),
            category: crate::models::RequirementCategory::Visualization,
            priority: crate::models::Priority::High,
        });
        let html = render_index(&store);

        for section in MetricSection::ALL {
            let title = &store.section_title(section.as_str()).unwrap().title;
            assert!(html.contains(&format!("<h2>{}</h2>", escape(title))));
        }
        assert!(html.contains(r#"<li class="pending"><strong>Экспорт &lt;PDF&gt;</strong><span>по дате</span></li>"#));
        assert!(!html.contains("Требований пока нет"));
    }
}
