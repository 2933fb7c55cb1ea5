use crate::api::{
    ChangedResponse, CreatedResponse, DashboardView, DraftRequest, EditingRequest,
    ExpandedResponse, FieldUpdate, MetricDraftRequest, NameRequest, NewTemplateRequest,
    NewThemeRequest, PagesRequest, TitleRequest,
};
use crate::errors::AppError;
use crate::fields::{ChartField, LayoutField, MetricField, RequirementField, ThemeField};
use crate::models::{MetricSection, SectionTitle};
use crate::paginate::{plan_pages, PagePlan};
use crate::session::{EditTarget, MetricDraft, SessionState};
use crate::state::AppState;
use crate::store::{NewLayout, NewRequirement};
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

fn section(value: &str) -> Result<MetricSection, AppError> {
    MetricSection::parse(value).ok_or_else(|| AppError::not_found(format!("section '{value}' not found")))
}

fn created(id: String) -> (StatusCode, Json<CreatedResponse>) {
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

fn changed(changed: bool) -> Json<ChangedResponse> {
    Json(ChangedResponse { changed })
}

fn new_metric(draft: MetricDraft) -> Result<crate::models::Metric, AppError> {
    Ok(draft.with_defaults().build()?)
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(dashboard.store()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let dashboard = state.dashboard.lock().await;
    Json(DashboardView::build(&*dashboard))
}

pub async fn set_title(
    State(state): State<AppState>,
    Json(payload): Json<TitleRequest>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.set_title(payload.title)))
}

// Section metrics

pub async fn add_section_metric(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Json(draft): Json<MetricDraft>,
) -> Result<(StatusCode, Json<ChangedResponse>), AppError> {
    let section = section(&section_id)?;
    let metric = new_metric(draft)?;
    let mut dashboard = state.dashboard.lock().await;
    dashboard.update(|store| store.add_section_metric(section, metric));
    Ok((StatusCode::CREATED, changed(true)))
}

pub async fn update_section_metric(
    State(state): State<AppState>,
    Path((section_id, index)): Path<(String, usize)>,
    Json(payload): Json<FieldUpdate<MetricField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let section = section(&section_id)?;
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard
        .update(|store| store.update_section_metric(section, index, payload.field, &payload.value))?;
    Ok(changed(result))
}

pub async fn delete_section_metric(
    State(state): State<AppState>,
    Path((section_id, index)): Path<(String, usize)>,
) -> Result<Json<ChangedResponse>, AppError> {
    let section = section(&section_id)?;
    let mut dashboard = state.dashboard.lock().await;
    let removed = dashboard.update(|store| store.remove_section_metric(section, index));
    Ok(changed(removed.is_some()))
}

pub async fn rename_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<SectionTitle>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.update(|store| store.rename_section(&section_id, &payload.title));
    dashboard
        .store()
        .section_title(&section_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("section '{section_id}' not found")))
}

// Charts

pub async fn add_chart(State(state): State<AppState>) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.add_chart()))
}

pub async fn update_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
    Json(payload): Json<FieldUpdate<ChartField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard.update(|store| store.update_chart(&chart_id, payload.field, &payload.value))?;
    Ok(changed(result))
}

pub async fn delete_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.remove_chart(&chart_id)).is_some())
}

// Categories

pub async fn add_category(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.add_category(&payload.name)))
}

pub async fn rename_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(payload): Json<NameRequest>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.rename_category(&category_id, &payload.name)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.remove_category(&category_id)).is_some())
}

pub async fn toggle_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<ExpandedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard
        .update(|store| store.toggle_category(&category_id))
        .map(|expanded| Json(ExpandedResponse { expanded }))
        .ok_or_else(|| AppError::not_found(format!("category '{category_id}' not found")))
}

pub async fn add_category_metric(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(draft): Json<MetricDraft>,
) -> Result<(StatusCode, Json<ChangedResponse>), AppError> {
    let metric = new_metric(draft)?;
    let mut dashboard = state.dashboard.lock().await;
    if dashboard.update(|store| store.add_category_metric(&category_id, metric)) {
        Ok((StatusCode::CREATED, changed(true)))
    } else {
        Err(AppError::not_found(format!("category '{category_id}' not found")))
    }
}

pub async fn update_category_metric(
    State(state): State<AppState>,
    Path((category_id, index)): Path<(String, usize)>,
    Json(payload): Json<FieldUpdate<MetricField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard.update(|store| {
        store.update_category_metric(&category_id, index, payload.field, &payload.value)
    })?;
    Ok(changed(result))
}

pub async fn delete_category_metric(
    State(state): State<AppState>,
    Path((category_id, index)): Path<(String, usize)>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(
        dashboard
            .update(|store| store.remove_category_metric(&category_id, index))
            .is_some(),
    )
}

// Requirements

pub async fn add_requirement(
    State(state): State<AppState>,
    Json(payload): Json<NewRequirement>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.add_requirement(payload)))
}

pub async fn update_requirement(
    State(state): State<AppState>,
    Path(requirement_id): Path<String>,
    Json(payload): Json<FieldUpdate<RequirementField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard
        .update(|store| store.update_requirement(&requirement_id, payload.field, &payload.value))?;
    Ok(changed(result))
}

pub async fn set_requirement_editing(
    State(state): State<AppState>,
    Path(requirement_id): Path<String>,
    Json(payload): Json<EditingRequest>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.set_requirement_editing(&requirement_id, payload.editing)))
}

pub async fn delete_requirement(
    State(state): State<AppState>,
    Path(requirement_id): Path<String>,
) -> Json<ChangedResponse> {
    let mut dashboard = state.dashboard.lock().await;
    changed(dashboard.update(|store| store.remove_requirement(&requirement_id)).is_some())
}

// Themes, layouts, templates

pub async fn add_theme(
    State(state): State<AppState>,
    Json(payload): Json<NewThemeRequest>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.add_theme(&payload.name, payload.colors)))
}

pub async fn update_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
    Json(payload): Json<FieldUpdate<ThemeField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard.update(|store| store.update_theme(&theme_id, payload.field, &payload.value))?;
    Ok(changed(result))
}

pub async fn delete_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let removed = dashboard.update(|store| store.remove_theme(&theme_id))?;
    Ok(changed(removed.is_some()))
}

pub async fn apply_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.update(|store| store.apply_theme(&theme_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_layout(
    State(state): State<AppState>,
    Json(payload): Json<NewLayout>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.add_layout(payload)))
}

pub async fn update_layout(
    State(state): State<AppState>,
    Path(layout_id): Path<String>,
    Json(payload): Json<FieldUpdate<LayoutField>>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard.update(|store| store.update_layout(&layout_id, payload.field, &payload.value))?;
    Ok(changed(result))
}

pub async fn delete_layout(
    State(state): State<AppState>,
    Path(layout_id): Path<String>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let removed = dashboard.update(|store| store.remove_layout(&layout_id))?;
    Ok(changed(removed.is_some()))
}

pub async fn apply_layout(
    State(state): State<AppState>,
    Path(layout_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.update(|store| store.apply_layout(&layout_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_template(
    State(state): State<AppState>,
    Json(payload): Json<NewTemplateRequest>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    created(dashboard.update(|store| store.save_template(&payload.name, &payload.description)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let removed = dashboard.update(|store| store.remove_template(&template_id))?;
    Ok(changed(removed.is_some()))
}

pub async fn apply_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let category_id = dashboard.update(|store| store.apply_template(&template_id))?;
    Ok(created(category_id))
}

// Edit session

pub async fn get_edit(State(state): State<AppState>) -> Json<SessionState> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.session().state().clone())
}

pub async fn open_edit(
    State(state): State<AppState>,
    Json(target): Json<EditTarget>,
) -> Result<Json<SessionState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.open_edit(target)?;
    Ok(Json(dashboard.session().state().clone()))
}

pub async fn set_draft(
    State(state): State<AppState>,
    Json(payload): Json<DraftRequest>,
) -> Result<Json<SessionState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_draft(payload.text)?;
    Ok(Json(dashboard.session().state().clone()))
}

pub async fn set_metric_draft(
    State(state): State<AppState>,
    Json(payload): Json<MetricDraftRequest>,
) -> Result<Json<SessionState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_metric_field(payload.field, &payload.value)?;
    Ok(Json(dashboard.session().state().clone()))
}

pub async fn commit_edit(State(state): State<AppState>) -> Result<Json<ChangedResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    Ok(changed(dashboard.commit_edit()?))
}

pub async fn cancel_edit(State(state): State<AppState>) -> StatusCode {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.cancel_edit();
    StatusCode::NO_CONTENT
}

// Transfer

pub async fn export_dashboard(State(state): State<AppState>) -> Result<Response, AppError> {
    let dashboard = state.dashboard.lock().await;
    let file = dashboard.export_snapshot()?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

pub async fn import_dashboard(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<DashboardView>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.import_snapshot(&body)?;
    Ok(Json(DashboardView::build(&*dashboard)))
}

pub async fn plan_export_pages(Json(payload): Json<PagesRequest>) -> Result<Json<PagePlan>, AppError> {
    Ok(Json(plan_pages(payload.page, payload.metrics, payload.charts)?))
}
