use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/title", put(handlers::set_title))
        .route(
            "/api/sections/:section/metrics",
            post(handlers::add_section_metric),
        )
        .route(
            "/api/sections/:section/metrics/:index",
            patch(handlers::update_section_metric).delete(handlers::delete_section_metric),
        )
        .route("/api/sections/:section/title", put(handlers::rename_section))
        .route("/api/charts", post(handlers::add_chart))
        .route(
            "/api/charts/:id",
            patch(handlers::update_chart).delete(handlers::delete_chart),
        )
        .route("/api/categories", post(handlers::add_category))
        .route(
            "/api/categories/:id",
            patch(handlers::rename_category).delete(handlers::delete_category),
        )
        .route("/api/categories/:id/toggle", post(handlers::toggle_category))
        .route(
            "/api/categories/:id/metrics",
            post(handlers::add_category_metric),
        )
        .route(
            "/api/categories/:id/metrics/:index",
            patch(handlers::update_category_metric).delete(handlers::delete_category_metric),
        )
        .route("/api/requirements", post(handlers::add_requirement))
        .route(
            "/api/requirements/:id",
            patch(handlers::update_requirement).delete(handlers::delete_requirement),
        )
        .route(
            "/api/requirements/:id/editing",
            put(handlers::set_requirement_editing),
        )
        .route("/api/themes", post(handlers::add_theme))
        .route(
            "/api/themes/:id",
            patch(handlers::update_theme).delete(handlers::delete_theme),
        )
        .route("/api/themes/:id/apply", post(handlers::apply_theme))
        .route("/api/layouts", post(handlers::add_layout))
        .route(
            "/api/layouts/:id",
            patch(handlers::update_layout).delete(handlers::delete_layout),
        )
        .route("/api/layouts/:id/apply", post(handlers::apply_layout))
        .route("/api/templates", post(handlers::save_template))
        .route("/api/templates/:id", delete(handlers::delete_template))
        .route("/api/templates/:id/apply", post(handlers::apply_template))
        .route("/api/edit", get(handlers::get_edit))
        .route("/api/edit/open", post(handlers::open_edit))
        .route("/api/edit/draft", put(handlers::set_draft))
        .route("/api/edit/metric", put(handlers::set_metric_draft))
        .route("/api/edit/commit", post(handlers::commit_edit))
        .route("/api/edit/cancel", post(handlers::cancel_edit))
        .route("/api/export", get(handlers::export_dashboard))
        .route("/api/export/pages", post(handlers::plan_export_pages))
        .route("/api/import", post(handlers::import_dashboard))
        .with_state(state)
}
