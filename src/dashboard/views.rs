use super::services::{Dashboard, build_dashboard};
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// User whose open tasks fill the personal widget
    pub user_id: Option<Uuid>,
    /// Search term matched against reagents, tasks and announcements
    pub q: Option<String>,
}

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new().route("/", get(get_dashboard).with_state(state.clone()));
    protect(router, state, Role::Employee, "dashboard")
}

#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard widgets", body = Dashboard),
        (status = 404, description = "Unknown user")
    ),
    tag = "dashboard",
    summary = "Lab dashboard",
    description = "Stock alerts, task and culture counts, ledger statistics, the caller's open tasks, the latest announcements and optional search results in one response."
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, BusinessError> {
    Ok(Json(
        build_dashboard(
            &state.db,
            query.user_id,
            query.q.as_deref(),
            chrono::Utc::now(),
        )
        .await?,
    ))
}
