use super::models::{Announcement, AnnouncementList, router as crudrouter};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::models::PageParams;
use crate::common::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    let mutating_router = crudrouter(&state.db.clone())
        .route("/pinned", get(get_pinned).with_state(state.clone()))
        .route("/feed", get(get_feed).with_state(state.clone()));

    protect(
        mutating_router,
        state,
        Role::Employee,
        Announcement::RESOURCE_NAME_PLURAL,
    )
}

#[utoipa::path(
    get,
    path = "/announcements/pinned",
    responses(
        (status = 200, description = "Pinned announcements, newest first", body = Vec<AnnouncementList>)
    ),
    tag = "announcements",
    summary = "List pinned announcements"
)]
pub async fn get_pinned(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementList>>, BusinessError> {
    Ok(Json(services::pinned(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/announcements/feed",
    params(PageParams),
    responses(
        (status = 200, description = "Pinned announcements first, then newest", body = Vec<AnnouncementList>)
    ),
    tag = "announcements",
    summary = "Announcement feed"
)]
pub async fn get_feed(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<AnnouncementList>>, BusinessError> {
    Ok(Json(services::feed(&state.db, page.limit(), page.offset()).await?))
}
