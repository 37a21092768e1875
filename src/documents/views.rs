use super::models::{
    DocumentTemplate, DocumentTemplateCreate, DocumentTemplateList, DocumentTemplateUpdate,
};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::routing::{post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(
    DocumentTemplate,
    DocumentTemplateUpdate,
    DocumentTemplateCreate,
    DocumentTemplateList
);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_template).with_state(state.clone()))
        .route("/{id}", put(update_template).with_state(state.clone()));

    protect(
        mutating_router,
        state,
        Role::Employee,
        DocumentTemplate::RESOURCE_NAME_PLURAL,
    )
}

#[utoipa::path(
    post,
    path = "/document_templates",
    request_body = DocumentTemplateCreate,
    responses(
        (status = 201, description = "Template registered", body = DocumentTemplate),
        (status = 400, description = "Empty name or file URL"),
        (status = 404, description = "Uploader not found")
    ),
    tag = "document_templates",
    summary = "Register document template"
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<DocumentTemplateCreate>,
) -> Result<(StatusCode, Json<DocumentTemplate>), BusinessError> {
    let template = services::create_template(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    put,
    path = "/document_templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    request_body = DocumentTemplateUpdate,
    responses(
        (status = 200, description = "Updated template", body = DocumentTemplate),
        (status = 400, description = "Empty name or file URL"),
        (status = 404, description = "Template not found")
    ),
    tag = "document_templates",
    summary = "Update document template"
)]
pub async fn update_template(
    Path(template_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<DocumentTemplateUpdate>,
) -> Result<Json<DocumentTemplate>, BusinessError> {
    Ok(Json(
        services::update_template(&state.db, template_id, payload).await?,
    ))
}
