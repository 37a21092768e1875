use super::models::{User, router as crudrouter};
use crate::common::auth::{Role, protect};
use crate::common::state::AppState;
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    protect(
        crudrouter(&state.db.clone()),
        state,
        Role::Sysadmin,
        User::RESOURCE_NAME_PLURAL,
    )
}
