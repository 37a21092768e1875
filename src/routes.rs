use crate::common::state::AppState;
use crate::config::Config;
use crate::{
    announcements, calendar_events, culture_events, cultures, dashboard, documents,
    reagent_movements, reagents, recipes, task_comments, tasks, users,
};
use anyhow::Context;
use axum::{Router, extract::DefaultBodyLimit};
use axum_keycloak_auth::{Url, instance::KeycloakAuthInstance, instance::KeycloakConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// JSON payloads only; nothing here accepts uploads.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

fn keycloak_instance(config: &Config) -> anyhow::Result<Option<Arc<KeycloakAuthInstance>>> {
    if config.keycloak_url.is_empty() {
        return Ok(None);
    }

    let server = Url::parse(&config.keycloak_url)
        .with_context(|| format!("Invalid KEYCLOAK_URL '{}'", config.keycloak_url))?;

    Ok(Some(Arc::new(KeycloakAuthInstance::new(
        KeycloakConfig::builder()
            .server(server)
            .realm(String::from(&config.keycloak_realm))
            .build(),
    ))))
}

pub fn build_router(db: &DatabaseConnection, config: &Config) -> anyhow::Result<Router> {
    #[derive(OpenApi)]
    #[openapi(
        modifiers(&SecurityAddon),
        security(
            ("bearerAuth" = [])
        )
    )]
    struct ApiDoc;

    struct SecurityAddon;

    impl utoipa::Modify for SecurityAddon {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            if let Some(components) = openapi.components.as_mut() {
                components.add_security_scheme(
                    "bearerAuth",
                    utoipa::openapi::security::SecurityScheme::Http(
                        utoipa::openapi::security::HttpBuilder::new()
                            .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }
    }

    let app_state = AppState::new(db.clone(), config.clone(), keycloak_instance(config)?);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .nest("/api/users", users::views::router(&app_state))
        .nest("/api/reagents", reagents::views::router(&app_state))
        .nest(
            "/api/reagent_movements",
            reagent_movements::views::router(&app_state),
        )
        .nest("/api/tasks", tasks::views::router(&app_state))
        .nest(
            "/api/task_comments",
            task_comments::views::router(&app_state),
        )
        .nest(
            "/api/announcements",
            announcements::views::router(&app_state),
        )
        .nest("/api/recipes", recipes::views::router(&app_state))
        .nest("/api/cultures", cultures::views::router(&app_state))
        .nest(
            "/api/culture_events",
            culture_events::views::router(&app_state),
        )
        .nest(
            "/api/calendar_events",
            calendar_events::views::router(&app_state),
        )
        .nest(
            "/api/document_templates",
            documents::views::router(&app_state),
        )
        .nest("/api/dashboard", dashboard::views::router(&app_state))
        .split_for_parts();

    Ok(router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)))
}
