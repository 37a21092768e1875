use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::config::Config;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Deserialize, Serialize, Default)]
pub struct UIConfiguration {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub realm: String,
    pub url: String,
    pub deployment: String,
}

impl UIConfiguration {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client_id: config.keycloak_ui_id.clone(),
            realm: config.keycloak_realm.clone(),
            url: config.keycloak_url.clone(),
            deployment: config.deployment.clone(),
        }
    }
}

#[derive(ToSchema, Deserialize, Serialize)]
pub struct HealthCheck {
    pub status: String,
}

/// Pagination shared by the hand-written list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageParams {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// `lower(column) LIKE '%needle%'`, so matching ignores case on every backend.
pub fn icontains<C: IntoColumnRef>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

/// `NotFound` for `resource` unless a row of `E` has this id.
pub async fn ensure_exists<E, C>(db: &C, id: Uuid, resource: &str) -> BusinessResult<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    E::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(resource))?
        .map(|_| ())
        .ok_or_else(|| crate::not_found!(resource, id))
}

/// Checks an optional reference to a staff account.
pub async fn ensure_user<C: ConnectionTrait>(db: &C, user_id: Option<Uuid>) -> BusinessResult<()> {
    match user_id {
        Some(id) => ensure_exists::<crate::users::models::Entity, C>(db, id, "user").await,
        None => Ok(()),
    }
}
