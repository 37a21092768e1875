use crate::common::state::AppState;
use axum_keycloak_auth::{PassthroughMode, layer::KeycloakAuthLayer};
use utoipa_axum::router::OpenApiRouter;

/// Realm roles issued by the identity provider.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Role {
    Employee,
    LabHead,
    Sysadmin,
    Unknown(String),
}

impl axum_keycloak_auth::role::Role for Role {}

/// Wraps a resource router in a Keycloak layer requiring `role`. Without a configured
/// Keycloak instance the router is returned as is.
pub fn protect(
    router: OpenApiRouter,
    state: &AppState,
    role: Role,
    resource_name: &str,
) -> OpenApiRouter {
    if let Some(instance) = state.keycloak_auth_instance.clone() {
        router.layer(
            KeycloakAuthLayer::<Role>::builder()
                .instance(instance)
                .passthrough_mode(PassthroughMode::Block)
                .persist_raw_claims(false)
                .expected_audiences(vec![String::from("account")])
                .required_roles(vec![role])
                .build(),
        )
    } else {
        if !state.config.tests_running {
            tracing::warn!("Mutating routes of {resource_name} router are not protected");
        }
        router
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Employee => f.write_str("employee"),
            Role::LabHead => f.write_str("lab_head"),
            Role::Sysadmin => f.write_str("sysadmin"),
            Role::Unknown(unknown) => f.write_fmt(format_args!("Unknown role: {unknown}")),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "employee" => Role::Employee,
            "lab_head" => Role::LabHead,
            "sysadmin" => Role::Sysadmin,
            _ => Role::Unknown(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_round_trip_through_strings() {
        for role in [Role::Employee, Role::LabHead, Role::Sysadmin] {
            assert_eq!(Role::from(role.to_string()), role);
        }
    }

    #[test]
    fn test_unrecognised_role_is_kept() {
        let role = Role::from("facility-admin".to_string());
        assert_eq!(role, Role::Unknown("facility-admin".to_string()));
        assert!(role.to_string().contains("facility-admin"));
    }
}
