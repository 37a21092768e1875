use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use std::fmt;

/// Error types for business logic validation and application errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    /// Malformed user input (400 Bad Request)
    ValidationError { field: String, message: String },
    /// Referenced resource does not exist (404 Not Found)
    NotFound { resource: String, id: String },
    /// Duplicate resource (409 Conflict)
    Duplicate { resource: String, field: String },
    /// A referenced row changed underneath the operation; safe to retry (409 Conflict)
    Integrity { resource: String, message: String },
    /// Database unreachable (503 Service Unavailable)
    ExternalServiceError { service: String, message: String },
    /// Generic application error (500 Internal Server Error)
    InternalError { message: String },
}

impl BusinessError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BusinessError::Integrity { .. } | BusinessError::ExternalServiceError { .. }
        )
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            BusinessError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            BusinessError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            BusinessError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE"),
            BusinessError::Integrity { .. } => (StatusCode::CONFLICT, "INTEGRITY_ERROR"),
            BusinessError::ExternalServiceError { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "EXTERNAL_SERVICE_ERROR")
            }
            BusinessError::InternalError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { field, message } => {
                write!(f, "Validation failed for field '{field}': {message}")
            }
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::Integrity { resource, message } => {
                write!(f, "Integrity error on {resource}: {message}")
            }
            BusinessError::ExternalServiceError { service, message } => {
                write!(f, "External service '{service}' error: {message}")
            }
            BusinessError::InternalError { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for BusinessError {}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "type": format!("{self:?}").split_whitespace().next().unwrap_or("Unknown"),
                "retryable": self.is_retryable(),
            }
        }));

        (status, body).into_response()
    }
}

/// Hooks registered with crudcrate can only return `DbErr`; validation failures travel
/// as `DbErr::Custom("Validation failed: <field> <message>")` and are parsed back by
/// [`ErrorMapper`].
impl From<BusinessError> for DbErr {
    fn from(err: BusinessError) -> Self {
        match err {
            BusinessError::ValidationError { field, message } => {
                DbErr::Custom(format!("Validation failed: {field} {message}"))
            }
            BusinessError::NotFound { resource, id } => {
                DbErr::RecordNotFound(format!("{resource} with id '{id}' not found"))
            }
            other => DbErr::Custom(other.to_string()),
        }
    }
}

pub struct ErrorMapper;

impl ErrorMapper {
    /// Map `DbErr` to a business error. `context` names the resource being operated on.
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        let resource = context.replace('_', " ");
        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource,
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::Custom(msg) => {
                if let Some(rest) = msg.strip_prefix("Validation failed:") {
                    let rest = rest.trim();
                    let (field, message) = rest.split_once(' ').unwrap_or((rest, ""));
                    BusinessError::ValidationError {
                        field: field.to_string(),
                        message: message.trim().to_string(),
                    }
                } else if let Some(field) = Self::extract_null_field(&msg) {
                    BusinessError::ValidationError {
                        field,
                        message: "is required and cannot be set to null".to_string(),
                    }
                } else {
                    BusinessError::InternalError { message: msg }
                }
            }
            DbErr::Conn(conn_err) => BusinessError::ExternalServiceError {
                service: "database".to_string(),
                message: conn_err.to_string(),
            },
            DbErr::Exec(_) | DbErr::Query(_) | DbErr::RecordNotInserted | DbErr::RecordNotUpdated => {
                let message = err.to_string();
                let lowered = message.to_lowercase();
                if lowered.contains("unique constraint") || lowered.contains("duplicate key") {
                    BusinessError::Duplicate {
                        resource,
                        field: Self::extract_field_from_constraint(&lowered),
                    }
                } else if lowered.contains("foreign key") || Self::is_contention(&lowered) {
                    BusinessError::Integrity { resource, message }
                } else {
                    BusinessError::InternalError { message }
                }
            }
            _ => BusinessError::InternalError {
                message: err.to_string(),
            },
        }
    }

    /// Pulls the id out of messages shaped like `... id 'value' ...`, falling back to
    /// the first UUID-looking word.
    fn extract_id_from_message(msg: &str) -> String {
        if let Some(start_pos) = msg.find(" id '") {
            let after_id = &msg[start_pos + 5..];
            if let Some(end_pos) = after_id.find('\'') {
                return after_id[..end_pos].to_string();
            }
        }

        msg.split_whitespace()
            .map(|word| word.trim_matches('\'').trim_matches('"'))
            .find(|word| uuid::Uuid::parse_str(word).is_ok())
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }

    /// Generated update models reject `null` for required fields with
    /// `Field '<name>' is required and cannot be set to null`.
    fn extract_null_field(msg: &str) -> Option<String> {
        let rest = msg.strip_prefix("Field '")?;
        let (field, tail) = rest.split_once('\'')?;
        tail.contains("cannot be set to null")
            .then(|| field.to_string())
    }

    /// Lock and serialization conflicts between concurrent transactions. Retrying the
    /// whole operation is safe because the failed transaction rolled back.
    fn is_contention(lowered: &str) -> bool {
        lowered.contains("database is locked")
            || lowered.contains("could not serialize access")
            || lowered.contains("deadlock detected")
    }

    fn extract_field_from_constraint(msg: &str) -> String {
        if msg.contains("username") {
            "username".to_string()
        } else if msg.contains("name") {
            "name".to_string()
        } else {
            "field".to_string()
        }
    }
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

pub type BusinessResult<T> = Result<T, BusinessError>;
