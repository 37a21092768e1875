use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub keycloak_ui_id: String,
    pub keycloak_url: String,
    pub keycloak_realm: String,
    pub deployment: String,
    pub listen_addr: String,
    pub tests_running: bool,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let db_url = match env::var("DB_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                env::var("DB_USER").context("DB_USER must be set")?,
                env::var("DB_PASSWORD").context("DB_PASSWORD must be set")?,
                env::var("DB_HOST").context("DB_HOST must be set")?,
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").context("DB_NAME must be set")?,
            ),
        };

        Ok(Config {
            app_name: env::var("APP_NAME").context("APP_NAME must be set")?,
            keycloak_ui_id: env::var("KEYCLOAK_UI_ID").unwrap_or_default(),
            keycloak_url: env::var("KEYCLOAK_URL").unwrap_or_default(),
            keycloak_realm: env::var("KEYCLOAK_REALM").unwrap_or_default(),
            deployment: env::var("DEPLOYMENT")
                .context("DEPLOYMENT must be set, this can be local, dev, stage, or prod")?,
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            tests_running: false,
            db_url: Some(db_url),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "lab-intranet-api-test".to_string(),
            keycloak_ui_id: "test-ui".to_string(),
            keycloak_url: String::new(),
            keycloak_realm: "test-realm".to_string(),
            deployment: "test".to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            tests_running: true,
            db_url: None,
        }
    }
}
