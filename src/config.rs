use crate::services::classroom_client::CLASSROOM_API_BASE;
use std::env;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// How the service authenticates against Google
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    /// Pre-issued bearer token (development)
    StaticToken(String),
    ServiceAccount {
        json_path: String,
        impersonated_admin: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: String,
    pub classroom_api_base: String,
    pub token_uri: String,
    pub credentials: Credentials,
    pub http_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let credentials = match get("GOOGLE_ACCESS_TOKEN") {
            Some(token) => Credentials::StaticToken(token),
            None => Credentials::ServiceAccount {
                json_path: get("GOOGLE_SERVICE_ACCOUNT_JSON_PATH").ok_or(
                    "GOOGLE_SERVICE_ACCOUNT_JSON_PATH must be set (or GOOGLE_ACCESS_TOKEN)",
                )?,
                impersonated_admin: get("GOOGLE_IMPERSONATED_ADMIN")
                    .ok_or("GOOGLE_IMPERSONATED_ADMIN must be set")?,
            },
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))?,
            None => 30,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT").unwrap_or_else(|| "3002".to_string()),
            classroom_api_base: get("CLASSROOM_API_BASE")
                .unwrap_or_else(|| CLASSROOM_API_BASE.to_string()),
            token_uri: get("GOOGLE_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            credentials,
            http_timeout_secs,
            cors_allowed_origins,
        })
    }
}
