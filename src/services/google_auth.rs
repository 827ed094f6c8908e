// ==================== GOOGLE CREDENTIALS ====================
// Service account + domain-wide delegation (impersonated admin).
// The Classroom client only asks for a bearer token; nothing else here leaks out.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const CLASSROOM_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/classroom.courses",
    "https://www.googleapis.com/auth/classroom.rosters",
    "https://www.googleapis.com/auth/classroom.coursework.students",
    "https://www.googleapis.com/auth/admin.directory.user",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, String>;
}

/// Fixed bearer token, e.g. from `GOOGLE_ACCESS_TOKEN` during development.
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, String> {
        Ok(self.0.clone())
    }
}

/// Relevant fields of a service account JSON key file
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid service account JSON: {}", e))
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read service account file {}: {}", path, e))?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    impersonated_user: String,
    token_uri: String,
    http: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        key: ServiceAccountKey,
        impersonated_user: String,
        default_token_uri: &str,
        http: reqwest::Client,
    ) -> Result<Self, String> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| format!("Invalid service account private key: {}", e))?;
        let token_uri = key
            .token_uri
            .clone()
            .unwrap_or_else(|| default_token_uri.to_string());

        Ok(Self {
            key,
            encoding_key,
            impersonated_user,
            token_uri,
            http,
            cache: Mutex::new(None),
        })
    }

    pub fn claims(&self, now: i64) -> AssertionClaims {
        build_claims(&self.key.client_email, &self.impersonated_user, &self.token_uri, now)
    }

    async fn fetch_token(&self) -> Result<CachedToken, String> {
        let now = Utc::now().timestamp();
        let assertion = encode(&Header::new(Algorithm::RS256), &self.claims(now), &self.encoding_key)
            .map_err(|e| format!("Failed to sign token assertion: {}", e))?;

        log::debug!("🔑 Requesting Google access token for {}", self.impersonated_user);

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| format!("Failed to reach token endpoint: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Token endpoint error: {} {}", status, body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse token response: {}", e))?;

        log::info!("✅ Google access token obtained (expires in {}s)", token.expires_in);

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, String> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now().timestamp();

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at - REFRESH_MARGIN_SECS > now {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

pub fn build_claims(client_email: &str, subject: &str, token_uri: &str, now: i64) -> AssertionClaims {
    AssertionClaims {
        iss: client_email.to_string(),
        sub: subject.to_string(),
        scope: CLASSROOM_SCOPES.join(" "),
        aud: token_uri.to_string(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    }
}
