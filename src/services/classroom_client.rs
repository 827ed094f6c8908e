use crate::models::{Invitation, Role};
use crate::services::google_auth::AccessTokenProvider;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const CLASSROOM_API_BASE: &str = "https://classroom.googleapis.com";

/// Closed set of failures the Classroom API can report back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The relationship already exists (HTTP 409 / ALREADY_EXISTS)
    Conflict(String),
    NotFound(String),
    /// Any other error response from the API
    Api { status: u16, message: String },
    /// Network, credential or decoding failure
    Transport(String),
}

impl ProviderError {
    pub fn message(&self) -> &str {
        match self {
            ProviderError::Conflict(msg)
            | ProviderError::NotFound(msg)
            | ProviderError::Api { message: msg, .. }
            | ProviderError::Transport(msg) => msg,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Api { status, message } => write!(f, "{} ({})", message, status),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ProviderError {}

/// The three Classroom operations enrollment depends on.
#[async_trait]
pub trait ClassroomProvider: Send + Sync {
    async fn add_teacher(&self, course_id: &str, email: &str) -> Result<(), ProviderError>;

    async fn create_invitation(
        &self,
        course_id: &str,
        email: &str,
        role: Role,
    ) -> Result<Invitation, ProviderError>;

    async fn get_invitation(&self, id: &str) -> Result<Invitation, ProviderError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeacherBody<'a> {
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvitationBody<'a> {
    course_id: &'a str,
    user_id: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Classroom REST client (v1)
pub struct GoogleClassroomClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AccessTokenProvider>,
}

impl GoogleClassroomClient {
    pub fn new(http: reqwest::Client, base_url: &str, auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(ProviderError::Transport)?;

        let response = request
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to reach Classroom API: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }

    async fn read_invitation(response: reqwest::Response) -> Result<Invitation, ProviderError> {
        response
            .json::<Invitation>()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to parse invitation: {}", e)))
    }
}

#[async_trait]
impl ClassroomProvider for GoogleClassroomClient {
    async fn add_teacher(&self, course_id: &str, email: &str) -> Result<(), ProviderError> {
        let url = format!(
            "{}/v1/courses/{}/teachers",
            self.base_url,
            urlencoding::encode(course_id)
        );
        log::debug!("👩‍🏫 POST {} ({})", url, email);

        self.send(self.http.post(&url).json(&TeacherBody { user_id: email }))
            .await?;
        Ok(())
    }

    async fn create_invitation(
        &self,
        course_id: &str,
        email: &str,
        role: Role,
    ) -> Result<Invitation, ProviderError> {
        let url = format!("{}/v1/invitations", self.base_url);
        log::debug!("✉️ POST {} ({} as {})", url, email, role.as_str());

        let body = InvitationBody {
            course_id,
            user_id: email,
            role: role.as_str(),
        };
        let response = self.send(self.http.post(&url).json(&body)).await?;
        Self::read_invitation(response).await
    }

    async fn get_invitation(&self, id: &str) -> Result<Invitation, ProviderError> {
        let url = format!("{}/v1/invitations/{}", self.base_url, urlencoding::encode(id));
        log::debug!("🔍 GET {}", url);

        let response = self.send(self.http.get(&url)).await?;
        Self::read_invitation(response).await
    }
}

/// Maps an error response to a `ProviderError`, preferring the Google error envelope message.
pub fn classify_error(status: StatusCode, body: &str) -> ProviderError {
    let parsed = serde_json::from_str::<GoogleErrorEnvelope>(body).ok();
    let api_status = parsed.as_ref().and_then(|e| e.error.status.clone());
    let message = parsed
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Classroom API error: {}", status));

    match (status, api_status.as_deref()) {
        (StatusCode::CONFLICT, _) | (_, Some("ALREADY_EXISTS")) => ProviderError::Conflict(message),
        (StatusCode::NOT_FOUND, _) | (_, Some("NOT_FOUND")) => ProviderError::NotFound(message),
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::google_auth::StaticToken;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> GoogleClassroomClient {
        GoogleClassroomClient::new(
            reqwest::Client::new(),
            &server.base_url(),
            Arc::new(StaticToken("test-token".into())),
        )
    }

    #[test]
    fn test_classify_error() {
        let body = r#"{"error":{"code":409,"message":"Requested entity already exists","status":"ALREADY_EXISTS"}}"#;
        assert_eq!(
            classify_error(StatusCode::CONFLICT, body),
            ProviderError::Conflict("Requested entity already exists".into())
        );

        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, ""),
            ProviderError::NotFound(_)
        ));

        match classify_error(StatusCode::FORBIDDEN, "<html>") {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("403"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_invitation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/invitations")
                    .header("authorization", "Bearer test-token")
                    .json_body(serde_json::json!({
                        "courseId": "123",
                        "userId": "s1@x.com",
                        "role": "STUDENT"
                    }));
                then.status(200).json_body(serde_json::json!({
                    "id": "inv-1",
                    "courseId": "123",
                    "userId": "s1@x.com",
                    "role": "STUDENT"
                }));
            })
            .await;

        let invitation = client_for(&server)
            .create_invitation("123", "s1@x.com", Role::Student)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(invitation.id, "inv-1");
        assert_eq!(invitation.course_id, "123");
    }

    #[tokio::test]
    async fn test_add_teacher_conflict() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/courses/123/teachers")
                    .json_body(serde_json::json!({ "userId": "t1@x.com" }));
                then.status(409).json_body(serde_json::json!({
                    "error": { "code": 409, "message": "Already a teacher", "status": "ALREADY_EXISTS" }
                }));
            })
            .await;

        let result = client_for(&server).add_teacher("123", "t1@x.com").await;
        assert_eq!(result, Err(ProviderError::Conflict("Already a teacher".into())));
    }

    #[tokio::test]
    async fn test_get_invitation_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/invitations/missing");
                then.status(404).json_body(serde_json::json!({
                    "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" }
                }));
            })
            .await;

        let result = client_for(&server).get_invitation("missing").await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
    }
}
