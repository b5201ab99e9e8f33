//! HTTP client for the judge backend.
//!
//! Every request carries `Authorization: Bearer <token>` while a session is
//! present. Responses are classified by [`classify`]; an unauthorized answer
//! clears the session so the next navigation is sent to the sign-in page.

mod envelope;

pub use envelope::ApiEnvelope;
pub use envelope::DEFAULT_FAILURE_MESSAGE;
pub use envelope::EnvelopeClass;
pub use envelope::JUDGING_IN_PROGRESS;
pub use envelope::classify;

use crate::session::SessionError;
use crate::session::SessionStore;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root. Request paths are joined below its path, so
    /// `http://host/judge` serves `/api/x` from `http://host/judge/api/x`.
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct JudgeClient {
    http: Client,
    base_url: Url,
    session: SessionStore,
}

impl JudgeClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiEnvelope, ApiError> {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiEnvelope, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(Method::POST, path, request).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<ApiEnvelope, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiEnvelope, ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(Method::DELETE, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let mut request = self.http.request(method, url);
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope, ApiError> {
        debug!(%method, path, "sending request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return judging_or(err),
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return judging_or(err),
        };

        let envelope = if body.is_empty() {
            ApiEnvelope::default()
        } else {
            match serde_json::from_slice::<ApiEnvelope>(&body) {
                Ok(envelope) => envelope,
                Err(err) if status.is_success() => return Err(ApiError::Decode(err)),
                Err(_) => ApiEnvelope {
                    message: Some(String::from_utf8_lossy(&body).into_owned()),
                    ..ApiEnvelope::default()
                },
            }
        };

        if !status.is_success() && envelope.is_judging_in_progress() {
            debug!(%status, path, "judging in progress reported as error");
            let message = envelope.message.unwrap_or_default();
            return Ok(ApiEnvelope::judging_placeholder(message));
        }

        match classify(status.as_u16(), &envelope) {
            EnvelopeClass::Success => Ok(envelope),
            EnvelopeClass::Unauthorized(message) => {
                let cleared = self.session.logout()?;
                warn!(%method, path, cleared, "session rejected by backend");
                Err(ApiError::Unauthorized(message))
            }
            EnvelopeClass::Failure(message) => {
                debug!(%status, path, %message, "request rejected");
                Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn judging_or(err: reqwest::Error) -> Result<ApiEnvelope, ApiError> {
    let message = err.to_string();
    if message.contains(JUDGING_IN_PROGRESS) {
        return Ok(ApiEnvelope::judging_placeholder(message));
    }
    warn!(error = %err, "request failed");
    Err(ApiError::Http(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserRecord;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::body_json;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::matchers::query_param;

    fn client(server: &MockServer, session: SessionStore) -> JudgeClient {
        let config = ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        JudgeClient::new(&config, session).expect("client")
    }

    fn signed_in() -> SessionStore {
        let session = SessionStore::in_memory();
        session
            .login(UserRecord::new(7, "alice", 0), "tok-123\r\n")
            .expect("login");
        session
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/problems"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "problems": [{"id": 1}],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server, signed_in())
            .get("/api/problems", &[("page", "2")])
            .await
            .expect("problems");
        assert_eq!(envelope.get("problems"), Some(&json!([{"id": 1}])));
        server.verify().await;
    }

    #[tokio::test]
    async fn anonymous_requests_have_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .mount(&server)
            .await;

        client(&server, SessionStore::in_memory())
            .get("/api/leaderboard", &[])
            .await
            .expect("leaderboard");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn unauthorized_response_clears_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"status": "error", "message": "token expired"})),
            )
            .mount(&server)
            .await;

        let session = signed_in();
        let err = client(&server, session.clone())
            .get("/api/user/profile", &[])
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Unauthorized(message) if message == "token expired");
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer_token(), None);
    }

    #[tokio::test]
    async fn body_code_401_is_unauthorized_too() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/problems/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 401})))
            .mount(&server)
            .await;

        let session = signed_in();
        let err = client(&server, session.clone())
            .delete("/api/problems/3")
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Unauthorized(_));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn judging_in_progress_error_becomes_success() {
        let server = MockServer::start().await;
        let submission = json!({"problem_id": 4, "language": "cpp", "code": "int main(){}"});
        Mock::given(method("POST"))
            .and(path("/api/submissions"))
            .and(body_json(&submission))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "status": "error",
                "message": "提交成功，正在评测中",
            })))
            .mount(&server)
            .await;

        let envelope = client(&server, signed_in())
            .post("/api/submissions", &submission)
            .await
            .expect("judging placeholder");
        assert_eq!(envelope.status.as_deref(), Some("ok"));
        assert_eq!(envelope.message.as_deref(), Some("提交成功，正在评测中"));
        assert!(envelope.get("submission_id").is_some());
    }

    #[tokio::test]
    async fn rejected_requests_keep_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/admin/settings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "error", "message": "invalid value"})),
            )
            .mount(&server)
            .await;

        let session = signed_in();
        let err = client(&server, session.clone())
            .put("/api/admin/settings", &json!({"max_memory": -1}))
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ApiError::Rejected { status: 200, message } if message == "invalid value"
        );
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn non_json_error_body_becomes_the_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/problems"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server, SessionStore::in_memory())
            .get("/api/problems", &[])
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ApiError::Rejected { status: 502, message } if message == "bad gateway"
        );
    }

    #[tokio::test]
    async fn requests_stay_under_the_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/judge/api/problems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: format!("{}/judge", server.uri()),
            ..ClientConfig::default()
        };
        let client = JudgeClient::new(&config, SessionStore::in_memory()).expect("client");
        client.get("/api/problems", &[]).await.expect("problems");
        server.verify().await;
    }

    #[test]
    fn default_config_uses_five_second_timeout() {
        let config: ClientConfig = toml::from_str("base_url = \"http://judge.local\"").unwrap();
        assert_eq!(
            config,
            ClientConfig {
                base_url: "http://judge.local".to_string(),
                timeout_ms: 5_000,
            }
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert_matches!(
            JudgeClient::new(&config, SessionStore::in_memory()),
            Err(ApiError::Url(_))
        );
    }
}
