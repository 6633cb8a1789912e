//! REST transport
//!
//! Turns an [`ApiRequest`] from the CRUD layer into one HTTP exchange with
//! the hospital backend and hands back the parsed JSON body.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hmis_core::{ApiRequest, HttpTransport};
use hmis_domain::{ApiConfig, HmisError, HttpMethod, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::auth::{AccessTokenProvider, StaticTokenProvider};
use crate::http::HttpClient;
use crate::observability::error_label;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// `HttpTransport` backed by the shared [`HttpClient`]
pub struct RestTransport {
    http: HttpClient,
    base_url: Url,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl RestTransport {
    /// Transport configured from `config`
    ///
    /// A configured `token` becomes a [`StaticTokenProvider`].
    ///
    /// # Errors
    /// `HmisError::Config` for an invalid configuration or base URL.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        let auth: Option<Arc<dyn AccessTokenProvider>> = match &config.token {
            Some(token) => Some(Arc::new(StaticTokenProvider::new(token.clone())?)),
            None => None,
        };
        Self::new(&config.base_url, HttpClient::from_config(config)?, auth)
    }

    pub fn new(
        base_url: &str,
        http: HttpClient,
        auth: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| HmisError::Config(format!("invalid base URL '{base_url}': {err}")))?;
        Ok(Self { http, base_url, auth })
    }

    /// Replace the token source
    pub fn with_auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL, keeping any base path prefix
    fn url_for(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| {
            HmisError::InvalidArgument(format!("invalid request path '{path}': {err}"))
        })
    }
}

impl fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for RestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path)?;
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &self.auth {
            let token = auth.access_token().await?;
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(%url, request_id = %request_id, "issuing API request");

        let response = match self.http.send(builder).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    %url,
                    request_id = %request_id,
                    error_type = error_label(&err),
                    error = %err,
                    "API request failed"
                );
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = HmisError::HttpStatus { status: status.as_u16(), url: url.to_string(), body };
            warn!(
                %url,
                request_id = %request_id,
                %status,
                error_type = error_label(&err),
                "API returned non-success status"
            );
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            info!(%status, request_id = %request_id, "API request successful (no content)");
            return Ok(Value::Null);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| HmisError::Transport(format!("failed to read response body: {err}")))?;
        let value = parse_body(&bytes)?;

        info!(%status, request_id = %request_id, "API request successful");
        Ok(value)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Empty or whitespace-only bodies read as JSON `null`
fn parse_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| HmisError::Decode(format!("response body is not valid JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport(server: &MockServer, token: Option<&str>) -> RestTransport {
        let http = HttpClient::builder()
            .max_attempts(1)
            .base_backoff(Duration::from_millis(1))
            .build()
            .unwrap();
        let auth = token.map(|t| {
            Arc::new(StaticTokenProvider::new(t).unwrap()) as Arc<dyn AccessTokenProvider>
        });
        RestTransport::new(&format!("{}/api/v1", server.uri()), http, auth).unwrap()
    }

    #[tokio::test]
    async fn get_joins_base_path_and_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/patients"))
            .and(query_param("page", "2"))
            .and(query_param("ward", "icu"))
            .and(header("authorization", "Bearer t0k3n"))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "meta": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::new(HttpMethod::Get, "/patients").with_query(vec![
            ("page".into(), "2".into()),
            ("ward".into(), "icu".into()),
        ]);
        let value = transport(&server, Some("t0k3n")).execute(request).await.unwrap();

        assert_eq!(value, json!({"data": [], "meta": {}}));
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/admissions/5/discharge"))
            .and(body_json(json!({"disposition": "home"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::new(HttpMethod::Post, "/admissions/5/discharge")
            .with_body(json!({"disposition": "home"}));
        let value = transport(&server, None).execute(request).await.unwrap();

        assert_eq!(value, json!({"id": 5}));
    }

    #[tokio::test]
    async fn no_content_and_empty_bodies_are_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/users/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/users/2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = transport(&server, None);
        for id in ["1", "2"] {
            let request = ApiRequest::new(HttpMethod::Delete, format!("/users/{id}"));
            assert_eq!(transport.execute(request).await.unwrap(), Value::Null);
        }
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("patient not found"))
            .mount(&server)
            .await;

        let err = transport(&server, None)
            .execute(ApiRequest::new(HttpMethod::Get, "/patients/99"))
            .await
            .unwrap_err();

        match err {
            HmisError::HttpStatus { status, url, body } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/api/v1/patients/99"));
                assert_eq!(body, "patient not found");
            }
            other => panic!("expected http status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = transport(&server, None)
            .execute(ApiRequest::new(HttpMethod::Get, "/users"))
            .await
            .unwrap_err();

        assert!(matches!(err, HmisError::Decode(_)));
    }

    #[test]
    fn from_config_rejects_bad_base_url() {
        let err = RestTransport::from_config(&ApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, HmisError::Config(_)));
    }

    #[test]
    fn debug_output_hides_credentials() {
        let http = HttpClient::builder().build().unwrap();
        let auth: Arc<dyn AccessTokenProvider> =
            Arc::new(StaticTokenProvider::new("s3cret").unwrap());
        let transport = RestTransport::new("https://his.example.org", http, Some(auth)).unwrap();

        let rendered = format!("{transport:?}");
        assert!(rendered.contains("authenticated: true"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn url_join_handles_slashes() {
        let http = HttpClient::builder().build().unwrap();
        let transport = RestTransport::new("https://his.example.org/api/", http, None).unwrap();
        assert_eq!(
            transport.url_for("/users/7").unwrap().as_str(),
            "https://his.example.org/api/users/7"
        );
        assert_eq!(
            transport.url_for("users").unwrap().as_str(),
            "https://his.example.org/api/users"
        );
    }

    #[test]
    fn whitespace_body_is_null() {
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
        assert_eq!(parse_body(b"[1]").unwrap(), json!([1]));
    }
}
