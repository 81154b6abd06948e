//! API client for communicating with the RUN AI backend.
//!
//! `ApiClient::call` is the one authenticated request path every view goes
//! through. Login and registration are separate unauthenticated exchanges
//! because no credential exists before they succeed.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::models::{
    DocumentInfo, DocumentListResponse, ProgramResponse, QueryRequest, QueryResponse,
    RegisterRequest, TokenResponse, UpdateRagResponse, UserProfile,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const TOKEN_PATH: &str = "/token";
const REGISTER_PATH: &str = "/register";
const QUERY_PATH: &str = "/query";
const DOCUMENTS_PATH: &str = "/documents";
const UPDATE_RAG_PATH: &str = "/update_rag";
const PARAMETERS_PATH: &str = "/user/parameters";
const PROGRAM_PATH: &str = "/program/generate";

const LOGIN_FALLBACK: &str = "Login failed. Check your email and password.";
const REGISTER_FALLBACK: &str = "Registration failed. Please check your details.";

/// Placeholder for calls that send no payload
pub const NO_BODY: Option<&()> = None;

/// API client for the RUN AI backend.
/// Clone is cheap - reqwest::Client and SessionStore are both Arc-backed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client with no request timeout
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self> {
        Self::with_timeout(base_url, session, None)
    }

    pub fn with_timeout(
        base_url: &str,
        session: SessionStore,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        reqwest::Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Authenticated Requests =====

    /// Send an authenticated request and return the decoded JSON body.
    ///
    /// Fails with `Unauthenticated` before touching the network when no
    /// session is active. Nothing is retried.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(path = %path, error = %e, "Unparsable response body");
            ApiError::MalformedResponse(format!("{} returned invalid JSON: {}", path, e))
        })
    }

    /// Authenticated round trip shared by every endpoint. Returns the raw
    /// success body; a non-success status becomes `RequestFailed`.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
        let url = self.url(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, url = %url, "Sending request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, url = %url, status = status.as_u16(), "Response received");

        if !status.is_success() {
            warn!(
                %method,
                url = %url,
                status = status.as_u16(),
                body = %ApiError::truncate_body(&text),
                "Request failed"
            );
            let fallback = format!("Server error ({})", status.as_u16());
            return Err(ApiError::from_status(status, &text, &fallback));
        }
        Ok(text)
    }

    /// `call` followed by decoding into a concrete response shape
    async fn call_as<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let value = self.call(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::MalformedResponse(format!("{} returned an unexpected shape: {}", path, e))
        })
    }

    // ===== Session Exchanges =====

    /// Exchange email and password for a token and start a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&[("username", email), ("password", password)]);

        self.exchange(request, email, LOGIN_FALLBACK).await
    }

    /// Create an account and start a session for it.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(&RegisterRequest { email, password });

        self.exchange(request, email, REGISTER_FALLBACK).await
    }

    /// End the current session. Never touches the network.
    pub fn logout(&self) {
        self.session.clear_session();
    }

    async fn exchange(
        &self,
        request: RequestBuilder,
        email: &str,
        fallback: &str,
    ) -> Result<(), ApiError> {
        let response = request.send().await?;
        let auth = Self::read_token_response(response, fallback).await?;

        // The stored identity is what the user typed, not anything echoed back
        self.session.set_session(&auth.access_token, email);
        info!(email = %email, "Authenticated");
        Ok(())
    }

    async fn read_token_response(
        response: Response,
        fallback: &str,
    ) -> Result<TokenResponse, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Authentication rejected");
            return Err(ApiError::from_exchange_status(status, &text, fallback));
        }

        let auth: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::MalformedResponse(format!("Failed to parse token response: {}", e))
        })?;
        if auth.access_token.is_empty() {
            return Err(ApiError::MalformedResponse(
                "Token response carried an empty access token".to_string(),
            ));
        }
        Ok(auth)
    }

    // ===== Feature Endpoints =====

    /// Ask the coach a question
    pub async fn ask(&self, query: &str) -> Result<String, ApiError> {
        let response: QueryResponse = self
            .call_as(Method::POST, QUERY_PATH, Some(&QueryRequest { query }))
            .await?;
        Ok(response.answer)
    }

    /// List the documents the coach draws on
    pub async fn list_documents(&self) -> Result<Vec<DocumentInfo>, ApiError> {
        let response: DocumentListResponse =
            self.call_as(Method::GET, DOCUMENTS_PATH, NO_BODY).await?;
        Ok(response.documents)
    }

    /// Rebuild the retrieval index from the backend's document folder
    pub async fn update_rag(&self) -> Result<String, ApiError> {
        let response: UpdateRagResponse =
            self.call_as(Method::POST, UPDATE_RAG_PATH, NO_BODY).await?;
        Ok(response.message)
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.call_as(Method::GET, PARAMETERS_PATH, NO_BODY).await
    }

    /// Save the profile. Any 2xx counts as success; the body is not read.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), ApiError> {
        self.send(Method::POST, PARAMETERS_PATH, Some(profile)).await?;
        Ok(())
    }

    /// Generate a training program from the saved profile.
    /// The result is markdown text.
    pub async fn generate_program(&self) -> Result<String, ApiError> {
        let response: ProgramResponse = self.call_as(Method::POST, PROGRAM_PATH, NO_BODY).await?;
        Ok(response.program)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::MemoryStore;

    fn session() -> SessionStore {
        SessionStore::initialize(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url", session()).is_err());
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/", session()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(DOCUMENTS_PATH), "http://localhost:8000/documents");
    }

    #[test]
    fn test_logout_clears_session() {
        let client = ApiClient::new("http://localhost:8000", session()).unwrap();
        client.session().set_session("tok", "a@b.com");
        client.logout();
        assert!(!client.session().is_active());
    }
}
