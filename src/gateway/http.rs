//! # HTTP Gateway
//!
//! Reqwest-backed [`PersistenceGateway`] speaking the backend's REST API
//! (`/collections`, `/folders`, `/requests`) with an optional Bearer token.
//! HTTP 401 maps to [`GatewayError::Unauthorized`]; any other non-success
//! status surfaces the server's `{"error": ...}` message.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::collection::node::Collection;
use crate::gateway::{
    CollectionInfo, CollectionUpdate, FolderCreate, FolderUpdate, GatewayError,
    PersistenceGateway, RequestCreate, RequestUpdate,
};

/// Error envelope the backend uses for refusals.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A successful login: the token to attach to subsequent calls.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub username: String,
}

/// REST client for the persistence backend.
pub struct HttpGateway {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway against the given API base URL (e.g.
    /// `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach a session token to every subsequent call.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Send a request with the session token attached and map the response
    /// into the gateway error taxonomy.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("API request failed ({status})"));
            return Err(GatewayError::Api(message));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        tracing::debug!(path, "gateway GET");
        let response = self.execute(self.client.get(self.url(path))).await?;
        response
            .json()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), GatewayError> {
        tracing::debug!(path, "gateway POST");
        self.execute(self.client.post(self.url(path)).json(body))
            .await
            .map(|_| ())
    }

    async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), GatewayError> {
        tracing::debug!(path, "gateway PUT");
        self.execute(self.client.put(self.url(path)).json(body))
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        tracing::debug!(path, "gateway DELETE");
        self.execute(self.client.delete(self.url(path)))
            .await
            .map(|_| ())
    }

    /// Exchange credentials for a session token; the token is attached to
    /// this gateway and also returned for the caller to hand around.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .execute(self.client.post(self.url("/login")).json(&body))
            .await?;
        let session: AuthSession = response
            .json()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        tracing::info!(username = %session.user.username, "logged in");
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Create an account. The caller still logs in afterwards.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), GatewayError> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.post_json("/register", &body).await
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, GatewayError> {
        self.get_json("/collections").await
    }

    async fn create_collection(&self, info: &CollectionInfo) -> Result<(), GatewayError> {
        self.post_json("/collections", info).await
    }

    async fn get_collection(&self, id: &str) -> Result<Collection, GatewayError> {
        self.get_json(&format!("/collections/{id}")).await
    }

    async fn update_collection(
        &self,
        id: &str,
        update: &CollectionUpdate,
    ) -> Result<(), GatewayError> {
        self.put_json(&format!("/collections/{id}"), update).await
    }

    async fn delete_collection(&self, id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/collections/{id}")).await
    }

    async fn create_folder(&self, folder: &FolderCreate) -> Result<(), GatewayError> {
        self.post_json("/folders", folder).await
    }

    async fn update_folder(&self, id: &str, update: &FolderUpdate) -> Result<(), GatewayError> {
        self.put_json(&format!("/folders/{id}"), update).await
    }

    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/folders/{id}")).await
    }

    async fn create_request(&self, request: &RequestCreate) -> Result<(), GatewayError> {
        self.post_json("/requests", request).await
    }

    async fn update_request(&self, id: &str, update: &RequestUpdate) -> Result<(), GatewayError> {
        self.put_json(&format!("/requests/{id}"), update).await
    }

    async fn delete_request(&self, id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/requests/{id}")).await
    }
}
