//! HTTP client for the Wishit backend REST API

use crate::error::{ClientError, ClientResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, error, info};
use wishit_core::{
    CollectionKind, GiftList, Post, SessionUser, User, collection::decode_collection,
};

/// Body of `POST /api/auth/signin`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Whether the credentials were accepted
    #[serde(default)]
    pub success: bool,
    /// Bearer token for later requests
    #[serde(default)]
    pub token: Option<String>,
    /// Signed-in user
    #[serde(default)]
    pub user: Option<SessionUser>,
    /// Backend explanation, usually on failure
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PermissionBody {
    #[serde(default)]
    permission: bool,
}

/// Client for the backend API, optionally carrying a bearer token
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_root: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for an API root such as `http://localhost:4000/api`
    pub fn new(api_root: impl Into<String>) -> Self {
        let api_root: String = api_root.into();
        Self {
            client: Client::new(),
            api_root: api_root.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach the bearer token sent with collection and delete requests
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// API root this client talks to
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and turn non-success statuses into [`ClientError::Status`]
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            error!("Backend request failed: {}", e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a non-JSON body just loses the message
        let body: MessageBody = response.json().await.unwrap_or_default();
        debug!("Backend returned {} ({:?})", status, body.message);
        Err(ClientError::Status {
            status: status.as_u16(),
            message: body.message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response.json().await.map_err(ClientError::decode)
    }

    /// `POST /api/auth/signin`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, answers with an error
    /// status, or sends a body that is not a sign-in response.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<SignInResponse> {
        debug!("Signing in {}", email);
        let request = self
            .client
            .post(self.url("auth/signin"))
            .json(&json!({ "email": email, "password": password }));

        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// `POST /api/auth/forgotpassword`, returning the backend message
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or refuses the request.
    pub async fn request_reset_code(&self, email: &str) -> ClientResult<Option<String>> {
        let request = self
            .client
            .post(self.url("auth/forgotpassword"))
            .json(&json!({ "email": email }));

        let response = self.send(request).await?;
        let body: MessageBody = Self::read_json(response).await?;
        info!("Reset code requested for {}", email);
        Ok(body.message)
    }

    /// `POST /api/auth/verifCode`, returning whether the code was accepted
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or refuses the request.
    pub async fn verify_code(&self, email: &str, code: &str) -> ClientResult<bool> {
        let request = self
            .client
            .post(self.url("auth/verifCode"))
            .json(&json!({ "email": email, "code": code }));

        let response = self.send(request).await?;
        let body: PermissionBody = Self::read_json(response).await?;
        Ok(body.permission)
    }

    /// `GET /api/{user|post|gift}`, decoded whatever the envelope
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body has an unknown shape,
    /// or a record cannot be decoded.
    pub async fn list<T: DeserializeOwned>(&self, kind: CollectionKind) -> ClientResult<Vec<T>> {
        let request = self.authorized(self.client.get(self.url(kind.resource())));
        let response = self.send(request).await?;
        let body: Value = Self::read_json(response).await?;

        let records = decode_collection(kind, body)?;
        debug!("Fetched {} {}", records.len(), kind);
        Ok(records)
    }

    /// All users
    ///
    /// # Errors
    ///
    /// See [`ApiClient::list`].
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.list(CollectionKind::Users).await
    }

    /// All posts
    ///
    /// # Errors
    ///
    /// See [`ApiClient::list`].
    pub async fn list_posts(&self) -> ClientResult<Vec<Post>> {
        self.list(CollectionKind::Posts).await
    }

    /// All gift lists
    ///
    /// # Errors
    ///
    /// See [`ApiClient::list`].
    pub async fn list_gifts(&self) -> ClientResult<Vec<GiftList>> {
        self.list(CollectionKind::Gifts).await
    }

    /// `DELETE /api/{user|post|gift}/:id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses it.
    pub async fn delete(&self, kind: CollectionKind, id: &str) -> ClientResult<()> {
        let path = format!("{}/{}", kind.resource(), urlencoding::encode(id));
        let request = self.authorized(self.client.delete(self.url(&path)));
        self.send(request).await?;
        info!("Deleted {} {}", kind.noun(), id);
        Ok(())
    }
}
