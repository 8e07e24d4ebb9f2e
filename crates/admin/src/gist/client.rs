//! Gist REST client.
//!
//! Implements [`DocumentStore`] against the GitHub gist API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use showreel_core::Document;
use tracing::{debug, error, info, instrument, warn};

use super::error::GistError;
use super::types::{GistFile, GistResponse, GitHubUser, UpdateGistRequest};
use super::{DocumentStore, PersistAck};
use crate::config::GistConfig;
use crate::credential::Credential;

/// Media type for the v3 REST API.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub rejects requests without a user agent.
const USER_AGENT: &str = concat!("showreel-admin/", env!("CARGO_PKG_VERSION"));

/// Appended to failed write errors.
const WRITE_SCOPE_HINT: &str = "the token probably lacks the `gist` write scope";

/// Longest response body excerpt kept in an error.
const MAX_ERROR_BODY: usize = 200;

/// Gist API client for one document file.
#[derive(Clone)]
pub struct GistClient {
    inner: Arc<GistClientInner>,
}

struct GistClientInner {
    client: reqwest::Client,
    api_base: String,
    gist_id: String,
    file_name: String,
}

impl std::fmt::Debug for GistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GistClient")
            .field("api_base", &self.inner.api_base)
            .field("gist_id", &self.inner.gist_id)
            .field("file_name", &self.inner.file_name)
            .finish_non_exhaustive()
    }
}

impl GistClient {
    /// Create a new gist client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GistConfig) -> Result<Self, GistError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(GistClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
                gist_id: config.gist_id.clone(),
                file_name: config.file_name.clone(),
            }),
        })
    }

    /// Get the gist id.
    #[must_use]
    pub fn gist_id(&self) -> &str {
        &self.inner.gist_id
    }

    /// Get the name of the document file inside the gist.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.inner.file_name
    }

    fn gist_url(&self) -> String {
        format!("{}/gists/{}", self.inner.api_base, self.inner.gist_id)
    }

    fn user_url(&self) -> String {
        format!("{}/user", self.inner.api_base)
    }

    /// Build a request, attaching the bearer token when one is given.
    fn request(&self, method: Method, url: &str, credential: Option<&Credential>) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match credential {
            Some(credential) => builder.bearer_auth(credential.expose()),
            None => builder,
        }
    }

    /// Fetch the gist envelope.
    async fn get_gist(&self, credential: Option<&Credential>) -> Result<GistResponse, GistError> {
        let response = self
            .request(Method::GET, &self.gist_url(), credential)
            .send()
            .await?;
        read_json(response).await
    }

    /// Resolve the principal behind a token.
    async fn current_user(&self, credential: &Credential) -> Result<GitHubUser, GistError> {
        let response = self
            .request(Method::GET, &self.user_url(), Some(credential))
            .send()
            .await?;
        read_json(response).await
    }

    /// Full content of a gist file, following `raw_url` when the API
    /// truncated the inline copy.
    async fn file_content(
        &self,
        file: GistFile,
        credential: Option<&Credential>,
    ) -> Result<String, GistError> {
        if !file.truncated {
            return Ok(file.content.unwrap_or_default());
        }

        let raw_url = file.raw_url.ok_or_else(|| {
            GistError::Parse("file is truncated and has no raw_url".to_string())
        })?;

        debug!(raw_url = %raw_url, "Document truncated inline, fetching raw content");

        let response = self.request(Method::GET, &raw_url, credential).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(response).await);
        }
        response
            .text()
            .await
            .map_err(|e| GistError::Parse(format!("Failed to read raw content: {e}")))
    }
}

#[async_trait]
impl DocumentStore for GistClient {
    #[instrument(skip(self, credential), fields(gist_id = %self.inner.gist_id))]
    async fn verify_permission(&self, credential: &Credential) -> Result<bool, GistError> {
        let (user, gist) = tokio::join!(self.current_user(credential), self.get_gist(Some(credential)));

        let user = match user {
            Ok(user) => user,
            Err(e) if e.is_transport() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Could not resolve token owner");
                return Ok(false);
            }
        };

        let gist = match gist {
            Ok(gist) => gist,
            Err(e) if e.is_transport() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Could not load gist for ownership check");
                return Ok(false);
            }
        };

        let Some(owner) = gist.owner else {
            warn!("Gist has no owner, refusing write access");
            return Ok(false);
        };

        let permitted = owner.id == user.id;
        if permitted {
            debug!(user_id = user.id, login = ?user.login, "Token owns the gist");
        } else {
            warn!(
                user_id = user.id,
                owner_id = owner.id,
                "Token does not belong to the gist owner"
            );
        }

        Ok(permitted)
    }

    #[instrument(skip(self, credential), fields(gist_id = %self.inner.gist_id, authenticated = credential.is_some()))]
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Document, GistError> {
        let mut gist = self.get_gist(credential).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch gist");
        })?;

        let file = gist
            .files
            .remove(&self.inner.file_name)
            .ok_or_else(|| GistError::DocumentNotFound(self.inner.file_name.clone()))?;

        let content = self.file_content(file, credential).await?;
        let document = parse_document(&content)?;

        debug!(entries = document.entries.len(), "Document loaded");

        Ok(document)
    }

    #[instrument(skip(self, credential, document), fields(gist_id = %self.inner.gist_id, entries = document.entries.len()))]
    async fn persist_document(
        &self,
        credential: Option<&Credential>,
        document: &Document,
    ) -> Result<PersistAck, GistError> {
        let credential = credential.ok_or(GistError::Unauthorized)?;

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| GistError::Encode(e.to_string()))?;
        let body = UpdateGistRequest::single(&self.inner.file_name, content);

        let response = self
            .request(Method::PATCH, &self.gist_url(), Some(credential))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = match status_error(response).await {
                GistError::Status { status, message } => GistError::Status {
                    status,
                    message: format!("{message} ({WRITE_SCOPE_HINT})"),
                },
                other => other,
            };
            error!(error = %err, "Failed to save document to gist");
            return Err(err);
        }

        // The write went through; an unreadable body only costs us the ack details.
        let ack = match response.json::<GistResponse>().await {
            Ok(gist) => PersistAck {
                updated_at: gist.updated_at,
                version: gist.history.into_iter().next().map(|h| h.version),
            },
            Err(e) => {
                warn!(error = %e, "Saved, but could not parse gist response");
                PersistAck::default()
            }
        };

        info!(version = ?ack.version, "Document saved to gist");

        Ok(ack)
    }
}

/// Parse the file content into a document.
///
/// Blank content and a literal `null` yield an empty document.
pub(crate) fn parse_document(content: &str) -> Result<Document, GistError> {
    if content.trim().is_empty() {
        return Ok(Document::default());
    }

    serde_json::from_str::<Option<Document>>(content)
        .map(Option::unwrap_or_default)
        .map_err(|e| GistError::Parse(format!("Invalid document JSON: {e}")))
}

/// Decode a successful response, or turn a non-2xx one into an error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GistError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| GistError::Parse(format!("Failed to parse response: {e}")))
}

/// Build a [`GistError::Status`] from a non-2xx response.
async fn status_error(response: Response) -> GistError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        "empty response".to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY).collect()
    };

    GistError::Status { status, message }
}
