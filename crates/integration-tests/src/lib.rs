//! Integration tests for Showreel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p showreel-integration-tests
//! ```
//!
//! No network access is needed: [`FakeGithub`] serves the parts of the gist
//! API, `YouTube` oEmbed and the Vimeo simple API that the admin crate uses,
//! from an `axum` router on an ephemeral local port.
//!
//! # Fixtures
//!
//! - Gist [`GIST_ID`] is owned by user [`OWNER_ID`], reachable with
//!   [`OWNER_TOKEN`]
//! - [`STRANGER_TOKEN`] is a valid token for user [`STRANGER_ID`], who does
//!   not own the gist
//! - `YouTube` knows [`YOUTUBE_ID`]; [`YOUTUBE_PRIVATE_ID`] is private
//! - Vimeo knows [`VIMEO_ID`]; [`VIMEO_PRIVATE_ID`] is private and
//!   [`VIMEO_EMPTY_ID`] answers with an empty array

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use showreel_admin::config::{GistConfig, VideoConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const GIST_ID: &str = "aa5a315d61ae9438b18d";
pub const FILE_NAME: &str = "projects-config.json";

pub const OWNER_ID: u64 = 42;
pub const OWNER_TOKEN: &str = "ghp_owner";
pub const STRANGER_ID: u64 = 7;
pub const STRANGER_TOKEN: &str = "ghp_stranger";

pub const YOUTUBE_ID: &str = "dQw4w9WgXcQ";
pub const YOUTUBE_TITLE: &str = "Never Gonna Give You Up";
pub const YOUTUBE_PRIVATE_ID: &str = "privateVid1";

pub const VIMEO_ID: &str = "76979871";
pub const VIMEO_TITLE: &str = "The New Vimeo Player";
pub const VIMEO_PRIVATE_ID: &str = "1111";
pub const VIMEO_EMPTY_ID: &str = "2222";

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
struct ServerState {
    base_url: String,
    /// File content; `None` means the file is missing from the gist.
    content: Option<String>,
    /// Anonymous reads allowed.
    public: bool,
    /// Serve the file as truncated so the client must follow `raw_url`.
    truncated: bool,
    /// Reject writes as if the token lacked the `gist` scope.
    read_only_token: bool,
    revision: u64,
    patches: Vec<Value>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<ServerState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stand-in for the GitHub and video provider APIs.
pub struct FakeGithub {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeGithub {
    /// Start a server whose gist file holds `content` (`None` = no file).
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(content: Option<&str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake GitHub listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let state: Shared = Arc::new(Mutex::new(ServerState {
            base_url: format!("http://{addr}"),
            content: content.map(str::to_string),
            public: true,
            truncated: false,
            read_only_token: false,
            revision: 1,
            patches: Vec::new(),
            requests: Vec::new(),
        }));

        let app = Router::new()
            .route("/gists/{id}", get(get_gist).patch(patch_gist))
            .route("/user", get(get_user))
            .route("/raw/{file}", get(get_raw))
            .route("/oembed", get(get_oembed))
            .route("/api/v2/video/{file}", get(get_vimeo))
            .with_state(Arc::clone(&state));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Start with a document holding the given JSON value.
    pub async fn with_document(document: &Value) -> Self {
        let content =
            serde_json::to_string_pretty(document).expect("Failed to encode fixture document");
        Self::start(Some(&content)).await
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn gist_config(&self) -> GistConfig {
        GistConfig {
            api_base: self.base_url(),
            gist_id: GIST_ID.to_string(),
            file_name: FILE_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn video_config(&self) -> VideoConfig {
        VideoConfig {
            youtube_oembed_url: format!("{}/oembed", self.base_url()),
            vimeo_api_base: format!("{}/api/v2", self.base_url()),
        }
    }

    /// Current file content.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        lock(&self.state).content.clone()
    }

    /// Current file content, parsed.
    ///
    /// # Panics
    ///
    /// Panics if the file is missing or not JSON.
    #[must_use]
    pub fn content_json(&self) -> Value {
        let content = self.content().expect("Gist file is missing");
        serde_json::from_str(&content).expect("Gist file is not JSON")
    }

    pub fn set_public(&self, public: bool) {
        lock(&self.state).public = public;
    }

    pub fn set_truncated(&self, truncated: bool) {
        lock(&self.state).truncated = truncated;
    }

    pub fn set_read_only_token(&self, read_only: bool) {
        lock(&self.state).read_only_token = read_only;
    }

    /// Bodies of all accepted `PATCH` requests.
    #[must_use]
    pub fn patches(&self) -> Vec<Value> {
        lock(&self.state).patches.clone()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Recorded requests whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }
}

impl Drop for FakeGithub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn record(state: &Shared, method: Method, path: String, headers: &HeaderMap) {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        method,
        path,
        authorization: value(header::AUTHORIZATION),
        accept: value(header::ACCEPT),
        user_agent: value(header::USER_AGENT),
    };
    lock(state).requests.push(request);
}

/// Resolve the bearer token to a user id.
///
/// `Ok(None)` is an anonymous request, `Err` an unknown token.
fn bearer_user(headers: &HeaderMap) -> Result<Option<u64>, ()> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    match value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
        Some(OWNER_TOKEN) => Ok(Some(OWNER_ID)),
        Some(STRANGER_TOKEN) => Ok(Some(STRANGER_ID)),
        _ => Err(()),
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn gist_body(state: &ServerState) -> Value {
    let mut files = serde_json::Map::new();
    if let Some(content) = &state.content {
        let raw_url = format!("{}/raw/{FILE_NAME}", state.base_url);
        let file = if state.truncated {
            let inline: String = content.chars().take(16).collect();
            json!({ "filename": FILE_NAME, "content": inline, "truncated": true, "raw_url": raw_url })
        } else {
            json!({ "filename": FILE_NAME, "content": content, "truncated": false, "raw_url": raw_url })
        };
        files.insert(FILE_NAME.to_string(), file);
    }

    json!({
        "id": GIST_ID,
        "public": state.public,
        "files": files,
        "owner": { "id": OWNER_ID, "login": "showreel-owner" },
        "updated_at": "2026-10-18T09:30:00Z",
        "history": [ { "version": format!("rev{}", state.revision) } ],
    })
}

async fn get_gist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, Method::GET, format!("/gists/{id}"), &headers);

    let user = match bearer_user(&headers) {
        Ok(user) => user,
        Err(()) => return message(StatusCode::UNAUTHORIZED, "Bad credentials"),
    };

    let guard = lock(&state);
    if id != GIST_ID || (user.is_none() && !guard.public) {
        return message(StatusCode::NOT_FOUND, "Not Found");
    }

    Json(gist_body(&guard)).into_response()
}

async fn patch_gist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::PATCH, format!("/gists/{id}"), &headers);

    let user = match bearer_user(&headers) {
        Ok(Some(user)) => user,
        Ok(None) | Err(()) => {
            return message(StatusCode::UNAUTHORIZED, "Requires authentication");
        }
    };

    let mut guard = lock(&state);
    if id != GIST_ID || user != OWNER_ID {
        return message(StatusCode::NOT_FOUND, "Not Found");
    }
    if guard.read_only_token {
        return message(
            StatusCode::FORBIDDEN,
            "Resource not accessible by personal access token",
        );
    }

    let Some(content) = body
        .pointer(&format!("/files/{FILE_NAME}/content"))
        .and_then(Value::as_str)
    else {
        return message(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request");
    };

    guard.content = Some(content.to_string());
    guard.revision += 1;
    guard.patches.push(body.clone());

    Json(gist_body(&guard)).into_response()
}

async fn get_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, Method::GET, "/user".to_string(), &headers);

    match bearer_user(&headers) {
        Ok(Some(id)) => Json(json!({ "id": id, "login": format!("user{id}") })).into_response(),
        Ok(None) => message(StatusCode::UNAUTHORIZED, "Requires authentication"),
        Err(()) => message(StatusCode::UNAUTHORIZED, "Bad credentials"),
    }
}

async fn get_raw(
    State(state): State<Shared>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, Method::GET, format!("/raw/{file}"), &headers);

    let guard = lock(&state);
    match (&guard.content, file == FILE_NAME) {
        (Some(content), true) => content.clone().into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_oembed(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(&state, Method::GET, "/oembed".to_string(), &headers);

    let url = params.get("url").map_or("", String::as_str);
    if params.get("format").map(String::as_str) != Some("json") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    if url.ends_with(YOUTUBE_ID) {
        Json(json!({
            "title": YOUTUBE_TITLE,
            "author_name": "Rick Astley",
            "type": "video",
            "thumbnail_url": format!("https://i.ytimg.com/vi/{YOUTUBE_ID}/hqdefault.jpg"),
        }))
        .into_response()
    } else if url.ends_with(YOUTUBE_PRIVATE_ID) {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

async fn get_vimeo(
    State(state): State<Shared>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, Method::GET, format!("/api/v2/video/{file}"), &headers);

    match file.strip_suffix(".json") {
        Some(VIMEO_ID) => Json(json!([{
            "id": 76_979_871,
            "title": VIMEO_TITLE,
            "thumbnail_small": "https://i.vimeocdn.com/video/452001751_100x75.jpg",
            "thumbnail_medium": "https://i.vimeocdn.com/video/452001751_200x150.jpg",
            "thumbnail_large": "https://i.vimeocdn.com/video/452001751_640.jpg",
            "duration": 62,
        }]))
        .into_response(),
        Some(VIMEO_PRIVATE_ID) => message(StatusCode::FORBIDDEN, "Private video"),
        Some(VIMEO_EMPTY_ID) => Json(json!([])).into_response(),
        _ => message(StatusCode::NOT_FOUND, "Video not found"),
    }
}
