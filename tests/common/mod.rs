//! In-process mock media server for integration tests.
//!
//! Serves the four routes the agent consumes: ping, album listing, album
//! membership, and asset upload. Response shapes are switchable per test
//! so every row of the upload classification table can be exercised.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Which shape `POST /api/assets` responds with.
#[derive(Debug, Clone, Copy)]
pub enum UploadResponse {
    /// 201 with `{"id": …}`
    Created,
    /// 200 with `{"id": …}`
    Duplicate,
    /// 409 with `{"id": …}`
    ConflictWithId,
    /// 409 with a non-JSON body
    ConflictWithoutId,
    /// 500
    ServerError,
}

pub struct MockState {
    /// deviceAssetId of every upload call, in arrival order
    pub uploads: Mutex<Vec<String>>,
    /// (album_id, asset_id) of every membership call
    pub links: Mutex<Vec<(String, String)>>,
    pub upload_response: Mutex<UploadResponse>,
    pub link_fails: AtomicBool,
    pub ping_ok: AtomicBool,
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn upload_count(&self) -> usize {
        self.state.uploads.lock().unwrap().len()
    }

    pub fn uploaded_ids(&self) -> Vec<String> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn link_count(&self) -> usize {
        self.state.links.lock().unwrap().len()
    }

    pub fn links(&self) -> Vec<(String, String)> {
        self.state.links.lock().unwrap().clone()
    }

    pub fn set_upload_response(&self, response: UploadResponse) {
        *self.state.upload_response.lock().unwrap() = response;
    }

    pub fn set_link_fails(&self, fails: bool) {
        self.state.link_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_ping_ok(&self, ok: bool) {
        self.state.ping_ok.store(ok, Ordering::SeqCst);
    }
}

/// Bind the mock server on an ephemeral port and serve it in the
/// background for the rest of the test.
pub async fn spawn() -> MockServer {
    let state = Arc::new(MockState {
        uploads: Mutex::new(Vec::new()),
        links: Mutex::new(Vec::new()),
        upload_response: Mutex::new(UploadResponse::Created),
        link_fails: AtomicBool::new(false),
        ping_ok: AtomicBool::new(true),
    });

    let app = Router::new()
        .route("/api/server/ping", get(ping))
        .route("/api/albums", get(list_albums))
        .route("/api/albums/{album_id}/assets", put(add_assets))
        .route("/api/assets", post(upload_asset))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { addr, state }
}

async fn ping(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    if state.ping_ok.load(Ordering::SeqCst) {
        (StatusCode::OK, Json(json!({"res": "pong"}))).into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

async fn list_albums() -> impl IntoResponse {
    Json(json!([
        {"id": "album-1", "albumName": "Screenshots", "assetCount": 0},
        {"id": "album-2", "albumName": "Holidays", "assetCount": 3},
    ]))
}

async fn add_assets(
    State(state): State<Arc<MockState>>,
    Path(album_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if state.link_fails.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let ids = body["ids"].as_array().cloned().unwrap_or_default();
    let mut links = state.links.lock().unwrap();
    let mut results = Vec::new();
    for id in ids.iter().filter_map(|v| v.as_str()) {
        links.push((album_id.clone(), id.to_string()));
        results.push(json!({"id": id, "success": true}));
    }

    Json(serde_json::Value::Array(results)).into_response()
}

async fn upload_asset(
    State(state): State<Arc<MockState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut device_asset_id = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "deviceAssetId" {
            device_asset_id = field.text().await.unwrap();
        } else {
            // Drain the field; the mock keeps no bytes
            let _ = field.bytes().await;
        }
    }

    let asset_id = {
        let mut uploads = state.uploads.lock().unwrap();
        uploads.push(device_asset_id);
        format!("asset-{}", uploads.len())
    };

    match *state.upload_response.lock().unwrap() {
        UploadResponse::Created => (
            StatusCode::CREATED,
            Json(json!({"id": asset_id, "status": "created"})),
        )
            .into_response(),
        UploadResponse::Duplicate => (
            StatusCode::OK,
            Json(json!({"id": asset_id, "status": "duplicate"})),
        )
            .into_response(),
        UploadResponse::ConflictWithId => {
            (StatusCode::CONFLICT, Json(json!({"id": asset_id}))).into_response()
        }
        UploadResponse::ConflictWithoutId => {
            (StatusCode::CONFLICT, "duplicate").into_response()
        }
        UploadResponse::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
    }
}

/// Write a file and pin its modification time, so upload ordering and
/// identity keys are deterministic.
pub fn write_with_mtime(path: &FsPath, contents: &[u8], mtime_epoch: u64) -> std::io::Result<()> {
    std::fs::write(path, contents)?;
    let file = std::fs::OpenOptions::new().write(true).open(path)?;
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_epoch))?;
    Ok(())
}
