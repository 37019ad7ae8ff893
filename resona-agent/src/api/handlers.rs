//! HTTP request handlers
//!
//! Mutating endpoints always answer 200 with an `{ok, error?}` body: an
//! absent equalizer install or a bad band index is a steady-state condition
//! the UI renders, not an HTTP error.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

use resona_common::events::{AgentEvent, EqualizerSnapshot};

use super::server::AppContext;
use crate::library::{scanner, WatchStatus};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Soft success/failure envelope for mutating endpoints
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn err(error: impl ToString) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartWatchRequest {
    pub folder: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct WatchStatusResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Option<WatchStatus>> for WatchStatusResponse {
    fn from(status: Option<WatchStatus>) -> Self {
        match status {
            Some(status) => Self {
                active: true,
                watch_id: Some(status.watch_id),
                folder: Some(status.folder),
                started_at: Some(status.started_at),
            },
            None => Self {
                active: false,
                watch_id: None,
                folder: None,
                started_at: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub folder: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_format: Option<BTreeMap<String, usize>>,
}

#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetBandGainRequest {
    pub index: usize,
    pub gain: f32,
}

#[derive(Debug, Deserialize)]
pub struct SetGainsRequest {
    pub gains: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PresetListResponse {
    pub presets: Vec<&'static str>,
}

// ============================================================================
// Library Endpoints
// ============================================================================

/// POST /library/watch - Start watching a folder, replacing any active watch
pub async fn start_watch(
    State(ctx): State<AppContext>,
    Json(req): Json<StartWatchRequest>,
) -> Json<Ack> {
    match ctx.watches.start(req.folder).await {
        Ok(_) => Json(Ack::ok()),
        Err(e) => {
            warn!("Folder watch start rejected: {}", e);
            Json(Ack::err(e))
        }
    }
}

/// DELETE /library/watch - Stop the active watch
pub async fn stop_watch(State(ctx): State<AppContext>) -> Json<Ack> {
    match ctx.watches.stop().await {
        Ok(_) => Json(Ack::ok()),
        Err(e) => Json(Ack::err(e)),
    }
}

/// GET /library/watch - Describe the active watch, if any
pub async fn watch_status(State(ctx): State<AppContext>) -> Json<WatchStatusResponse> {
    Json(ctx.watches.status().await.into())
}

/// POST /library/scan - One-shot enumeration of a folder's audio files
pub async fn scan_library(
    State(ctx): State<AppContext>,
    Json(req): Json<ScanRequest>,
) -> Json<ScanResponse> {
    // The walk hits the disk; keep it off the async workers
    let folder = req.folder.clone();
    let result = tokio::task::spawn_blocking(move || scanner::scan_folder(&folder)).await;

    match result {
        Ok(Ok(summary)) => {
            ctx.bus.emit_lossy(AgentEvent::LibraryScanned {
                folder: summary.folder.clone(),
                file_count: summary.files.len(),
                total_size: summary.total_size,
                timestamp: chrono::Utc::now(),
            });
            Json(ScanResponse {
                ok: true,
                error: None,
                files: Some(summary.files),
                total_size: Some(summary.total_size),
                by_format: Some(summary.by_format),
            })
        }
        Ok(Err(e)) => {
            warn!("Library scan failed: {}", e);
            Json(ScanResponse {
                ok: false,
                error: Some(e.to_string()),
                files: None,
                total_size: None,
                by_format: None,
            })
        }
        Err(e) => Json(ScanResponse {
            ok: false,
            error: Some(format!("Scan task failed: {e}")),
            files: None,
            total_size: None,
            by_format: None,
        }),
    }
}

// ============================================================================
// Equalizer Endpoints
// ============================================================================

/// GET /equalizer - Current equalizer state
pub async fn get_equalizer(State(ctx): State<AppContext>) -> Json<EqualizerSnapshot> {
    Json(ctx.equalizer.snapshot().await)
}

/// POST /equalizer/detect - Re-probe for the external program
pub async fn detect_equalizer(State(ctx): State<AppContext>) -> Json<EqualizerSnapshot> {
    Json(ctx.equalizer.detect().await)
}

/// POST /equalizer/enabled - Toggle processing on or off
pub async fn set_enabled(
    State(ctx): State<AppContext>,
    Json(req): Json<SetEnabledRequest>,
) -> Json<Ack> {
    match ctx.equalizer.set_enabled(req.enabled).await {
        Ok(()) => Json(Ack::ok()),
        Err(e) => Json(Ack::err(e)),
    }
}

/// POST /equalizer/band - Set one band's gain
pub async fn set_band_gain(
    State(ctx): State<AppContext>,
    Json(req): Json<SetBandGainRequest>,
) -> Json<Ack> {
    match ctx.equalizer.set_band_gain(req.index, req.gain).await {
        Ok(()) => Json(Ack::ok()),
        Err(e) => Json(Ack::err(e)),
    }
}

/// POST /equalizer/gains - Replace the full gain vector
pub async fn set_gains(
    State(ctx): State<AppContext>,
    Json(req): Json<SetGainsRequest>,
) -> Json<Ack> {
    match ctx.equalizer.set_gains(&req.gains).await {
        Ok(()) => Json(Ack::ok()),
        Err(e) => Json(Ack::err(e)),
    }
}

/// POST /equalizer/preset - Apply a named preset
pub async fn apply_preset(
    State(ctx): State<AppContext>,
    Json(req): Json<PresetRequest>,
) -> Json<Ack> {
    match ctx.equalizer.apply_preset(&req.name).await {
        Ok(()) => Json(Ack::ok()),
        Err(e) => Json(Ack::err(e)),
    }
}

/// GET /equalizer/presets - Names accepted by the preset endpoint
pub async fn list_presets(State(ctx): State<AppContext>) -> Json<PresetListResponse> {
    Json(PresetListResponse {
        presets: ctx.equalizer.preset_names(),
    })
}
