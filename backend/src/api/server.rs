//! HTTP Server for the combogen API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                               |
//! |--------|-------------------|-------------------------------------------|
//! | GET    | `/health`         | Health check                              |
//! | POST   | `/api/upload`     | Upload a workbook, get combinations back  |
//! | GET    | `/api/sample`     | Download the example workbook             |
//! | GET    | `/api/logs?job=`  | SSE stream of one upload's logs           |
//!
//! The frontend picks a job id (a UUID), subscribes to `/api/logs?job=<id>`
//! and sends the same id in the `job` multipart field of the upload.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_error, JobLog, LogEntry, LOG_BROADCASTER};
use super::types::{error_response, UploadResponse};
use crate::error::ServerError;
use crate::sample::{sample_workbook, SAMPLE_FILE_NAME, SAMPLE_MIME};
use crate::transform::pipeline::{run_bytes, PipelineOptions};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the router (separate from [`start_server`] for tests).
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_workbook))
        .route("/api/sample", get(download_sample))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Combogen server running on http://localhost:{}", port);
    eprintln!("   POST /api/upload - Upload workbook");
    eprintln!("   GET  /api/sample - Example workbook");
    eprintln!("   GET  /api/logs   - SSE log stream (?job=<id>)");
    eprintln!("   GET  /health     - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "combogen",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "sample": "GET /api/sample",
            "logs": "GET /api/logs?job=<id> (SSE)"
        }
    }))
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    job: String,
}

/// SSE endpoint for one upload's log entries
async fn sse_logs(Query(query): Query<LogsQuery>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = job_entries(LOG_BROADCASTER.subscribe(), query.job).filter_map(|entry| {
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Entries of `job` only; lagged and foreign entries are skipped.
fn job_entries(rx: broadcast::Receiver<LogEntry>, job: String) -> impl Stream<Item = LogEntry> {
    BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(entry) if entry.belongs_to(&job) => Some(entry),
        _ => None,
    })
}

/// Example workbook download
async fn download_sample() -> Result<Response, (StatusCode, Json<UploadResponse>)> {
    let bytes = sample_workbook().map_err(|e| ServerError::Internal(e.to_string()).into_parts())?;
    let disposition = format!("attachment; filename=\"{}\"", SAMPLE_FILE_NAME);
    Ok((
        [(header::CONTENT_TYPE, SAMPLE_MIME.to_string()), (header::CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}

/// Upload endpoint: multipart fields `file` and optional `job`
async fn upload_workbook(mut multipart: Multipart) -> Result<Json<UploadResponse>, (StatusCode, Json<UploadResponse>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut job_field: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)).into_parts())?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)).into_parts())?;
                file_data = Some(bytes.to_vec());
            }
            Some("job") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)).into_parts())?;
                job_field = Some(text);
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()).into_parts())?;
    let job_id = resolve_job_id(job_field.as_deref());

    eprintln!("\n{}", "=".repeat(70));
    eprintln!(
        "📄 NEW UPLOAD {}: {} ({} bytes)",
        job_id,
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );
    eprintln!("{}\n", "=".repeat(70));

    let options = PipelineOptions::for_job(job_id.clone());
    let output = tokio::task::spawn_blocking(move || run_bytes(&bytes, &options))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()).into_parts())?
        .map_err(|source| {
            ServerError::Pipeline {
                job_id: job_id.clone(),
                source,
            }
            .into_parts()
        })?;

    let response =
        UploadResponse::ready(&job_id, &output).map_err(|e| ServerError::Internal(e.to_string()).into_parts())?;
    JobLog::new(Some(job_id)).info(format!("📦 {} rows ready for download", output.combinations.len()));

    Ok(Json(response))
}

/// The client's job id when it is a UUID, a fresh one otherwise.
fn resolve_job_id(requested: Option<&str>) -> String {
    requested
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string()
}

impl ServerError {
    /// Status code and body for this error.
    ///
    /// Pipeline failures are 422 so the frontend can tell them from
    /// transport problems.
    fn into_parts(self) -> (StatusCode, Json<UploadResponse>) {
        match self {
            ServerError::Pipeline { job_id, source } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(UploadResponse::failed(&job_id, &source)),
            ),
            ServerError::BadRequest(msg) => {
                log_error(&msg);
                (StatusCode::BAD_REQUEST, Json(error_response(&msg)))
            }
            ServerError::Internal(msg) => {
                log_error(&msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&msg)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, ValidationError};

    #[test]
    fn test_pipeline_errors_are_unprocessable() {
        let err = ServerError::Pipeline {
            job_id: "job-1".into(),
            source: PipelineError::Validation(ValidationError::new(vec!["x".into()])),
        };
        let (status, Json(body)) = err.into_parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.status, "invalid");
        assert_eq!(body.job_id, "job-1");
    }

    #[test]
    fn test_bad_request() {
        let (status, Json(body)) = ServerError::BadRequest("No file provided".into()).into_parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("No file provided"));
    }

    #[tokio::test]
    async fn test_health() {
        let Json(value) = health().await;
        assert_eq!(value["service"], "combogen");
    }

    #[test]
    fn test_resolve_job_id() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(resolve_job_id(Some(id)), id);
        let fresh = resolve_job_id(Some("not-a-uuid"));
        assert_ne!(fresh, "not-a-uuid");
        assert!(Uuid::parse_str(&fresh).is_ok());
        assert!(Uuid::parse_str(&resolve_job_id(None)).is_ok());
    }

    #[tokio::test]
    async fn test_log_stream_is_scoped_to_its_job() {
        let broadcaster = crate::api::logs::LogBroadcaster::new();
        let first = job_entries(broadcaster.subscribe(), "job-a".to_string());
        let second = job_entries(broadcaster.subscribe(), "job-b".to_string());

        broadcaster.log(LogEntry::warning("Prompt 'secret-client-prompt' has no rows").for_job(Some("job-a".into())));
        broadcaster.log(LogEntry::info("Generated 2 rows").for_job(Some("job-b".into())));
        broadcaster.log(LogEntry::error("Multipart error: boom"));
        drop(broadcaster);

        let first: Vec<String> = first.map(|e| e.message).collect().await;
        let second: Vec<String> = second.map(|e| e.message).collect().await;
        assert_eq!(first, vec!["Prompt 'secret-client-prompt' has no rows"]);
        assert_eq!(second, vec!["Generated 2 rows"]);
    }
}
