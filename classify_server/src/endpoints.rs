//! Endpoints of the HTTP server.
//!
use std::{
    path::{Path as FsPath, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Multipart, Path, Query},
    http::{header, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use common::Classification;

use crate::{
    meter::METER,
    nn::{classify_path, InferModel},
    render::{render_index, ResultView},
};

/// Immutable state shared by all request handlers.
pub struct ServerContext {
    pub model: Box<dyn InferModel + Send + Sync>,
    pub upload_dir: PathBuf,
}

/// Search parameters of the upload responder.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Cache-busting marker appended by the result page; unused on the server.
    #[serde(default)]
    v: Option<u64>,
}

/// Headers disabling client-side caching, set on every response.
fn no_cache_headers() -> [(HeaderName, &'static str); 3] {
    [
        (
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, max-age=0",
        ),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

/// Health check endpoint.
pub async fn healthcheck() -> impl IntoResponse {
    (no_cache_headers(), "healthy")
}

/// Empty upload form.
pub async fn index() -> impl IntoResponse {
    (no_cache_headers(), Html(render_index(None)))
}

/// Classify an uploaded scan and render the result page.
///
/// A request without a `file` part or with an empty filename renders the
/// same empty page as a GET.
pub async fn classify_upload(
    Extension(ctx): Extension<Arc<ServerContext>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    METER.tick_upload();

    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.is_empty());

        match (file_name, field.bytes().await) {
            (Some(name), Ok(data)) => upload = Some((name, data)),
            _ => {}
        }
    }

    let (file_name, data) = match upload {
        Some(upload) => upload,
        None => return (no_cache_headers(), Html(render_index(None))),
    };

    // Keep only the final path component of the client-supplied name.
    let file_name = match FsPath::new(&file_name).file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_owned(),
        None => return (no_cache_headers(), Html(render_index(None))),
    };

    let filepath = ctx.upload_dir.join(&file_name);
    let classification = match tokio::fs::write(&filepath, &data).await {
        Ok(()) => classify_path(ctx.model.as_ref(), &filepath),
        Err(err) => Classification::Failed(err.to_string()),
    };

    match &classification {
        Classification::Predicted(prediction) => {
            METER.tick_classified();
            log::info!(
                "Classified {} as {} ({:.4})",
                &file_name,
                prediction.class,
                prediction.confidence
            );
        }
        Classification::Failed(reason) => {
            log::warn!("Classification of {} failed: {}", &file_name, reason);
        }
    }

    let timestamp = unix_timestamp();
    let image_url = format!("/static/uploads/{}?v={}", &file_name, timestamp);
    let view = ResultView::new(&classification, image_url);

    (no_cache_headers(), Html(render_index(Some(&view))))
}

/// Serve a previously saved upload.
pub async fn uploaded_file(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(file_name): Path<String>,
    Query(params): Query<UploadParams>,
) -> Response {
    log::debug!("Upload {} requested (v={:?})", &file_name, params.v);

    match tokio::fs::read(ctx.upload_dir.join(&file_name)).await {
        Ok(data) => {
            let headers = [(header::CONTENT_TYPE, content_type_for(&file_name))];
            (no_cache_headers(), headers, data).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, no_cache_headers(), "not found").into_response(),
    }
}

/// Guess the content type from the file extension.
// TODO: Sniff the content type from the file header instead of the extension.
fn content_type_for(file_name: &str) -> &'static str {
    let extension = FsPath::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("scan.png"), "image/png");
        assert_eq!(content_type_for("scan.JPG"), "image/jpeg");
        assert_eq!(content_type_for("scan.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("scan.webp"), "image/webp");
    }

    #[test]
    fn test_content_type_fallback() {
        assert_eq!(content_type_for("scan"), "application/octet-stream");
        assert_eq!(content_type_for("scan.h5"), "application/octet-stream");
    }

    #[test]
    fn test_no_cache_headers_complete() {
        let headers = no_cache_headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers[0].1,
            "no-store, no-cache, must-revalidate, max-age=0"
        );
        assert_eq!(headers[1].1, "no-cache");
        assert_eq!(headers[2].1, "0");
    }
}
