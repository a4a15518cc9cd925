//! File upload and download handlers.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower_http::services::ServeFile;
use utoipa;

use crate::web::dto::UploadResponse;
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::StashError;

/// How much of a multipart request body is accepted during parsing (32 MiB).
///
/// This bounds the request body, not the stored file size: it is set well
/// above the file size limit so an oversized file still reaches the
/// validator and gets a proper 400 instead of a transport-level rejection.
/// A body that exceeds even this buffer is reported as the same size
/// rejection (see [`multipart_read_error`]).
pub const MULTIPART_BUFFER_LIMIT: usize = 32 * 1024 * 1024;

/// Extensions accepted for upload (lowercase, with leading dot).
const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".txt", ".doc", ".docx", ".xls", ".xlsx",
];

/// Embedded browser upload form, served at `/`.
const INDEX_HTML: &str = include_str!("index.html");

/// Derive a safe filename from a client-supplied one.
///
/// Every `/` and `\` becomes `_`, collapsing any path structure into a
/// single segment. No uniqueness token is added: re-uploading the same
/// name overwrites the earlier file.
pub fn safe_filename(original: &str) -> String {
    original.replace(['/', '\\'], "_")
}

/// Extract the lowercased extension (with dot) from a filename.
fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// The rejection for a file above the size limit.
fn file_too_large(max_size: u64) -> ApiError {
    let max_mb = max_size / 1024 / 1024;
    ApiError::bad_request(format!("file too large (max {max_mb}MB)"))
}

/// Map a multipart read failure to an API error.
///
/// A body that exceeds the parse buffer surfaces from the multipart reader
/// as a payload-too-large failure; report it as the file size rejection so
/// an oversized upload gets the same answer no matter how far over the
/// limit it is.
fn multipart_read_error(e: MultipartError, max_size: u64, fallback: &'static str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return file_too_large(max_size);
    }
    tracing::error!("Failed to read multipart field: {}", e);
    ApiError::bad_request(fallback)
}

/// Validate an uploaded file's size and extension.
///
/// Size first, so an oversized file is reported as too large regardless of
/// its extension.
fn validate_file(filename: &str, size: u64, max_size: u64) -> Result<(), ApiError> {
    if size > max_size {
        return Err(file_too_large(max_size));
    }

    let allowed = file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    if !allowed {
        return Err(ApiError::bad_request("file type not allowed"));
    }

    Ok(())
}

/// Content type for a stored filename.
///
/// Fixed table keyed by extension (case-insensitive); anything unknown is
/// served as application/octet-stream.
fn content_type_for(filename: &str) -> mime::Mime {
    match file_extension(filename).as_deref() {
        Some(".jpg") | Some(".jpeg") => mime::IMAGE_JPEG,
        Some(".png") => mime::IMAGE_PNG,
        Some(".gif") => mime::IMAGE_GIF,
        Some(".pdf") => mime::APPLICATION_PDF,
        Some(".txt") => mime::TEXT_PLAIN,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// GET / - Browser upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// OPTIONS /upload - bare success for preflight-style probes.
///
/// Real CORS preflights are answered by the CORS layer before they reach
/// the router; this covers plain OPTIONS requests.
pub async fn upload_preflight() -> StatusCode {
    StatusCode::OK
}

/// POST /upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" field ("image" is
/// accepted as a fallback field name for older clients).
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file, file too large, or disallowed type", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut file_part: Option<(String, Vec<u8>)> = None;
    let mut image_part: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        multipart_read_error(e, state.max_upload_size, "Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "image" => {
                let Some(filename) = field.file_name().map(|s| s.to_string()) else {
                    continue;
                };
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        multipart_read_error(e, state.max_upload_size, "Failed to read file")
                    })?
                    .to_vec();

                if name == "file" {
                    file_part = Some((filename, content));
                } else if image_part.is_none() {
                    image_part = Some((filename, content));
                }
            }
            _ => {}
        }
    }

    // "file" wins; "image" is the backward-compatible fallback
    let (original_name, content) = file_part
        .or(image_part)
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let size = content.len() as u64;
    validate_file(&original_name, size, state.max_upload_size)?;

    let filename = safe_filename(&original_name);

    state.storage.save(&filename, &content).map_err(|e| {
        tracing::error!("Failed to save file: {}", e);
        ApiError::internal("Failed to save file")
    })?;

    tracing::info!(filename = %filename, size = size, "File stored");

    let response = UploadResponse {
        url: format!("/files/{filename}"),
        filename,
        size,
        message: "File uploaded successfully".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /files/{filename} - Download a stored file.
///
/// The body is streamed through tower-http's file responder, which handles
/// byte-range and conditional (Last-Modified) requests.
#[utoipa::path(
    get,
    path = "/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Name of the file to download", example = "example.jpg")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Filename required"),
        (status = 404, description = "File not found")
    )
)]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Response {
    if filename.is_empty() {
        return (StatusCode::BAD_REQUEST, "Filename required").into_response();
    }

    let path = match state.storage.load(&filename) {
        Ok(path) => path,
        // A name the storage guard rejects cannot exist, so it reads as absent
        Err(StashError::NotFound(_)) | Err(StashError::Validation(_)) => {
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to resolve file: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load file").into_response();
        }
    };

    let content_type = content_type_for(&filename);

    match ServeFile::new_with_mime(&path, &content_type)
        .try_call(request)
        .await
    {
        Ok(response) => response.map(Body::new),
        Err(e) => {
            tracing::error!("Failed to serve file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load file").into_response()
        }
    }
}
