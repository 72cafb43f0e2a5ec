//! Building HTTP responses from conversion results and failures.

use crate::error::ApiError;
use api_shared::ErrorRes;
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use convertx_core::{ConvertError, StagedJob};
use std::io::SeekFrom;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Bytes read from the start of an output file to sniff its media type.
pub const SNIFF_LEN: usize = 8192;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `{ "error": message }` with `status`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorRes::new(message))).into_response()
}

/// Best-effort media type: content sniffing first, then the file extension.
pub fn detect_media_type(head: &[u8], path: &Path) -> String {
    infer::get(head)
        .map(|kind| kind.mime_type().to_string())
        .or_else(|| mime_guess::from_path(path).first_raw().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}

/// `attachment; filename="<name>"`.
pub fn attachment_disposition(file_name: &str) -> String {
    let safe = file_name.replace(|c: char| c == '"' || c == '\\', "_");
    format!("attachment; filename=\"{safe}\"")
}

/// Streams a finished job's output file back to the client.
///
/// # Errors
///
/// Returns [`ConvertError::Output`] if the output file cannot be opened or read.
pub async fn file_response(job: &StagedJob) -> Result<Response, ApiError> {
    let path = job.output_path();
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| output_error(path, e))?;

    let mut head = Vec::with_capacity(SNIFF_LEN);
    (&mut file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .await
        .map_err(|e| output_error(path, e))?;
    file.seek(SeekFrom::Start(0))
        .await
        .map_err(|e| output_error(path, e))?;

    let content_type = detect_media_type(&head, path);
    let disposition = attachment_disposition(&job.output_file_name());

    tracing::info!(
        job_id = %job.id(),
        content_type = %content_type,
        "streaming conversion output"
    );

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

fn output_error(path: &Path, e: std::io::Error) -> ApiError {
    ConvertError::Output(std::io::Error::new(
        e.kind(),
        format!("Failed to read output {}: {}", path.display(), e),
    ))
    .into()
}
