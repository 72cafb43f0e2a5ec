//! Request validation for `POST /api/convert`.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. API key (only when a secret is configured)
//! 2. multipart content type
//! 3. `file` field present and a real file part
//! 4. `target_format` field present and non-empty
//! 5. `target_format` recognised by the normaliser
//!
//! The body is buffered in memory while parsing, so a rejected request never touches disk.

use crate::error::ApiError;
use api_shared::{ApiKeyGuard, API_KEY_HEADER};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap};
use convertx_core::{BadRequestKind, FormatNormalizer, NormalizedFormat, Upload};
use std::sync::Arc;

const FILE_FIELD: &str = "file";
const TARGET_FORMAT_FIELD: &str = "target_format";

/// A request that passed every check.
#[derive(Debug)]
pub struct ValidatedRequest {
    pub upload: Upload,
    pub format: NormalizedFormat,
}

#[derive(Clone)]
pub struct RequestValidator {
    guard: ApiKeyGuard,
    normalizer: Arc<dyn FormatNormalizer>,
}

impl std::fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestValidator")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl RequestValidator {
    pub fn new(guard: ApiKeyGuard, normalizer: Arc<dyn FormatNormalizer>) -> Self {
        Self { guard, normalizer }
    }

    pub fn check_api_key(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let provided = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        self.guard.validate(provided)?;
        Ok(())
    }

    /// Consumes the request and returns the upload and normalised target format.
    pub async fn validate(&self, request: Request) -> Result<ValidatedRequest, ApiError> {
        self.check_api_key(request.headers())?;
        check_content_type(request.headers())?;

        let mut multipart = Multipart::from_request(request, &()).await.map_err(|e| {
            tracing::debug!(error = %e, "multipart rejected");
            BadRequestKind::ExpectedMultipart
        })?;

        // The first field with a given name decides; a `file` field without a file name is a
        // plain string field and does not count as an upload.
        let mut file: Option<Option<Upload>> = None;
        let mut target: Option<String> = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(FILE_FIELD) if file.is_none() => {
                    let file_name = field.file_name().map(str::to_owned);
                    file = Some(match file_name {
                        Some(file_name) => Some(Upload::new(file_name, field.bytes().await?)),
                        None => None,
                    });
                }
                Some(TARGET_FORMAT_FIELD) if target.is_none() => {
                    target = Some(field.text().await?);
                }
                _ => {}
            }
        }

        let upload = file.flatten().ok_or(BadRequestKind::MissingFile)?;
        let target = target
            .filter(|t| !t.is_empty())
            .ok_or(BadRequestKind::MissingTargetFormat)?;
        let format = self
            .normalizer
            .normalize(&target)
            .ok_or(BadRequestKind::InvalidTargetFormat)?;

        tracing::debug!(
            file_name = %upload.file_name,
            bytes = upload.bytes.len(),
            target_format = %format,
            "request validated"
        );
        Ok(ValidatedRequest { upload, format })
    }
}

/// The content type must announce a multipart form body.
pub fn check_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        Ok(())
    } else {
        Err(BadRequestKind::ExpectedMultipart.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use convertx_core::KnownFormats;

    const BOUNDARY: &str = "convertx-test-boundary";

    fn validator(key: Option<&str>) -> RequestValidator {
        RequestValidator::new(
            ApiKeyGuard::new(key.map(str::to_owned)),
            Arc::new(KnownFormats::new()),
        )
    }

    /// `(name, Some(file_name) | None, value)`
    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request {
        let mut body = Vec::new();
        for (name, file_name, value) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        axum::http::Request::builder()
            .method("POST")
            .uri("/api/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn bad_request_kind(err: ApiError) -> BadRequestKind {
        match err {
            ApiError::Convert(convertx_core::ConvertError::BadRequest(kind)) => kind,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_valid_request() {
        let req = multipart_request(&[
            ("file", Some("photo.PNG"), "PNG-bytes"),
            ("target_format", None, "WebP"),
        ]);

        let validated = validator(None).validate(req).await.unwrap();

        assert_eq!(validated.upload.file_name, "photo.PNG");
        assert_eq!(&validated.upload.bytes[..], b"PNG-bytes");
        assert_eq!(validated.format.as_str(), "webp");
    }

    #[tokio::test]
    async fn test_field_order_does_not_matter() {
        let req = multipart_request(&[
            ("target_format", None, "pdf"),
            ("file", Some("a.docx"), "doc"),
        ]);

        let validated = validator(None).validate(req).await.unwrap();
        assert_eq!(validated.format.as_str(), "pdf");
    }

    #[tokio::test]
    async fn test_api_key_checked_before_content_type() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = validator(Some("secret")).validate(req).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_matching_api_key_passes() {
        let mut req = multipart_request(&[
            ("file", Some("a.png"), "x"),
            ("target_format", None, "jpg"),
        ]);
        req.headers_mut()
            .insert(API_KEY_HEADER, "secret".parse().unwrap());

        let validated = validator(Some("secret")).validate(req).await.unwrap();
        assert_eq!(validated.format.as_str(), "jpeg");
    }

    #[tokio::test]
    async fn test_rejects_non_multipart() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::ExpectedMultipart);
    }

    #[tokio::test]
    async fn test_rejects_multipart_without_boundary() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "multipart/form-data")
            .body(Body::empty())
            .unwrap();

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::ExpectedMultipart);
    }

    #[tokio::test]
    async fn test_string_file_field_is_missing_file() {
        let req = multipart_request(&[
            ("file", None, "just text"),
            ("file", Some("late.png"), "x"),
            ("target_format", None, "pdf"),
        ]);

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::MissingFile);
    }

    #[tokio::test]
    async fn test_missing_file_reported_before_missing_format() {
        let req = multipart_request(&[("other", None, "x")]);

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::MissingFile);
    }

    #[tokio::test]
    async fn test_empty_target_format_is_missing() {
        let req = multipart_request(&[
            ("file", Some("a.png"), "x"),
            ("target_format", None, ""),
        ]);

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::MissingTargetFormat);
    }

    #[tokio::test]
    async fn test_unknown_target_format() {
        let req = multipart_request(&[
            ("file", Some("a.png"), "x"),
            ("target_format", None, "xyz123"),
        ]);

        let err = validator(None).validate(req).await.unwrap_err();
        assert_eq!(bad_request_kind(err), BadRequestKind::InvalidTargetFormat);
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "Multipart/Form-Data; boundary=x".parse().unwrap(),
        );
        assert!(check_content_type(&headers).is_ok());

        assert!(check_content_type(&HeaderMap::new()).is_err());
    }
}
