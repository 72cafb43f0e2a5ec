use crate::response::error_response;
use api_shared::AuthError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use convertx_core::{BadRequestKind, ConvertError};

/// Everything a REST handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Convert(ConvertError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Convert(ConvertError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Convert(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart(e) => e.status(),
        }
    }

    /// The message returned to the client; never contains paths or library errors.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Convert(e) => e.client_message(),
            ApiError::Multipart(_) => "invalid multipart body".into(),
        }
    }
}

impl From<BadRequestKind> for ApiError {
    fn from(kind: BadRequestKind) -> Self {
        ApiError::Convert(ConvertError::BadRequest(kind))
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Convert(ConvertError::Unauthorized)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        error_response(status, self.client_message())
    }
}
