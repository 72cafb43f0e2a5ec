use std::fmt;

/// The four ways a request can be rejected before anything is written to disk.
///
/// The `Display` output of each kind is the exact message returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadRequestKind {
    ExpectedMultipart,
    MissingFile,
    MissingTargetFormat,
    InvalidTargetFormat,
}

impl fmt::Display for BadRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            BadRequestKind::ExpectedMultipart => "expected multipart/form-data",
            BadRequestKind::MissingFile => "missing file field",
            BadRequestKind::MissingTargetFormat => "missing target_format field",
            BadRequestKind::InvalidTargetFormat => "invalid target_format",
        };
        f.write_str(message)
    }
}

/// Why a conversion did not produce output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    /// The converter returned an error (or timed out). Details are logged, not exposed.
    Raised,
    /// The converter finished with a status other than `Done`.
    Status(String),
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionFailure::Raised => f.write_str("conversion_failed"),
            ConversionFailure::Status(status) => write!(f, "conversion_failed_status_{status}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(BadRequestKind),
    #[error("failed to stage upload: {0}")]
    Staging(std::io::Error),
    #[error("failed to read conversion output: {0}")]
    Output(std::io::Error),
    #[error("{0}")]
    ConversionFailed(ConversionFailure),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ConvertError {
    /// The message safe to hand back to a caller.
    ///
    /// I/O failures collapse to a generic `io_error` so paths and OS messages stay server-side.
    pub fn client_message(&self) -> String {
        match self {
            ConvertError::Staging(_) | ConvertError::Output(_) => "io_error".into(),
            ConvertError::InvalidInput(_) => "invalid_input".into(),
            other => other.to_string(),
        }
    }
}

impl From<BadRequestKind> for ConvertError {
    fn from(kind: BadRequestKind) -> Self {
        ConvertError::BadRequest(kind)
    }
}

impl From<ConversionFailure> for ConvertError {
    fn from(failure: ConversionFailure) -> Self {
        ConvertError::ConversionFailed(failure)
    }
}

pub type CoreResult<T> = std::result::Result<T, ConvertError>;
