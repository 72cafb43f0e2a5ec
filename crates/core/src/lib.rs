//! # ConvertX Core
//!
//! The request-processing pipeline behind the ConvertX conversion endpoint:
//! - naming jobs with collision-free input/output paths ([`paths`])
//! - staging uploads on disk ([`staging`])
//! - calling the external converter and interpreting its status ([`converter`])
//! - normalising requested target formats ([`formats`])
//!
//! **No API concerns**: authentication, multipart parsing and HTTP responses belong in
//! `api-shared` and `api-rest`.

pub mod config;
pub mod constants;
pub mod converter;
pub mod error;
pub mod formats;
pub mod paths;
pub mod service;
pub mod staging;

pub use config::CoreConfig;
pub use constants::{DEFAULT_DATA_DIR, DEFAULT_MAX_UPLOAD_MB};
pub use converter::{
    CommandConverter, ConversionInvoker, ConversionOutcome, ConversionStatus, Converter,
    ConverterError,
};
pub use convertx_uuid::JobId;
pub use error::{BadRequestKind, ConversionFailure, ConvertError, CoreResult};
pub use formats::{FormatNormalizer, KnownFormats, NormalizedFormat};
pub use paths::{PathNamer, StagedJob};
pub use service::{ConvertService, Upload};
pub use staging::FileStager;
