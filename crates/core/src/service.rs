//! The conversion pipeline: name, stage, convert.

use crate::config::CoreConfig;
use crate::converter::{CommandConverter, ConversionInvoker, Converter};
use crate::error::CoreResult;
use crate::formats::NormalizedFormat;
use crate::paths::{PathNamer, StagedJob};
use crate::staging::FileStager;
use bytes::Bytes;
use std::sync::Arc;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Runs validated uploads through staging and conversion.
///
/// Steps are strictly sequential: a job is named, its input is written, and only then is the
/// converter called. Staged files are left on disk whatever the outcome.
#[derive(Clone, Debug)]
pub struct ConvertService {
    namer: PathNamer,
    stager: FileStager,
    invoker: ConversionInvoker,
}

impl ConvertService {
    pub fn new(cfg: &CoreConfig, converter: Arc<dyn Converter>) -> Self {
        Self {
            namer: PathNamer::new(cfg.uploads_dir(), cfg.output_dir()),
            stager: FileStager::new(),
            invoker: ConversionInvoker::new(converter).with_timeout(cfg.conversion_timeout()),
        }
    }

    /// Service backed by the configured converter program.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        let converter = CommandConverter::new(cfg.converter_program())
            .with_args(cfg.converter_args().iter().cloned());
        Self::new(cfg, Arc::new(converter))
    }

    /// Converts `upload` to `format` and returns the job whose output is ready to read.
    ///
    /// # Errors
    ///
    /// - [`crate::ConvertError::Staging`] if the upload cannot be written.
    /// - [`crate::ConvertError::ConversionFailed`] if the converter errors or reports a status
    ///   other than `Done`.
    pub async fn convert(&self, upload: Upload, format: &NormalizedFormat) -> CoreResult<StagedJob> {
        let job = self.namer.name(&upload.file_name, format);
        self.stager.stage(&job, &upload.bytes).await?;
        drop(upload);

        self.invoker.invoke(&job).await.into_result()?;
        Ok(job)
    }
}
