//! The external conversion step.
//!
//! ConvertX does not convert anything itself. A [`Converter`] is handed the staged input and the
//! path the output must be written to, and reports back through [`ConversionStatus`]. The
//! [`ConversionInvoker`] turns that report into a [`ConversionOutcome`].
//!
//! [`CommandConverter`] is the implementation used in production: it runs a converter program
//! as a child process.

use crate::constants::DONE_STATUS;
use crate::error::ConversionFailure;
use crate::paths::StagedJob;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// What a converter reports when it finishes without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStatus {
    /// Output was written and is readable.
    Done,
    /// Finished without producing output; carries the raw status verbatim.
    Incomplete(String),
}

impl ConversionStatus {
    /// `"Done"` is the only success sentinel; anything else is kept as the failure status.
    pub fn from_raw(status: impl Into<String>) -> Self {
        let status = status.into();
        if status == DONE_STATUS {
            ConversionStatus::Done
        } else {
            ConversionStatus::Incomplete(status)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("failed to start converter {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("converter I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("converter exited unsuccessfully ({status})")]
    Exited { status: String },
    #[error("conversion did not finish within {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Other(String),
}

/// Contract for the external conversion engine.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Converts `input_path` (of `input_type`) to `target_type`, writing `output_path`.
    async fn convert(
        &self,
        input_path: &Path,
        input_type: &str,
        target_type: &str,
        output_path: &Path,
    ) -> Result<ConversionStatus, ConverterError>;
}

/// Result of running a job through the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Done,
    Failed(ConversionFailure),
}

impl ConversionOutcome {
    pub fn into_result(self) -> Result<(), ConversionFailure> {
        match self {
            ConversionOutcome::Done => Ok(()),
            ConversionOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// Calls a [`Converter`] for a staged job and interprets its answer.
///
/// No retries. Without a timeout a converter that never returns keeps the caller waiting
/// indefinitely.
#[derive(Clone)]
pub struct ConversionInvoker {
    converter: std::sync::Arc<dyn Converter>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ConversionInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionInvoker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConversionInvoker {
    pub fn new(converter: std::sync::Arc<dyn Converter>) -> Self {
        Self {
            converter,
            timeout: None,
        }
    }

    /// Bounds each conversion; an elapsed timeout is treated like a converter error.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn invoke(&self, job: &StagedJob) -> ConversionOutcome {
        let call = self.converter.convert(
            job.input_path(),
            job.input_type(),
            job.output_type().as_str(),
            job.output_path(),
        );

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ConverterError::Timeout(limit)),
            },
            None => call.await,
        };

        match result {
            Ok(ConversionStatus::Done) => {
                tracing::info!(
                    job_id = %job.id(),
                    input_type = job.input_type(),
                    target_type = %job.output_type(),
                    "conversion done"
                );
                ConversionOutcome::Done
            }
            Ok(ConversionStatus::Incomplete(status)) => {
                tracing::warn!(job_id = %job.id(), status = %status, "conversion not done");
                ConversionOutcome::Failed(ConversionFailure::Status(status))
            }
            Err(e) => {
                tracing::error!(job_id = %job.id(), error = %e, "conversion error");
                ConversionOutcome::Failed(ConversionFailure::Raised)
            }
        }
    }
}

/// Runs an external program for each conversion.
///
/// Invocation: `<program> [args...] <input_path> <input_type> <target_type> <output_path>`.
///
/// - exit 0 reports [`ConversionStatus::Done`];
/// - a non-zero exit whose stdout ends with a non-empty line reports that line as an
///   [`ConversionStatus::Incomplete`] status, even when the line reads `Done`;
/// - any other non-zero exit, or death by signal, is a [`ConverterError::Exited`].
///
/// `input_type` is the upload's extension exactly as the client sent it and is passed as a bare
/// positional argument. It may start with `-` (an upload named `a.-rf` yields `-rf`), so the
/// converter program must parse its four job arguments by position and never as options.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the four job arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Converter for CommandConverter {
    async fn convert(
        &self,
        input_path: &Path,
        input_type: &str,
        target_type: &str,
        output_path: &Path,
    ) -> Result<ConversionStatus, ConverterError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(input_path)
            .arg(input_type)
            .arg(target_type)
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ConverterError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConverterError::Other("converter stderr not available".into()))?;
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(converter_stderr = %line, "converter log");
            }
        });

        let output = child.wait_with_output().await?;
        let _ = stderr_task.await;

        if output.status.success() {
            return Ok(ConversionStatus::Done);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.lines().map(str::trim).rfind(|line| !line.is_empty()) {
            Some(status) => Ok(ConversionStatus::Incomplete(status.to_owned())),
            None => Err(ConverterError::Exited {
                status: output.status.to_string(),
            }),
        }
    }
}
