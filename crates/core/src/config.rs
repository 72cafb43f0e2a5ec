//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables. The `*_from_env_value`
//! helpers take the raw `Option<String>` from the environment, which keeps them testable without
//! mutating the environment.

use crate::constants::{
    API_SCOPE_DIR_NAME, DEFAULT_CONVERTER_PROGRAM, DEFAULT_DATA_DIR, OUTPUT_DIR_NAME,
    UPLOADS_DIR_NAME,
};
use crate::{ConvertError, CoreResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    converter_program: PathBuf,
    converter_args: Vec<String>,
    conversion_timeout: Option<Duration>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        data_dir: PathBuf,
        converter_program: PathBuf,
        converter_args: Vec<String>,
        conversion_timeout: Option<Duration>,
    ) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(ConvertError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }
        if converter_program.as_os_str().is_empty() {
            return Err(ConvertError::InvalidInput(
                "converter program cannot be empty".into(),
            ));
        }
        if conversion_timeout == Some(Duration::ZERO) {
            return Err(ConvertError::InvalidInput(
                "conversion timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            data_dir,
            converter_program,
            converter_args,
            conversion_timeout,
        })
    }

    /// Configuration with every default applied, rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::new(
            data_dir.into(),
            PathBuf::from(DEFAULT_CONVERTER_PROGRAM),
            Vec::new(),
            None,
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where API uploads are staged: `<data_dir>/uploads/api`.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join(UPLOADS_DIR_NAME).join(API_SCOPE_DIR_NAME)
    }

    /// Where API conversion results are written: `<data_dir>/output/api`.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join(OUTPUT_DIR_NAME).join(API_SCOPE_DIR_NAME)
    }

    pub fn converter_program(&self) -> &Path {
        &self.converter_program
    }

    pub fn converter_args(&self) -> &[String] {
        &self.converter_args
    }

    pub fn conversion_timeout(&self) -> Option<Duration> {
        self.conversion_timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Data directory from an optional value, defaulting to `data`.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Converter program from an optional value, defaulting to `convertx-convert`.
pub fn converter_program_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTER_PROGRAM))
}

/// Whitespace separated converter arguments. Missing or blank means no arguments.
pub fn converter_args_from_env_value(value: Option<String>) -> Vec<String> {
    value
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Comma separated list, entries trimmed, blanks dropped.
pub fn list_from_env_value(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Conversion timeout in whole seconds. Missing or blank means no timeout.
pub fn timeout_from_env_value(value: Option<String>) -> CoreResult<Option<Duration>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConvertError::InvalidInput(format!(
                        "conversion timeout must be a positive number of seconds, got: '{v}'"
                    ))
                })
        })
        .transpose()
}

/// Upload limit in MiB, returned in bytes. Missing or blank means `default_mb`.
pub fn upload_limit_from_env_value(value: Option<String>, default_mb: usize) -> CoreResult<usize> {
    let mb = match non_blank(value) {
        Some(v) => v
            .parse::<usize>()
            .ok()
            .filter(|mb| *mb > 0)
            .ok_or_else(|| {
                ConvertError::InvalidInput(format!(
                    "upload limit must be a positive number of MiB, got: '{v}'"
                ))
            })?,
        None => default_mb,
    };
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| ConvertError::InvalidInput(format!("upload limit too large: {mb} MiB")))
}
