//! Artefact naming.
//!
//! Every job gets a fresh [`JobId`] and both of its files are named after it:
//!
//! ```text
//! <staging_root>/<id><input_ext>     e.g. uploads/api/550e…0000.PNG
//! <output_root>/<id>.<format>        e.g. output/api/550e…0000.webp
//! ```
//!
//! The uploaded file's base name never reaches the filesystem. Only its extension survives, as
//! the input suffix and as the input type handed to the converter.

use crate::formats::NormalizedFormat;
use convertx_uuid::JobId;
use std::path::{Path, PathBuf};

/// Paths and types for one conversion job. Immutable once named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedJob {
    id: JobId,
    input_path: PathBuf,
    output_path: PathBuf,
    input_type: String,
    output_type: NormalizedFormat,
    input_ext: String,
}

impl StagedJob {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Extension of the upload without its leading dot, case preserved. Empty when none.
    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    pub fn output_type(&self) -> &NormalizedFormat {
        &self.output_type
    }

    /// Extension of the upload including its leading dot. Empty when none.
    pub fn input_ext(&self) -> &str {
        &self.input_ext
    }

    /// File name of the output artefact, `{id}.{format}`.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.id, self.output_type)
    }
}

/// Derives collision-free input and output paths under two roots.
#[derive(Debug, Clone)]
pub struct PathNamer {
    staging_root: PathBuf,
    output_root: PathBuf,
}

impl PathNamer {
    pub fn new(staging_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Names a new job for an upload called `file_name` converting to `format`.
    pub fn name(&self, file_name: &str, format: &NormalizedFormat) -> StagedJob {
        self.name_with_id(JobId::new(), file_name, format)
    }

    fn name_with_id(&self, id: JobId, file_name: &str, format: &NormalizedFormat) -> StagedJob {
        let input_ext = extension_with_dot(file_name);
        let input_type = input_ext.strip_prefix('.').unwrap_or_default().to_owned();

        StagedJob {
            id,
            input_path: self.staging_root.join(format!("{id}{input_ext}")),
            output_path: self.output_root.join(format!("{id}.{format}")),
            input_type,
            output_type: format.clone(),
            input_ext,
        }
    }
}

/// `".png"` for `"photo.png"`, `""` for `"README"` or `".bashrc"`, `"."` for `"name."`.
///
/// Only the last path component is considered, so directory parts in a client supplied name
/// cannot influence where the input lands.
fn extension_with_dot(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
