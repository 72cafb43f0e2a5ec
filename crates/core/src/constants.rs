//! Constants used throughout the ConvertX core crate.
//!
//! Directory names and defaults live here so the on-disk layout is defined in one place.

/// Default root for all staged and produced files when no data directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Directory under the data root holding staged uploads.
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Directory under the data root holding conversion results.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Request-scoped subdirectory used by the HTTP API inside both roots.
pub const API_SCOPE_DIR_NAME: &str = "api";

/// Default converter program, resolved through `PATH`.
pub const DEFAULT_CONVERTER_PROGRAM: &str = "convertx-convert";

/// The only status string a converter may report for success.
pub const DONE_STATUS: &str = "Done";

/// Default request body limit for uploads, in MiB.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;
