//! Job identifiers.
//!
//! Every conversion request is assigned a fresh identifier that names both its staged input and
//! its produced output. The identifier is the only thing that makes artefact names unique, so two
//! requests for the same upload never overwrite one another.
//!
//! ConvertX uses a *canonical* representation for job identifiers: **32 lowercase hexadecimal
//! characters** (no hyphens), i.e. the simple form of a random version 4 UUID.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`

mod service;

pub use service::JobId;
