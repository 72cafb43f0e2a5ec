//! Implementation of [`JobId`].

use std::fmt;
use uuid::Uuid;

/// Opaque, collision-free identifier for one conversion job.
///
/// Wraps a random (version 4) UUID, which carries 122 bits of randomness, so the probability of
/// two concurrent requests receiving the same identifier is negligible. The identifier always
/// displays in canonical form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl JobId {
    /// Generates a new identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
