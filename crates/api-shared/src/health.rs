use crate::HealthRes;

/// Simple health service used by the REST API.
///
/// Reports liveness only; it touches no files and calls no converter.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes { ok: true }
    }
}
