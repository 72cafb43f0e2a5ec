//! Shared-secret authentication.
//!
//! The secret is read once at startup and injected into an [`ApiKeyGuard`]. A guard built
//! without a secret accepts every request.

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing x-api-key header")]
    Missing,
    #[error("invalid API key")]
    Invalid,
}

/// Validates provided API keys against an optional configured secret.
#[derive(Clone, Default)]
pub struct ApiKeyGuard {
    expected: Option<String>,
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl ApiKeyGuard {
    /// A guard requiring `expected`. `None` or an empty secret disables the check.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|key| !key.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.expected.is_some()
    }

    /// Validates the value of the API key header, if the request carried one.
    ///
    /// Returns `Ok(())` when no secret is configured or the key matches exactly.
    pub fn validate(&self, provided: Option<&str>) -> Result<(), AuthError> {
        let Some(expected) = self.expected.as_deref() else {
            return Ok(());
        };

        match provided {
            None => Err(AuthError::Missing),
            Some(key) if key == expected => Ok(()),
            Some(_) => Err(AuthError::Invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_guard_accepts_anything() {
        let guard = ApiKeyGuard::new(None);

        assert!(!guard.is_enabled());
        assert_eq!(guard.validate(None), Ok(()));
        assert_eq!(guard.validate(Some("whatever")), Ok(()));
    }

    #[test]
    fn test_empty_secret_disables_guard() {
        let guard = ApiKeyGuard::new(Some(String::new()));

        assert!(!guard.is_enabled());
        assert_eq!(guard.validate(None), Ok(()));
    }

    #[test]
    fn test_enabled_guard() {
        let guard = ApiKeyGuard::new(Some("secret".into()));

        assert_eq!(guard.validate(Some("secret")), Ok(()));
        assert_eq!(guard.validate(Some("wrong")), Err(AuthError::Invalid));
        assert_eq!(guard.validate(Some("Secret")), Err(AuthError::Invalid));
        assert_eq!(guard.validate(Some("")), Err(AuthError::Invalid));
        assert_eq!(guard.validate(None), Err(AuthError::Missing));
    }

    #[test]
    fn test_debug_does_not_print_secret() {
        let guard = ApiKeyGuard::new(Some("hunter2".into()));
        assert!(!format!("{guard:?}").contains("hunter2"));
    }
}
