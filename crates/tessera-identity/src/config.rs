//! Identity configuration.

/// Configuration for the session registry.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Session lifetime in seconds when the caller does not supply a
    /// duration (default: 3600 = 1 hour).
    pub default_session_lifetime_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            default_session_lifetime_secs: 3600,
        }
    }
}
