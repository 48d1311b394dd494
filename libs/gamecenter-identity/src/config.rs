/// Host suffix of the Game Center certificate servers.
pub const DEFAULT_TRUSTED_HOST_SUFFIX: &str = ".apple.com";

/// Verifier settings.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// A certificate URL is only fetched when its host ends with this suffix.
    pub trusted_host_suffix: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            trusted_host_suffix: DEFAULT_TRUSTED_HOST_SUFFIX.to_string(),
        }
    }
}

impl VerifierConfig {
    pub fn with_trusted_host_suffix(suffix: impl Into<String>) -> Self {
        Self {
            trusted_host_suffix: suffix.into(),
        }
    }
}
