use gamecenter_identity::config::DEFAULT_TRUSTED_HOST_SUFFIX;
use gamecenter_identity::VerifierConfig;

/// Identity API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Certificate URLs must point at a host ending with this suffix.
    pub trusted_host_suffix: String,
    /// When false, every verification fetches the certificate afresh.
    pub cert_cache_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables. All variables are optional.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4003),
            trusted_host_suffix: std::env::var("TRUSTED_HOST_SUFFIX")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_TRUSTED_HOST_SUFFIX.to_string()),
            cert_cache_enabled: std::env::var("CERT_CACHE_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
        }
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig::with_trusted_host_suffix(self.trusted_host_suffix.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4003,
            trusted_host_suffix: DEFAULT_TRUSTED_HOST_SUFFIX.to_string(),
            cert_cache_enabled: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
