use std::time::Duration;

const DEFAULT_JWT_SECRET: &str = "change-me";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Token configuration.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for signing tokens (default: `change-me`)
    /// - `JWT_TTL_SECONDS`: Token lifetime in seconds (default: 86400)
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the insecure default secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl = std::env::var("JWT_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS));

        Self {
            jwt_secret,
            token_ttl,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_one_day() {
        assert_eq!(AuthConfig::default().token_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: "super-secret".to_string(),
            token_ttl: Duration::from_secs(60),
        };
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
