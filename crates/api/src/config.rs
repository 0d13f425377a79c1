use std::str::FromStr;

use openlaunch_core::capacity::{
    SlotCapacityPolicy, TierLimits, DEFAULT_FREE_DAILY_LIMIT, DEFAULT_FREE_MAX_DAYS_AHEAD,
    DEFAULT_FREE_MIN_DAYS_AHEAD, DEFAULT_PREMIUM_DAILY_LIMIT, DEFAULT_PREMIUM_MAX_DAYS_AHEAD,
    DEFAULT_PREMIUM_MIN_DAYS_AHEAD, DEFAULT_PREMIUM_PLUS_DAILY_LIMIT,
    DEFAULT_PREMIUM_PLUS_MAX_DAYS_AHEAD, DEFAULT_PREMIUM_PLUS_MIN_DAYS_AHEAD,
    DEFAULT_USER_DAILY_LAUNCH_LIMIT,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
    /// Chat webhook receiving launch announcements. Disabled when unset.
    pub launch_webhook_url: Option<String>,
    /// Public site root used in notification links.
    pub app_url: String,
    /// Launch capacity per tier and per user.
    pub policy: SlotCapacityPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `LAUNCH_WEBHOOK_URL`   | unset (notifications off)  |
    /// | `APP_URL`              | `http://localhost:3000`    |
    ///
    /// plus the JWT variables read by [`JwtConfig::from_env`] and the
    /// capacity variables read by [`policy_from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30);

        let launch_webhook_url = std::env::var("LAUNCH_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            launch_webhook_url,
            app_url,
            policy: policy_from_env(),
        }
    }
}

/// Load the launch capacity policy from environment variables.
///
/// | Env Var                       | Default |
/// |-------------------------------|---------|
/// | `FREE_DAILY_LIMIT`            | `10`    |
/// | `FREE_MIN_DAYS_AHEAD`         | `1`     |
/// | `FREE_MAX_DAYS_AHEAD`         | `90`    |
/// | `PREMIUM_DAILY_LIMIT`         | `5`     |
/// | `PREMIUM_MIN_DAYS_AHEAD`      | `1`     |
/// | `PREMIUM_MAX_DAYS_AHEAD`      | `30`    |
/// | `PREMIUM_PLUS_DAILY_LIMIT`    | `3`     |
/// | `PREMIUM_PLUS_MIN_DAYS_AHEAD` | `1`     |
/// | `PREMIUM_PLUS_MAX_DAYS_AHEAD` | `14`    |
/// | `USER_DAILY_LAUNCH_LIMIT`     | `1`     |
///
/// # Panics
///
/// Panics on unparsable values, negative limits, or a minimum lead time
/// above the maximum, so misconfiguration fails fast at startup.
pub fn policy_from_env() -> SlotCapacityPolicy {
    let tier = |prefix: &str, limit: i64, min: i64, max: i64| {
        TierLimits::new(
            env_or(&format!("{prefix}_DAILY_LIMIT"), limit),
            env_or(&format!("{prefix}_MIN_DAYS_AHEAD"), min),
            env_or(&format!("{prefix}_MAX_DAYS_AHEAD"), max),
        )
    };

    SlotCapacityPolicy::new(
        tier(
            "FREE",
            DEFAULT_FREE_DAILY_LIMIT,
            DEFAULT_FREE_MIN_DAYS_AHEAD,
            DEFAULT_FREE_MAX_DAYS_AHEAD,
        ),
        tier(
            "PREMIUM",
            DEFAULT_PREMIUM_DAILY_LIMIT,
            DEFAULT_PREMIUM_MIN_DAYS_AHEAD,
            DEFAULT_PREMIUM_MAX_DAYS_AHEAD,
        ),
        tier(
            "PREMIUM_PLUS",
            DEFAULT_PREMIUM_PLUS_DAILY_LIMIT,
            DEFAULT_PREMIUM_PLUS_MIN_DAYS_AHEAD,
            DEFAULT_PREMIUM_PLUS_MAX_DAYS_AHEAD,
        ),
        env_or("USER_DAILY_LAUNCH_LIMIT", DEFAULT_USER_DAILY_LAUNCH_LIMIT),
    )
    .unwrap_or_else(|e| panic!("Invalid launch capacity configuration: {e}"))
}

/// Parse `name` from the environment, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}
