use std::{env, time::Duration};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "./web/admin";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup,
/// immutable afterwards, and pulled into handlers through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which variables are mandatory.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Directory holding the built admin dashboard, served at `/admin/`.
    pub static_dir: String,
    // Upper bound on the time spent handling a single request.
    pub request_timeout_secs: u64,
    // Whether the in-memory store starts with the mock users, listings and categories.
    pub seed_mock_data: bool,
}

/// Env
///
/// Defines the runtime context: human-readable logs and relaxed defaults locally,
/// JSON logs and explicit settings in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Test-safe values that need no environment variables. Binds an ephemeral port.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:0".to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            seed_mock_data: true,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `BIND_ADDR` is not set, so the service never
    /// silently listens on a default interface.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = match env {
            Env::Production => {
                env::var("BIND_ADDR").expect("FATAL: BIND_ADDR must be set in production.")
            }
            Env::Local => env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        };

        Self {
            env,
            bind_addr,
            static_dir: env::var("ADMIN_STATIC_DIR")
                .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            seed_mock_data: env::var("SEED_MOCK_DATA")
                .map(|value| parse_flag(&value))
                .unwrap_or(true),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Anything other than an explicit "off" value keeps the flag enabled.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
