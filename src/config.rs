use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::client::DegradePolicy;
use crate::constants::{DEFAULT_SEARCH_LIMIT, DEMO_USER_ID, VIEWPORT_DEBOUNCE_MS};

/// Where annotations are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Invalid STORAGE_BACKEND: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub seed_demo_user: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "2022".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORAGE_BACKEND=postgres".to_string());
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let geocoder_url = env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string());

        let geocoder_user_agent = env::var("GEOCODER_USER_AGENT")
            .unwrap_or_else(|_| "MapApp/1.0 (contact@example.com)".to_string());

        let geocoder_timeout_secs = env::var("GEOCODER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODER_TIMEOUT_SECS")?;

        let seed_demo_user = env::var("SEED_DEMO_USER")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| "Invalid SEED_DEMO_USER")?;

        Ok(Config {
            server_host,
            server_port,
            storage_backend,
            database_url,
            allowed_origins,
            environment,
            geocoder_url,
            geocoder_user_agent,
            geocoder_timeout_secs,
            seed_demo_user,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }
}

/// Settings for the client-side resilient session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the sync API, e.g. `http://localhost:2022`
    pub base_url: String,
    /// Identity every annotation is created under
    pub user_id: i64,
    pub viewport_debounce: Duration,
    pub search_limit: u32,
    pub degrade_policy: DegradePolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_id: DEMO_USER_ID,
            viewport_debounce: Duration::from_millis(VIEWPORT_DEBOUNCE_MS),
            search_limit: DEFAULT_SEARCH_LIMIT,
            degrade_policy: DegradePolicy::default(),
        }
    }
}
