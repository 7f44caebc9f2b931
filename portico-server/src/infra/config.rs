//! Runtime configuration, sourced from CLI flags and environment variables
//! (a `.env` file is honored in development).

/// Browser origins allowed when none are configured.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:8000"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            database_url: String::new(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cors_allowed_origins: DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}
