// src/config.rs

use std::env;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend (e.g. "https://project.example.co").
    pub backend_url: String,

    /// Publishable API key sent with every request.
    pub api_key: String,

    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let backend_url = env::var("LMS_BACKEND_URL").expect("LMS_BACKEND_URL must be set");

        let api_key = env::var("LMS_API_KEY").expect("LMS_API_KEY must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            backend_url,
            api_key,
            rust_log,
        }
    }
}
