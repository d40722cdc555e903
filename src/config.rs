use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub log_level: String,

    // Timeouts
    pub request_timeout_ms: u64,

    // Session
    pub session_file: String,
    pub login_path: String,

    // Teklif
    pub default_provider: String,
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let api_url = env::var("API_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|_| "http://localhost:8099".to_string());
        reqwest::Url::parse(&api_url).map_err(|e| format!("API_URL geçersiz ({}): {}", api_url, e))?;

        Ok(Config {
            api_url,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(90000),

            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| ".sigorta/session.json".to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),

            default_provider: env::var("DEFAULT_PROVIDER").unwrap_or_else(|_| "sompo".to_string()),
            webhook_url: env::var("QUOTE_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
        })
    }
}
