use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Shown as the payee name inside generated UPI intents
    pub merchant_name: String,

    // Security
    pub jwt_secret: Secret<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(Self {
            database_url: config.get("database_url")?,
            host: config.get("host").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: config.get("port").unwrap_or(3000),

            merchant_name: config
                .get("merchant_name")
                .unwrap_or_else(|_| "Demo Merchant".to_string()),

            jwt_secret: Secret::new(config.get("jwt_secret")?),
        })
    }
}
