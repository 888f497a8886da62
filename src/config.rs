use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub acquire_timeout_secs: u64,
}

impl Config {
	pub fn new(database_url: impl Into<String>) -> Self {
		Self {
			database_url: database_url.into(),
			acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
		}
	}

	pub fn from_env() -> Result<Self, ConfigError> {
		// Load .env file if it exists
		let _ = dotenvy::dotenv();

		Ok(Self {
			database_url: env::var("DATABASE_URL")
				.unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
			acquire_timeout_secs: match env::var("DB_ACQUIRE_TIMEOUT") {
				Ok(value) => value
					.parse()
					.map_err(|_| ConfigError::InvalidAcquireTimeout(value))?,
				Err(_) => DEFAULT_ACQUIRE_TIMEOUT_SECS,
			},
		})
	}

	pub fn acquire_timeout(&self) -> Duration {
		Duration::from_secs(self.acquire_timeout_secs)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid DB_ACQUIRE_TIMEOUT value: {0}")]
	InvalidAcquireTimeout(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_uses_default_timeout() {
		let config = Config::new("sqlite::memory:");

		assert_eq!(config.database_url, "sqlite::memory:");
		assert_eq!(config.acquire_timeout(), Duration::from_secs(3));
	}
}
