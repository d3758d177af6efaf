/// 환경 변수 기반 설정
// region:    --- Imports
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수 {0} 가 설정되지 않았습니다")]
    Missing(&'static str),
    #[error("환경 변수 {name} 값이 올바르지 않습니다: {value}")]
    Invalid { name: &'static str, value: String },
}
// endregion: --- Config Error

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: String,
    pub publish_events: bool,
    pub kafka_brokers: String,
    pub events_topic: String,
    pub outbox_poll_interval: Duration,
    pub outbox_batch_size: i64,
    pub outbox_retention: Duration,
}

impl Config {
    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let poll_ms: u64 = parse_or(&lookup, "OUTBOX_POLL_INTERVAL_MS", 1000)?;
        let retention_hours: u64 = parse_or(&lookup, "OUTBOX_RETENTION_HOURS", 24)?;

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            publish_events: parse_or(&lookup, "PUBLISH_EVENTS", true)?,
            kafka_brokers: lookup("KAFKA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
            events_topic: lookup("AUCTION_EVENTS_TOPIC").unwrap_or_else(|| "auctions".to_string()),
            outbox_poll_interval: Duration::from_millis(poll_ms),
            outbox_batch_size: parse_or(&lookup, "OUTBOX_BATCH_SIZE", 100)?,
            outbox_retention: Duration::from_secs(retention_hours * 3600),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
// endregion: --- Config
