pub mod tier_limits;

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

const MAX_DEDUP_WINDOW_DAYS: i64 = 3650;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationStoreKind {
    Redis,
    Memory,
}

impl FromStr for NotificationStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "redis" => Ok(NotificationStoreKind::Redis),
            "memory" => Ok(NotificationStoreKind::Memory),
            other => Err(anyhow!("expected redis or memory, got {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub redis_url: String,
    pub notification_store: NotificationStoreKind,
    pub db_max_connections: u32,
    pub db_connect_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,
    pub db_max_lifetime_seconds: u64,
    pub notification_dedup_window_days: i64,
    pub notification_cap: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let notification_dedup_window_days =
            check_dedup_window_days(env_or_parse("NOTIFICATION_DEDUP_WINDOW_DAYS", "1")?)?;
        let notification_cap: usize = env_or_parse("NOTIFICATION_CAP", "100")?;
        if notification_cap == 0 {
            return Err(anyhow!("invalid NOTIFICATION_CAP: must be at least 1"));
        }

        Ok(Self {
            http_addr,
            database_url: env_or_err("DATABASE_URL")?,
            redis_url: env_or("REDIS_URL", "redis://127.0.0.1/"),
            notification_store: env_or_parse("NOTIFICATION_STORE", "redis")?,
            db_max_connections: env_or_parse("DB_MAX_CONNECTIONS", "25")?,
            db_connect_timeout_seconds: env_or_parse("DB_CONNECT_TIMEOUT_SECONDS", "5")?,
            db_idle_timeout_seconds: env_or_parse("DB_IDLE_TIMEOUT_SECONDS", "300")?,
            db_max_lifetime_seconds: env_or_parse("DB_MAX_LIFETIME_SECONDS", "1800")?,
            notification_dedup_window_days,
            notification_cap,
        })
    }
}

fn check_dedup_window_days(days: i64) -> Result<i64> {
    if !(0..=MAX_DEDUP_WINDOW_DAYS).contains(&days) {
        return Err(anyhow!(
            "invalid NOTIFICATION_DEDUP_WINDOW_DAYS: must be between 0 and {}",
            MAX_DEDUP_WINDOW_DAYS
        ));
    }
    Ok(days)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
