//! Server settings read from the environment (and `.env`, when present).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use log::LevelFilter;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub ticks_per_second: u32,
    pub world_path: PathBuf,
    pub log_level: LevelFilter,
    /// `None` disables the file appender.
    pub log_file: Option<String>,
    /// Game seconds that pass per real second.
    pub time_factor: f64,
    pub save_interval_seconds: u64,
    pub player_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 10,
            world_path: PathBuf::from(".dat/world.bin"),
            log_level: LevelFilter::Info,
            log_file: Some("server.log".to_string()),
            time_factor: 2.0,
            save_interval_seconds: 300,
            player_name: "Wanderer".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env is normal; only the process environment is used then.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("reading .env");
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("GLOAMING_TICKS") {
            config.ticks_per_second = parse_var("GLOAMING_TICKS", &v)?;
            if config.ticks_per_second == 0 {
                return Err(anyhow!("GLOAMING_TICKS must be at least 1"));
            }
        }
        if let Some(v) = lookup("GLOAMING_WORLD_PATH") {
            config.world_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("GLOAMING_LOG_LEVEL") {
            config.log_level = parse_var("GLOAMING_LOG_LEVEL", &v)?;
        }
        if let Some(v) = lookup("GLOAMING_LOG_FILE") {
            config.log_file = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("GLOAMING_TIME_FACTOR") {
            config.time_factor = parse_var("GLOAMING_TIME_FACTOR", &v)?;
            if config.time_factor.is_nan() || config.time_factor <= 0.0 {
                return Err(anyhow!("GLOAMING_TIME_FACTOR must be positive"));
            }
        }
        if let Some(v) = lookup("GLOAMING_SAVE_INTERVAL") {
            config.save_interval_seconds = parse_var("GLOAMING_SAVE_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("GLOAMING_PLAYER") {
            if !v.trim().is_empty() {
                config.player_name = v.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("invalid value {:?} for {}: {}", value, key, e))
}
