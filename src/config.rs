use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use strum::{Display, EnumString};

use crate::lifecycle::TransitionPolicy;
use crate::notify::DEFAULT_FCM_ENDPOINT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub api_prefix: String,
    pub log_dir: String,
    pub transition_policy: TransitionPolicy,

    // Fixed administrator login
    pub admin_id: String,
    pub admin_password: String,

    // Push notifications; no key means log-only delivery
    pub fcm_server_key: Option<String>,
    pub fcm_endpoint: String,

    // Rate limiting
    pub rate_login_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:5000".to_string(),
            store_backend: StoreBackend::Mysql,
            database_url: None,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            transition_policy: TransitionPolicy::default(),
            admin_id: "admin".to_string(),
            admin_password: "admin".to_string(),
            fcm_server_key: None,
            fcm_endpoint: DEFAULT_FCM_ENDPOINT.to_string(),
            rate_login_per_min: 60,
        }
    }
}

impl Config {
    /// Reads the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys take their defaults;
    /// set but unparsable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Self {
            server_addr: var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            store_backend: parse(&lookup, "STORE_BACKEND", defaults.store_backend)?,
            database_url: var("DATABASE_URL"),
            api_prefix: var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: var("LOG_DIR").unwrap_or(defaults.log_dir),
            transition_policy: parse(&lookup, "LEAVE_TRANSITION_POLICY", defaults.transition_policy)?,
            admin_id: var("ADMIN_ID").unwrap_or(defaults.admin_id),
            admin_password: var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            fcm_server_key: var("FCM_SERVER_KEY"),
            fcm_endpoint: var("FCM_ENDPOINT").unwrap_or(defaults.fcm_endpoint),
            rate_login_per_min: parse(&lookup, "RATE_LOGIN_PER_MIN", defaults.rate_login_per_min)?,
        };

        if config.store_backend == StoreBackend::Mysql && config.database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is mysql");
        }

        Ok(config)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: `{value}`")),
        None => Ok(default),
    }
}
