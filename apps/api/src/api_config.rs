use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use appraisal_core::AppError;
use appraisal_domain::{DEFAULT_UTC_OFFSET_MINUTES, ReportingCalendar};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Backing document store selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

impl StoreConfig {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store: StoreConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub calendar: ReportingCalendar,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok(), env::args().nth(1).as_deref())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        first_arg: Option<&str>,
    ) -> Result<Self, AppError> {
        let migrate_only = first_arg == Some("migrate");

        let store = match optional(&lookup, "DOCUMENT_STORE")
            .unwrap_or_else(|| "postgres".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreConfig::Postgres {
                database_url: required(&lookup, "DATABASE_URL")?,
                max_connections: parsed_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "DOCUMENT_STORE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && store == StoreConfig::Memory {
            return Err(AppError::Validation(
                "migrate requires DOCUMENT_STORE=postgres".to_owned(),
            ));
        }

        let frontend_url =
            optional(&lookup, "FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".to_owned());
        let api_host = optional(&lookup, "API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_or(&lookup, "API_PORT", 3001)?;
        let calendar = ReportingCalendar::from_offset_minutes(parsed_or(
            &lookup,
            "REPORTING_UTC_OFFSET_MINUTES",
            DEFAULT_UTC_OFFSET_MINUTES,
        )?)?;

        Ok(Self {
            migrate_only,
            store,
            frontend_url,
            api_host,
            api_port,
            calendar,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    optional(lookup, name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parsed_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}
