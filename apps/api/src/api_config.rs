use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use steward_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub seed_default_roles: bool,
}

impl ApiConfig {
    pub fn load() -> AppResult<Self> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env_u16("API_PORT", 3001)?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let seed_default_roles = parse_env_bool("SEED_DEFAULT_ROLES", true)?;

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            seed_default_roles,
        })
    }

    pub fn socket_address(&self) -> AppResult<SocketAddr> {
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

fn parse_env_u16(name: &str, default: u16) -> AppResult<u16> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u16>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(&value).ok_or_else(|| {
            AppError::Validation(format!("invalid {name} value '{value}': expected true or false"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, parse_bool};

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let config = ApiConfig {
            api_host: "localhost".to_owned(),
            api_port: 3001,
            frontend_url: "http://localhost:3000".to_owned(),
            seed_default_roles: false,
        };

        assert!(config.socket_address().is_err());
    }

    #[test]
    fn socket_address_combines_host_and_port() {
        let config = ApiConfig {
            api_host: "0.0.0.0".to_owned(),
            api_port: 8080,
            frontend_url: "http://localhost:3000".to_owned(),
            seed_default_roles: false,
        };

        assert_eq!(
            config.socket_address().map(|address| address.to_string()),
            Ok("0.0.0.0:8080".to_owned())
        );
    }
}
