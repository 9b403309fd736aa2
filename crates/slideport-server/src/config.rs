//! Start-up configuration read from environment variables.
//!
//! - `SLIDEPORT_BIND`: listen address (default `127.0.0.1`)
//! - `SLIDEPORT_PORT`: listen port (default `3000`)
//! - `SLIDEPORT_HIDDEN`: `1`/`true` keeps the host window hidden

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub hidden: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            hidden: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Invalid values fall back to the
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let bind = parse_or("SLIDEPORT_BIND", lookup("SLIDEPORT_BIND"), defaults.bind);
        let port = parse_or("SLIDEPORT_PORT", lookup("SLIDEPORT_PORT"), defaults.port);
        let hidden = match lookup("SLIDEPORT_HIDDEN") {
            None => defaults.hidden,
            Some(raw) => match parse_flag(&raw) {
                Some(flag) => flag,
                None => {
                    tracing::warn!(value = %raw, "SLIDEPORT_HIDDEN is not a boolean, using default");
                    defaults.hidden
                }
            },
        };
        ServerConfig { bind, port, hidden }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, fallback = %default, "invalid configuration value");
            default
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
