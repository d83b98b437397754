use std::{env, net::SocketAddr};

use anyhow::Context;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SERVICE_NAME: &str = "user-service";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// When unset, connection parameters come from the `PG*` variables.
    pub database_url: Option<String>,
    pub service_name: String,
    pub otlp_enabled: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let listen_addr = non_empty("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR must be a socket address such as 0.0.0.0:8080")?;

        Ok(Self {
            listen_addr,
            database_url: non_empty("DATABASE_URL"),
            service_name: non_empty("SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            otlp_enabled: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT").is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.database_url, None);
        assert_eq!(config.service_name, "user-service");
        assert!(!config.otlp_enabled);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("LISTEN_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "postgres://postgres@localhost/backend"),
            ("SERVICE_NAME", "users"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ])
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://postgres@localhost/backend")
        );
        assert_eq!(config.service_name, "users");
        assert!(config.otlp_enabled);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DATABASE_URL", "  "), ("LISTEN_ADDR", "")]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn rejects_bad_listen_addr() {
        assert!(config_from(&[("LISTEN_ADDR", "not-an-addr")]).is_err());
    }
}
