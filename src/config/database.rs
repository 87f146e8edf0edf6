//! Configuración del pool de PostgreSQL
//!
//! Solo se usa con `STORAGE_BACKEND=postgres`. El tamaño del pool acota
//! cuántas reservas pueden llegar a la vez al insert condicional; el resto
//! espera conexión hasta `acquire_timeout`.

use anyhow::{anyhow, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::environment::EnvironmentConfig;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_environment(config: &EnvironmentConfig) -> Result<Self> {
        let url = config
            .database_url
            .clone()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=postgres"))?;

        Ok(Self {
            url,
            max_connections: config.database_max_connections,
            acquire_timeout: Duration::from_secs(config.database_acquire_timeout),
        })
    }

    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_database_url() {
        let config = EnvironmentConfig::default();
        assert!(DatabaseConfig::from_environment(&config).is_err());
    }

    #[test]
    fn test_pool_settings_come_from_environment() {
        let config = EnvironmentConfig {
            database_url: Some("postgres://localhost/wayfarer".to_string()),
            database_max_connections: 4,
            database_acquire_timeout: 2,
            ..EnvironmentConfig::default()
        };

        let db = DatabaseConfig::from_environment(&config).unwrap();
        assert_eq!(db.url, "postgres://localhost/wayfarer");
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.acquire_timeout, Duration::from_secs(2));
    }
}
