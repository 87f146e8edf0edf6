//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

/// Backend de persistencia seleccionado con `STORAGE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("STORAGE_BACKEND desconocido: '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Segundos de espera por una conexión libre del pool
    pub database_acquire_timeout: u64,
    pub storage_backend: StorageBackend,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for EnvironmentConfig {
    /// Valores de desarrollo; `from_env` los sobrescribe
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "wayfarer-dev-secret".to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            database_url: None,
            database_max_connections: 10,
            database_acquire_timeout: 5,
            storage_backend: StorageBackend::Postgres,
            admin_email: "admin@wayfarer.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda de claves
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = parse_or(&lookup, "PORT", defaults.port)?;
        let jwt_expiration = parse_or(&lookup, "JWT_EXPIRATION", defaults.jwt_expiration)?;

        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?;
        if database_max_connections == 0 {
            return Err(anyhow!("DATABASE_MAX_CONNECTIONS debe ser mayor que 0"));
        }
        let database_acquire_timeout =
            parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT", defaults.database_acquire_timeout)?;

        // Fuera de desarrollo el secreto es obligatorio
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "development" || environment == "test" => defaults.jwt_secret,
            _ => return Err(anyhow!("JWT_SECRET must be set")),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => StorageBackend::parse(&raw)?,
            None => defaults.storage_backend,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=postgres"));
        }

        Ok(Self {
            environment,
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration,
            cors_origins,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            storage_backend,
            admin_email: lookup("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Valor numérico de `key`, o `default` si no está definido
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} debe ser un número válido: '{}'", key, raw)),
        None => Ok(default),
    }
}
