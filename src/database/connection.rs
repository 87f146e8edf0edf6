//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja la conexión a la base de datos PostgreSQL.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!(
        "🔌 Conectando a {} (pool máx. {})",
        mask_database_url(&config.url),
        config.max_connections
    );

    let pool = config
        .connect()
        .await
        .context("Error conectando a la base de datos")?;

    // Verificar que la conexión funciona
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("La base de datos no responde")?;

    info!("✅ Base de datos conectada");
    Ok(pool)
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    if scheme_end + 3 > at_pos {
        return url.to_string();
    }

    format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
}
