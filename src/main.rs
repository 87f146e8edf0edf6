use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wayfarer::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use wayfarer::database::{create_pool, schema, seed};
use wayfarer::repositories::InMemoryStore;
use wayfarer::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚌 WayFarer API - Reservas de viajes en bus");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("⚙️ Entorno: {} | storage: {:?}", config.environment, config.storage_backend);

    // Inicializar persistencia
    let state = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&DatabaseConfig::from_environment(&config)?).await?;
            schema::create_tables(&pool)
                .await
                .context("Error creando las tablas")?;
            AppState::postgres(pool, config.clone())
        }
        StorageBackend::Memory => {
            info!("🧪 Usando store en memoria: los datos se pierden al reiniciar");
            AppState::in_memory(InMemoryStore::new(), config.clone())
        }
    };

    seed::seed(&state)
        .await
        .map_err(|e| anyhow::anyhow!("Error insertando datos iniciales: {}", e))?;

    let app = create_app(state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /            - Bienvenida");
    info!("   GET    /api/v1      - Versión de la API");
    info!("🔐 Auth:");
    info!("   POST   /api/v1/auth/signup");
    info!("   POST   /api/v1/auth/signin");
    info!("🚌 Trips:");
    info!("   POST   /api/v1/trips       - Crear viaje (admin)");
    info!("   GET    /api/v1/trips       - Listar viajes (?origin=&destination=)");
    info!("   PATCH  /api/v1/trips/:id   - Cancelar viaje (admin)");
    info!("🎫 Bookings:");
    info!("   POST   /api/v1/bookings     - Reservar asiento");
    info!("   GET    /api/v1/bookings     - Ver reservas");
    info!("   DELETE /api/v1/bookings/:id - Borrar reserva");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
