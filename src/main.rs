use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_fleet_api::config::environment::EnvironmentConfig;
use rental_fleet_api::create_app;
use rental_fleet_api::repositories::vehicle_repository::InMemoryVehicleRepository;
use rental_fleet_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Rental Fleet API");
    info!("===================");

    let config = EnvironmentConfig::from_env();
    if config.is_development() {
        info!("🔧 Modo desarrollo - CORS permisivo y flota de ejemplo");
    }
    let repository = InMemoryVehicleRepository::shared_seeded();
    let state = AppState::new(config.clone(), repository);
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("🚗 Endpoints - Vehicle:");
    info!("   GET    /api/vehicles - Listar vehículos (filtro/orden/paginación)");
    info!("   GET    /api/vehicles/available - Disponibles en rango de fechas");
    info!("   GET    /api/vehicles/statistics - Estadísticas de la flota");
    info!("   GET    /api/vehicles/popular - Por año descendente");
    info!("   GET    /api/vehicles/:id - Obtener vehículo");
    info!("   POST   /api/vehicles - Crear vehículo");
    info!("   PUT    /api/vehicles/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo");
    info!("   PATCH  /api/vehicles/:id/toggle-availability - Alternar disponibilidad");
    info!("   PATCH  /api/vehicles/bulk-update - Actualización masiva");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
