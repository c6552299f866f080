use std::net::SocketAddr;
use seatkeep_api::{app, AppState};
use seatkeep_engine::TicketService;
use seatkeep_store::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatkeep_api=debug,seatkeep_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    tracing::info!(
        "Starting seatkeep with a {}x{} venue, holds expire after {}s",
        settings.venue.rows,
        settings.venue.seats_per_row,
        settings.holds.timeout_seconds
    );

    let tickets = TicketService::start(&settings)?;
    let app = app(AppState::new(tickets.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tickets.shutdown();
    Ok(())
}
