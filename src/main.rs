use std::net::SocketAddr;
use step_counter::{
    controller, rollover::spawn_midnight_rollover, router, AppConfig, AppState, Controller,
    KeyValueStore,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    info!("using data file {}", config.data_path.display());

    let store = KeyValueStore::open(&config.data_path).await;
    let (handle, _controller_task) = controller::spawn(Controller::new(store, config.tuning));
    let _rollover_task = spawn_midnight_rollover(handle.clone());

    let app = router(AppState::new(handle));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
