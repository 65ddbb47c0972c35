#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod console_communication;
mod flight_control;
mod flight_recorder;
mod http_handler;
mod keychain;
mod logger;
mod mission_control;
mod settings;

use crate::console_communication::ConsoleEndpoint;
use crate::flight_control::VehicleSchema;
use crate::keychain::Keychain;
use crate::mission_control::FlightSession;
use crate::settings::Settings;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let settings = Settings::from_env().unwrap_or_else(|e| fatal!("Invalid settings: {e}"));
    let schema = VehicleSchema::load(settings.schema_path()).await.unwrap_or_else(|e| {
        fatal!("Could not load vehicle schema {}: {e}", settings.schema_path().display())
    });
    info!(
        "Loaded vehicle schema with {} units in {} stages",
        schema.units().len(),
        schema.stages().len()
    );
    let keychain = Keychain::new(settings, schema)
        .unwrap_or_else(|e| fatal!("Could not build the HTTP client: {e}"));
    let settings = keychain.settings();
    log!("Flight log at {}", keychain.recorder().path().display());

    let shutdown = CancellationToken::new();
    let supervisor = keychain.supervisor();
    if let Err(e) = supervisor.reconnect().await {
        warn!("Starting without a vehicle-control connection: {e}");
    }
    let monitor_token = shutdown.child_token();
    let monitor_supervisor = Arc::clone(&supervisor);
    let monitor = tokio::spawn(async move {
        monitor_supervisor.run_liveness_monitor(monitor_token).await;
    });

    let addr = settings.subscriber_addr();
    let endpoint = ConsoleEndpoint::bind(addr)
        .await
        .unwrap_or_else(|e| fatal!("Could not bind subscriber endpoint {addr}: {e}"));

    let core = keychain.core();
    let interval = settings.tick_interval();
    let serve_token = shutdown.child_token();
    let server = endpoint.serve(serve_token, move |socket, token| {
        let session = FlightSession::new(Arc::clone(&core), interval);
        async move { session.run(socket, token).await }
    });

    tokio::select! {
        () = server => warn!("Subscriber endpoint stopped"),
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!("Could not listen for shutdown signal: {e}"),
        },
    }
    shutdown.cancel();
    if let Err(e) = monitor.await {
        error!("Liveness monitor panicked: {e}");
    }
    supervisor.shutdown().await;
    info!("Launch operations stopped");
}
