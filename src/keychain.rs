use crate::flight_control::{Connector, HttpConnector, Supervisor, VehicleSchema};
use crate::flight_recorder::EventLog;
use crate::http_handler::http_client::HTTPClient;
use crate::mission_control::FlightCore;
use crate::settings::Settings;
use std::sync::Arc;

/// Struct representing the key components of the application, built once at
/// start-up and handed to every session.
#[derive(Clone)]
pub struct Keychain {
    /// The runtime configuration.
    settings: Arc<Settings>,
    /// The supervisor owning the connection to the vehicle-control service.
    supervisor: Arc<Supervisor>,
    /// The flight log, rolling over with the local date.
    recorder: Arc<EventLog>,
    /// The shared vehicle state.
    core: Arc<FlightCore>,
}

impl Keychain {
    /// Wires the components for the HTTP bridge.
    ///
    /// # Arguments
    /// - `settings`: The runtime configuration.
    /// - `schema`: The vehicle schema.
    ///
    /// # Returns
    /// The keychain, or the error of building the HTTP client.
    pub fn new(settings: Settings, schema: VehicleSchema) -> Result<Self, reqwest::Error> {
        let client = Arc::new(HTTPClient::new(settings.service_url(), HTTPClient::DEFAULT_TIMEOUT)?);
        let connector: Arc<dyn Connector> = Arc::new(HttpConnector::new(client));
        Ok(Self::with_connector(settings, schema, connector))
    }

    /// Wires the components around an arbitrary connector.
    pub fn with_connector(
        settings: Settings,
        schema: VehicleSchema,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let supervisor =
            Arc::new(Supervisor::new(connector, settings.connection_name(), settings.retry()));
        let recorder = Arc::new(EventLog::daily(settings.log_dir()));
        let core = Arc::new(FlightCore::new(
            Arc::clone(&supervisor),
            Arc::clone(&recorder),
            Arc::new(schema),
            settings.max_q_altitude(),
        ));
        Self { settings: Arc::new(settings), supervisor, recorder, core }
    }

    /// Provides a cloned reference to the settings.
    pub fn settings(&self) -> Arc<Settings> { Arc::clone(&self.settings) }

    /// Provides a cloned reference to the supervisor.
    pub fn supervisor(&self) -> Arc<Supervisor> { Arc::clone(&self.supervisor) }

    /// Provides a cloned reference to the flight log.
    pub fn recorder(&self) -> Arc<EventLog> { Arc::clone(&self.recorder) }

    /// Provides a cloned reference to the shared vehicle state.
    pub fn core(&self) -> Arc<FlightCore> { Arc::clone(&self.core) }
}
