use super::game_scene::GameScene;
use super::milestones::TargetOrbit;
use crate::http_handler::{
    HTTPError,
    common::SasMode,
    http_client::HTTPClient,
    http_request::{
        ascent_autopilot_get::AscentAutopilotStateRequest,
        ascent_autopilot_put::AscentAutopilotRequest,
        connection_delete::CloseConnectionRequest,
        connection_post::OpenConnectionRequest,
        flight_get::FlightRequest,
        orbit_get::OrbitRequest,
        parts_get::PartsRequest,
        request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
        sas_put::SasRequest,
        scene_get::SceneRequest,
        stage_put::ActivateStageRequest,
        vessel_get::VesselRequest,
    },
    http_response::{
        ascent_autopilot::AscentAutopilotResponse, flight::FlightInfo, orbit::OrbitInfo,
        parts::Part, vessel::VesselInfo,
    },
};
use crate::{log, warn};
use async_trait::async_trait;
use std::sync::Arc;
use strum_macros::Display;

/// Errors surfaced by calls against the vehicle-control service.
#[derive(Debug, Display)]
pub enum ServiceError {
    /// The call reached the transport layer and failed there or at the bridge.
    Rpc(HTTPError),
    /// The service acknowledged the call but refused to carry it out.
    Rejected(String),
    /// No handle is open.
    NotConnected,
    /// Every connection attempt of a connect cycle failed.
    ConnectionExhausted,
}

impl ServiceError {
    /// Transient errors are worth a reconnect and one retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Rpc(err) => err.is_transient(),
            ServiceError::NotConnected => true,
            ServiceError::Rejected(_) | ServiceError::ConnectionExhausted => false,
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<HTTPError> for ServiceError {
    fn from(value: HTTPError) -> Self { ServiceError::Rpc(value) }
}

/// Target parameters handed to the external ascent autopilot.
#[derive(Debug, Clone, PartialEq)]
pub struct AscentSettings {
    pub ascent_path_index: u8,
    pub desired_orbit_altitude: f64,
    pub desired_inclination: f64,
    pub desired_apoapsis: f64,
    pub force_roll: bool,
    pub turn_roll: f64,
    pub autodeploy_solar_panels: bool,
    pub autodeploy_antennas: bool,
    pub autostage: bool,
    pub enabled: bool,
}

impl AscentSettings {
    /// Ascent path used for every launch (classic gravity turn profile).
    const ASCENT_PATH_INDEX: u8 = 2;
    const TURN_ROLL_DEG: f64 = 90.0;

    /// Engaged autopilot settings that circularise at the periapsis of `target`.
    pub fn for_target(target: &TargetOrbit) -> Self {
        Self {
            ascent_path_index: Self::ASCENT_PATH_INDEX,
            desired_orbit_altitude: target.periapsis,
            desired_inclination: target.inclination,
            desired_apoapsis: target.apoapsis,
            force_roll: true,
            turn_roll: Self::TURN_ROLL_DEG,
            autodeploy_solar_panels: true,
            autodeploy_antennas: true,
            autostage: true,
            enabled: true,
        }
    }
}

/// Everything the aggregator needs from one poll of the vessel.
#[derive(Debug, Clone, Default)]
pub struct VesselFrame {
    pub parts: Vec<Part>,
    pub flight: FlightInfo,
    pub orbit: OrbitInfo,
    pub vessel: VesselInfo,
}

impl VesselFrame {
    /// Fetches parts and the three vessel-wide views concurrently.
    pub async fn fetch(service: &dyn VesselService) -> Result<Self, ServiceError> {
        let (parts, flight, orbit, vessel) = futures::try_join!(
            service.parts(),
            service.flight(),
            service.orbit(),
            service.vessel()
        )?;
        Ok(Self { parts, flight, orbit, vessel })
    }
}

/// An open handle to the vehicle-control service.
///
/// Handles are only ever held by the [`Supervisor`](super::Supervisor); all
/// other components borrow one for the duration of a single operation.
#[async_trait]
pub trait VesselService: Send + Sync {
    async fn scene(&self) -> Result<GameScene, ServiceError>;
    async fn parts(&self) -> Result<Vec<Part>, ServiceError>;
    async fn flight(&self) -> Result<FlightInfo, ServiceError>;
    async fn orbit(&self) -> Result<OrbitInfo, ServiceError>;
    async fn vessel(&self) -> Result<VesselInfo, ServiceError>;
    async fn ascent_autopilot(&self) -> Result<AscentAutopilotResponse, ServiceError>;
    async fn configure_autopilot(
        &self,
        settings: &AscentSettings,
    ) -> Result<AscentAutopilotResponse, ServiceError>;
    async fn activate_next_stage(&self) -> Result<(), ServiceError>;
    async fn set_sas(&self, enabled: bool, mode: SasMode) -> Result<(), ServiceError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), ServiceError> { self.scene().await.map(|_| ()) }

    async fn close(&self) -> Result<(), ServiceError>;
}

/// Opens handles. The supervisor owns exactly one connector.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, name: &str) -> Result<Arc<dyn VesselService>, ServiceError>;
}

/// Connector talking to the HTTP bridge in front of the game.
pub struct HttpConnector {
    client: Arc<HTTPClient>,
}

impl HttpConnector {
    pub(crate) fn new(client: Arc<HTTPClient>) -> Self { Self { client } }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, name: &str) -> Result<Arc<dyn VesselService>, ServiceError> {
        let resp = OpenConnectionRequest { name: name.to_string() }.send_request(&self.client).await?;
        log!(
            "Bridge connection '{name}' opened as {} (server {})",
            resp.connection_id(),
            resp.server_version().unwrap_or("unknown")
        );
        Ok(Arc::new(HttpVesselService {
            client: Arc::clone(&self.client),
            connection_id: resp.connection_id().to_string(),
        }))
    }
}

/// One open bridge connection.
pub struct HttpVesselService {
    client: Arc<HTTPClient>,
    connection_id: String,
}

impl HttpVesselService {
    fn id(&self) -> String { self.connection_id.clone() }
}

#[async_trait]
impl VesselService for HttpVesselService {
    async fn scene(&self) -> Result<GameScene, ServiceError> {
        let resp = SceneRequest { connection_id: self.id() }.send_request(&self.client).await?;
        Ok(GameScene::from(resp.scene()))
    }

    async fn parts(&self) -> Result<Vec<Part>, ServiceError> {
        let resp = PartsRequest { connection_id: self.id() }.send_request(&self.client).await?;
        Ok(resp.into_parts())
    }

    async fn flight(&self) -> Result<FlightInfo, ServiceError> {
        Ok(FlightRequest { connection_id: self.id() }.send_request(&self.client).await?)
    }

    async fn orbit(&self) -> Result<OrbitInfo, ServiceError> {
        Ok(OrbitRequest { connection_id: self.id() }.send_request(&self.client).await?)
    }

    async fn vessel(&self) -> Result<VesselInfo, ServiceError> {
        Ok(VesselRequest { connection_id: self.id() }.send_request(&self.client).await?)
    }

    async fn ascent_autopilot(&self) -> Result<AscentAutopilotResponse, ServiceError> {
        let req = AscentAutopilotStateRequest { connection_id: self.id() };
        Ok(req.send_request(&self.client).await?)
    }

    async fn configure_autopilot(
        &self,
        settings: &AscentSettings,
    ) -> Result<AscentAutopilotResponse, ServiceError> {
        let req = AscentAutopilotRequest {
            connection_id: self.id(),
            ascent_path_index: settings.ascent_path_index,
            desired_orbit_altitude: settings.desired_orbit_altitude,
            desired_inclination: settings.desired_inclination,
            desired_apoapsis: settings.desired_apoapsis,
            force_roll: settings.force_roll,
            turn_roll: settings.turn_roll,
            autodeploy_solar_panels: settings.autodeploy_solar_panels,
            autodeploy_antennas: settings.autodeploy_antennas,
            autostage: settings.autostage,
            enabled: settings.enabled,
        };
        Ok(req.send_request(&self.client).await?)
    }

    async fn activate_next_stage(&self) -> Result<(), ServiceError> {
        let ack =
            ActivateStageRequest { connection_id: self.id() }.send_request(&self.client).await?;
        if ack.is_accepted() {
            Ok(())
        } else {
            Err(ServiceError::Rejected("stage activation".to_string()))
        }
    }

    async fn set_sas(&self, enabled: bool, mode: SasMode) -> Result<(), ServiceError> {
        let req = SasRequest { connection_id: self.id(), enabled, mode };
        let ack = req.send_request(&self.client).await?;
        if ack.is_accepted() {
            Ok(())
        } else {
            Err(ServiceError::Rejected(format!("sas {mode}")))
        }
    }

    async fn close(&self) -> Result<(), ServiceError> {
        let resp = CloseConnectionRequest::new(&self.connection_id).send_request(&self.client).await?;
        if !resp.is_closed() {
            warn!("Bridge kept connection {} open", self.connection_id);
        }
        Ok(())
    }
}
