use super::ascent_autopilot::AscentAutopilotResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, connection_header,
};

/// Request type for configuring and engaging the ascent autopilot.
#[derive(serde::Serialize, Debug)]
pub(crate) struct AscentAutopilotRequest {
    #[serde(skip)]
    pub(crate) connection_id: String,
    pub(crate) ascent_path_index: u8,
    pub(crate) desired_orbit_altitude: f64,
    pub(crate) desired_inclination: f64,
    pub(crate) desired_apoapsis: f64,
    pub(crate) force_roll: bool,
    /// Roll held during the gravity turn, in degrees.
    pub(crate) turn_roll: f64,
    pub(crate) autodeploy_solar_panels: bool,
    pub(crate) autodeploy_antennas: bool,
    pub(crate) autostage: bool,
    pub(crate) enabled: bool,
}

impl JSONBodyHTTPRequestType for AscentAutopilotRequest {
    type Body = AscentAutopilotRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for AscentAutopilotRequest {
    type Response = AscentAutopilotResponse;
    fn endpoint(&self) -> &'static str { "/autopilot/ascent" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
