use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// State of the external ascent autopilot. Only the `enabled` flag is
/// evaluated; the targets are echoed for logging.
#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct AscentAutopilotResponse {
    enabled: bool,
    #[serde(default)]
    desired_orbit_altitude: f64,
    #[serde(default)]
    desired_inclination: f64,
    #[serde(default)]
    desired_apoapsis: f64,
}

impl SerdeJSONBodyHTTPResponseType for AscentAutopilotResponse {}

impl AscentAutopilotResponse {
    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn desired_orbit_altitude(&self) -> f64 { self.desired_orbit_altitude }
    pub fn desired_inclination(&self) -> f64 { self.desired_inclination }
    pub fn desired_apoapsis(&self) -> f64 { self.desired_apoapsis }
}
