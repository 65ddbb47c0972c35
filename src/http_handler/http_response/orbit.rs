use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Osculating orbital elements of the active vessel.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OrbitInfo {
    speed: f64,
    apoapsis_altitude: f64,
    periapsis_altitude: f64,
    period: f64,
    time_to_apoapsis: f64,
    time_to_periapsis: f64,
    semi_major_axis: f64,
    /// Radians.
    inclination: f64,
    eccentricity: f64,
    longitude_of_ascending_node: f64,
    argument_of_periapsis: f64,
}

impl SerdeJSONBodyHTTPResponseType for OrbitInfo {}

impl OrbitInfo {
    pub fn speed(&self) -> f64 { self.speed }
    pub fn apoapsis_altitude(&self) -> f64 { self.apoapsis_altitude }
    pub fn periapsis_altitude(&self) -> f64 { self.periapsis_altitude }
    pub fn period(&self) -> f64 { self.period }
    pub fn time_to_apoapsis(&self) -> f64 { self.time_to_apoapsis }
    pub fn time_to_periapsis(&self) -> f64 { self.time_to_periapsis }
    pub fn semi_major_axis(&self) -> f64 { self.semi_major_axis }
    pub fn inclination_deg(&self) -> f64 { self.inclination.to_degrees() }
    pub fn inclination(&self) -> f64 { self.inclination }
    pub fn eccentricity(&self) -> f64 { self.eccentricity }
    pub fn longitude_of_ascending_node(&self) -> f64 { self.longitude_of_ascending_node }
    pub fn argument_of_periapsis(&self) -> f64 { self.argument_of_periapsis }
}
