use crate::http_handler::common::Vector3;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Flight parameters of the active vessel in the body-fixed reference frame.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FlightInfo {
    heading: f64,
    pitch: f64,
    roll: f64,
    mean_altitude: f64,
    surface_altitude: f64,
    latitude: f64,
    longitude: f64,
    speed: f64,
    vertical_speed: f64,
    horizontal_speed: f64,
    angle_of_attack: f64,
    sideslip_angle: f64,
    mach: f64,
    dynamic_pressure: f64,
    atmosphere_density: f64,
    /// Pascal.
    static_pressure: f64,
    terminal_velocity: f64,
    drag_coefficient: f64,
    prograde: Vector3,
}

impl SerdeJSONBodyHTTPResponseType for FlightInfo {}

impl FlightInfo {
    pub fn heading(&self) -> f64 { self.heading }
    pub fn pitch(&self) -> f64 { self.pitch }
    pub fn roll(&self) -> f64 { self.roll }
    pub fn mean_altitude(&self) -> f64 { self.mean_altitude }
    pub fn surface_altitude(&self) -> f64 { self.surface_altitude }
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    pub fn speed(&self) -> f64 { self.speed }
    pub fn vertical_speed(&self) -> f64 { self.vertical_speed }
    pub fn horizontal_speed(&self) -> f64 { self.horizontal_speed }
    pub fn angle_of_attack(&self) -> f64 { self.angle_of_attack }
    pub fn sideslip_angle(&self) -> f64 { self.sideslip_angle }
    pub fn mach(&self) -> f64 { self.mach }
    pub fn dynamic_pressure(&self) -> f64 { self.dynamic_pressure }
    pub fn atmosphere_density(&self) -> f64 { self.atmosphere_density }
    pub fn static_pressure(&self) -> f64 { self.static_pressure }
    pub fn terminal_velocity(&self) -> f64 { self.terminal_velocity }
    pub fn drag_coefficient(&self) -> f64 { self.drag_coefficient }
    pub fn prograde(&self) -> Vector3 { self.prograde }
}
