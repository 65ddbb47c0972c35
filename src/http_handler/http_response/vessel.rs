use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Vessel-wide state that is not bound to a single part.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VesselInfo {
    name: String,
    mass: f64,
    biome: String,
    situation: String,
    comms: CommsInfo,
}

impl SerdeJSONBodyHTTPResponseType for VesselInfo {}

impl VesselInfo {
    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn mass(&self) -> f64 { self.mass }
    pub fn biome(&self) -> &str { self.biome.as_str() }
    pub fn situation(&self) -> &str { self.situation.as_str() }
    pub fn comms(&self) -> &CommsInfo { &self.comms }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CommsInfo {
    can_communicate: bool,
    can_transmit_science: bool,
    signal_strength: f64,
    signal_delay: f64,
    power: f64,
}

impl CommsInfo {
    pub fn can_communicate(&self) -> bool { self.can_communicate }
    pub fn can_transmit_science(&self) -> bool { self.can_transmit_science }
    pub fn signal_strength(&self) -> f64 { self.signal_strength }
    pub fn signal_delay(&self) -> f64 { self.signal_delay }
    pub fn power(&self) -> f64 { self.power }
}
