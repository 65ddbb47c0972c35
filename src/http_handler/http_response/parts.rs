use crate::http_handler::common::TorquePair;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// All parts currently attached to the active vessel.
#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct PartsResponse {
    #[serde(default)]
    parts: Vec<Part>,
}

impl SerdeJSONBodyHTTPResponseType for PartsResponse {}

impl PartsResponse {
    pub fn parts(&self) -> &[Part] { &self.parts }
    pub fn into_parts(self) -> Vec<Part> { self.parts }
}

/// One live part of the vessel as seen during a single poll.
///
/// Sub-objects (`engine`, `solar_panel`, ...) are only present when the part
/// actually carries that module, and every attribute inside a module is
/// optional: the bridge omits values it failed to read from the game.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct Part {
    tag: String,
    #[serde(default)]
    title: String,
    mass: Option<f64>,
    temperature: Option<f64>,
    max_temperature: Option<f64>,
    skin_temperature: Option<f64>,
    max_skin_temperature: Option<f64>,
    dynamic_pressure: Option<f64>,
    shielded: Option<bool>,
    #[serde(default)]
    resources: Vec<PartResource>,
    engine: Option<EngineModule>,
    solar_panel: Option<SolarPanelModule>,
    antenna: Option<AntennaModule>,
    reaction_wheel: Option<ReactionWheelModule>,
    fairing: Option<FairingModule>,
}

impl Part {
    /// Resource name of the stored electric charge.
    pub const ELECTRIC_CHARGE: &'static str = "ElectricCharge";
    /// Resource name of the oxidizer; every other tank resource counts as fuel.
    pub const LIQUID_OXYGEN: &'static str = "LqdOxygen";

    pub fn tag(&self) -> &str { self.tag.as_str() }
    pub fn title(&self) -> &str { self.title.as_str() }
    pub fn mass(&self) -> Option<f64> { self.mass }
    pub fn temperature(&self) -> Option<f64> { self.temperature }
    pub fn max_temperature(&self) -> Option<f64> { self.max_temperature }
    pub fn skin_temperature(&self) -> Option<f64> { self.skin_temperature }
    pub fn max_skin_temperature(&self) -> Option<f64> { self.max_skin_temperature }
    pub fn dynamic_pressure(&self) -> Option<f64> { self.dynamic_pressure }
    pub fn shielded(&self) -> Option<bool> { self.shielded }
    pub fn resources(&self) -> &[PartResource] { &self.resources }
    pub fn engine(&self) -> Option<&EngineModule> { self.engine.as_ref() }
    pub fn solar_panel(&self) -> Option<&SolarPanelModule> { self.solar_panel.as_ref() }
    pub fn antenna(&self) -> Option<&AntennaModule> { self.antenna.as_ref() }
    pub fn reaction_wheel(&self) -> Option<&ReactionWheelModule> { self.reaction_wheel.as_ref() }
    pub fn fairing(&self) -> Option<&FairingModule> { self.fairing.as_ref() }

    /// Amount of the named resource stored in this part.
    pub fn resource_amount(&self, name: &str) -> Option<f64> {
        self.resources.iter().find(|r| r.name == name).map(PartResource::amount)
    }

    /// Capacity for the named resource in this part.
    pub fn resource_max(&self, name: &str) -> Option<f64> {
        self.resources.iter().find(|r| r.name == name).map(PartResource::max)
    }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct PartResource {
    name: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    max: f64,
}

impl PartResource {
    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn amount(&self) -> f64 { self.amount }
    pub fn max(&self) -> f64 { self.max }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct EngineModule {
    active: Option<bool>,
    thrust: Option<f64>,
    available_thrust: Option<f64>,
    max_thrust: Option<f64>,
    max_vacuum_thrust: Option<f64>,
    thrust_limit: Option<f64>,
    throttle: Option<f64>,
    /// Specific impulse at the current static pressure.
    specific_impulse: Option<f64>,
    vacuum_specific_impulse: Option<f64>,
    /// Sum of the resources still available to the engine's propellants.
    propellant_mass: Option<f64>,
    #[serde(default)]
    propellant_names: Vec<String>,
}

impl EngineModule {
    pub fn active(&self) -> Option<bool> { self.active }
    pub fn thrust(&self) -> Option<f64> { self.thrust }
    pub fn available_thrust(&self) -> Option<f64> { self.available_thrust }
    pub fn max_thrust(&self) -> Option<f64> { self.max_thrust }
    pub fn max_vacuum_thrust(&self) -> Option<f64> { self.max_vacuum_thrust }
    pub fn thrust_limit(&self) -> Option<f64> { self.thrust_limit }
    pub fn throttle(&self) -> Option<f64> { self.throttle }
    pub fn specific_impulse(&self) -> Option<f64> { self.specific_impulse }
    pub fn vacuum_specific_impulse(&self) -> Option<f64> { self.vacuum_specific_impulse }
    pub fn propellant_mass(&self) -> Option<f64> { self.propellant_mass }
    pub fn propellant_names(&self) -> &[String] { &self.propellant_names }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct SolarPanelModule {
    deployed: Option<bool>,
    energy_flow: Option<f64>,
    sun_exposure: Option<f64>,
}

impl SolarPanelModule {
    pub fn deployed(&self) -> Option<bool> { self.deployed }
    pub fn energy_flow(&self) -> Option<f64> { self.energy_flow }
    pub fn sun_exposure(&self) -> Option<f64> { self.sun_exposure }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct AntennaModule {
    deployed: Option<bool>,
    power: Option<f64>,
    packet_interval: Option<f64>,
    packet_size: Option<f64>,
    packet_resource_cost: Option<f64>,
}

impl AntennaModule {
    pub fn deployed(&self) -> Option<bool> { self.deployed }
    pub fn power(&self) -> Option<f64> { self.power }
    pub fn packet_interval(&self) -> Option<f64> { self.packet_interval }
    pub fn packet_size(&self) -> Option<f64> { self.packet_size }
    pub fn packet_resource_cost(&self) -> Option<f64> { self.packet_resource_cost }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct ReactionWheelModule {
    active: Option<bool>,
    available_torque: Option<TorquePair>,
    max_torque: Option<TorquePair>,
}

impl ReactionWheelModule {
    pub fn active(&self) -> Option<bool> { self.active }
    pub fn available_torque(&self) -> Option<TorquePair> { self.available_torque }
    pub fn max_torque(&self) -> Option<TorquePair> { self.max_torque }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct FairingModule {
    jettisoned: Option<bool>,
}

impl FairingModule {
    pub fn jettisoned(&self) -> Option<bool> { self.jettisoned }
}
