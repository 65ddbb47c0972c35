use crate::event;
use crate::http_handler::http_response::parts::{
    AntennaModule, EngineModule, FairingModule, Part, ReactionWheelModule, SolarPanelModule,
};
use serde_json::{Map, Value, json};

use super::unit::UnitStatus;

/// Typed read access to the optional attributes of a part or one of its modules.
///
/// `None` means the attribute could not be read, either because the module
/// does not expose it or because the bridge failed to fetch it this tick.
pub trait AttributeSource {
    fn attribute(&self, key: &str) -> Option<Value>;
}

fn num(value: Option<f64>) -> Option<Value> { value.map(Value::from) }

impl AttributeSource for Part {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "mass" => num(self.mass()),
            "temperature" => num(self.temperature()),
            "max_temperature" => num(self.max_temperature()),
            "skin_temperature" => num(self.skin_temperature()),
            "max_skin_temperature" => num(self.max_skin_temperature()),
            "dynamic_pressure" => num(self.dynamic_pressure()),
            "shielded" => self.shielded().map(Value::from),
            "current_charge" => num(self.resource_amount(Part::ELECTRIC_CHARGE)),
            "max_charge" => num(self.resource_max(Part::ELECTRIC_CHARGE)),
            _ => None,
        }
    }
}

impl AttributeSource for EngineModule {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "active" => self.active().map(Value::from),
            "thrust" => num(self.thrust()),
            "available_thrust" => num(self.available_thrust()),
            "max_thrust" => num(self.max_thrust()),
            "max_vacuum_thrust" => num(self.max_vacuum_thrust()),
            "thrust_limit" => num(self.thrust_limit()),
            "throttle" => num(self.throttle()),
            "specific_impulse" => num(self.specific_impulse()),
            "vacuum_specific_impulse" => num(self.vacuum_specific_impulse()),
            "propellant_mass" => num(self.propellant_mass()),
            "propellant_names" => Some(json!(self.propellant_names())),
            _ => None,
        }
    }
}

impl AttributeSource for SolarPanelModule {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "deployed" => self.deployed().map(Value::from),
            "energy_flow" => num(self.energy_flow()),
            "sun_exposure" => num(self.sun_exposure()),
            _ => None,
        }
    }
}

impl AttributeSource for AntennaModule {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "deployed" => self.deployed().map(Value::from),
            "power" => num(self.power()),
            "packet_interval" => num(self.packet_interval()),
            "packet_size" => num(self.packet_size()),
            "packet_resource_cost" => num(self.packet_resource_cost()),
            _ => None,
        }
    }
}

impl AttributeSource for ReactionWheelModule {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "active" => self.active().map(Value::from),
            "available_torque" => self.available_torque().map(|t| json!(t)),
            "max_torque" => self.max_torque().map(|t| json!(t)),
            _ => None,
        }
    }
}

impl AttributeSource for FairingModule {
    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "jettisoned" => self.jettisoned().map(Value::from),
            _ => None,
        }
    }
}

/// Reads `keys` off `source`.
///
/// For a terminal `status` the defaults are returned without touching the
/// source, since the part may be gone. Any failed read falls back to its
/// default and is reported through `event!`.
pub fn get_status_values(
    status: UnitStatus,
    source: Option<&dyn AttributeSource>,
    keys: &[(&str, Value)],
) -> Map<String, Value> {
    let mut values = Map::new();
    for (key, default) in keys {
        let read = if status.is_terminal() {
            None
        } else {
            let read = source.and_then(|s| s.attribute(key));
            if read.is_none() {
                event!("Attribute '{key}' unreadable, using default {default}");
            }
            read
        };
        values.insert((*key).to_string(), read.unwrap_or_else(|| default.clone()));
    }
    values
}
