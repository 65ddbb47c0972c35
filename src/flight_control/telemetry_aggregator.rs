use super::flight_dynamics::FlightDynamics;
use super::part_attributes::{AttributeSource, get_status_values};
use super::rounding::{SNAPSHOT_PRECISION, round_recursive};
use super::unit::{Unit, UnitKind, UnitStatus};
use super::unit_registry::UnitRegistry;
use super::vehicle_schema::VehicleSchema;
use super::vessel_service::VesselFrame;
use crate::http_handler::http_response::parts::Part;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Per-engine performance figures as reported in the rocket status.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct EngineMetrics {
    pub status: UnitStatus,
    pub start_mass: f64,
    pub end_mass: f64,
    pub burned_mass: f64,
    pub thrust: f64,
    pub available_thrust: f64,
    pub max_thrust: f64,
    /// Specific impulse at the current static pressure.
    pub isp: f64,
    pub vac_isp: f64,
    pub atom_delta_v: f64,
    pub vac_delta_v: f64,
    pub burn_time: f64,
    pub twr: f64,
    pub slt: f64,
    pub temperature: f64,
    pub max_temperature: f64,
}

/// Raw engine readings plus the mass the engine has to push.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageBudget {
    pub start_mass: f64,
    pub fuel_mass: f64,
    pub thrust: f64,
    pub available_thrust: f64,
    pub max_thrust: f64,
    pub isp: f64,
    pub vac_isp: f64,
}

impl StageBudget {
    /// Derives the stage figures; all guards of [`FlightDynamics`] apply.
    pub fn evaluate(&self, status: UnitStatus, temperatures: (f64, f64)) -> EngineMetrics {
        EngineMetrics {
            status,
            start_mass: self.start_mass,
            end_mass: self.start_mass - self.fuel_mass,
            burned_mass: self.fuel_mass,
            thrust: self.thrust,
            available_thrust: self.available_thrust,
            max_thrust: self.max_thrust,
            isp: self.isp,
            vac_isp: self.vac_isp,
            atom_delta_v: FlightDynamics::delta_v(self.isp, self.fuel_mass, self.start_mass),
            vac_delta_v: FlightDynamics::delta_v(self.vac_isp, self.fuel_mass, self.start_mass),
            burn_time: FlightDynamics::burn_time(self.isp, self.fuel_mass, self.max_thrust),
            twr: FlightDynamics::thrust_to_weight(self.thrust, self.start_mass),
            slt: FlightDynamics::thrust_to_weight(self.available_thrust, self.start_mass),
            temperature: temperatures.0,
            max_temperature: temperatures.1,
        }
    }
}

/// Velocity budget of the whole stack.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct DeltaVSummary {
    pub stage_delta_v_atom: f64,
    pub stage_delta_v_vac: f64,
    pub total_delta_v_atom: f64,
    pub total_delta_v_vac: f64,
    /// Ordered uppermost (last burning) first.
    pub delta_v_list: Vec<EngineMetrics>,
}

impl DeltaVSummary {
    /// Stage values are those of the last (lowermost, first burning) entry.
    pub fn from_stages(delta_v_list: Vec<EngineMetrics>) -> Self {
        let last = delta_v_list.last();
        Self {
            stage_delta_v_atom: last.map_or(0.0, |m| m.atom_delta_v),
            stage_delta_v_vac: last.map_or(0.0, |m| m.vac_delta_v),
            total_delta_v_atom: delta_v_list.iter().map(|m| m.atom_delta_v).sum(),
            total_delta_v_vac: delta_v_list.iter().map(|m| m.vac_delta_v).sum(),
            delta_v_list,
        }
    }
}

/// Rounded view handed to subscribers.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub rocket_status: Value,
    pub vessel_telemetry: Value,
}

/// Composes unit status, vessel state and the stage budget into snapshots.
///
/// The aggregator is stateless: every figure is derived from the registry and
/// the frame captured by the last tick, so repeated calls without a refresh
/// yield identical output.
pub struct TelemetryAggregator {
    schema: Arc<VehicleSchema>,
    dynamics: FlightDynamics,
}

impl TelemetryAggregator {
    const ZERO: f64 = 0.0;

    pub fn new(schema: Arc<VehicleSchema>) -> Self {
        let dynamics = FlightDynamics::new(schema.reference_area());
        Self { schema, dynamics }
    }

    pub fn snapshot(&self, registry: &UnitRegistry, frame: &VesselFrame) -> TelemetrySnapshot {
        TelemetrySnapshot {
            rocket_status: round_recursive(self.rocket_status(registry, frame), SNAPSHOT_PRECISION),
            vessel_telemetry: round_recursive(
                self.vessel_telemetry(registry, frame),
                SNAPSHOT_PRECISION,
            ),
        }
    }

    /// Status map of every declared unit keyed by unit name (unrounded).
    pub fn rocket_status(&self, registry: &UnitRegistry, frame: &VesselFrame) -> Value {
        let mut status = Map::new();
        for unit in registry.units() {
            let values = match unit.kind() {
                UnitKind::Engine => json!(self.engine_metrics(registry, unit)),
                UnitKind::Tank => Value::Object(Self::tank_status(unit)),
                UnitKind::Antenna => Value::Object(Self::module_status(
                    unit,
                    unit.part().and_then(Part::antenna).map(|a| a as &dyn AttributeSource),
                    &["power", "packet_interval", "packet_size", "packet_resource_cost"],
                )),
                UnitKind::SolarPanel => Value::Object(Self::module_status(
                    unit,
                    unit.part().and_then(Part::solar_panel).map(|s| s as &dyn AttributeSource),
                    &["energy_flow", "sun_exposure"],
                )),
                UnitKind::ReactionWheel => Value::Object(Self::reaction_wheel_status(unit)),
                UnitKind::SatelliteBus => Value::Object(Self::satellite_bus_status(unit, frame)),
                UnitKind::Fairing => Value::Object(Self::module_status(
                    unit,
                    unit.part().map(|p| p as &dyn AttributeSource),
                    &["dynamic_pressure", "temperature", "max_temperature"],
                )),
                UnitKind::Generic => Value::Object(Self::module_status(
                    unit,
                    unit.part().map(|p| p as &dyn AttributeSource),
                    &["temperature", "max_temperature"],
                )),
            };
            status.insert(unit.name().to_string(), values);
        }
        Value::Object(status)
    }

    /// Surface, orbit, atmosphere and delta-v views (unrounded).
    pub fn vessel_telemetry(&self, registry: &UnitRegistry, frame: &VesselFrame) -> Value {
        let flight = &frame.flight;
        let orbit = &frame.orbit;
        let vessel = &frame.vessel;
        json!({
            "surface_info": {
                "altitude_als": flight.mean_altitude(),
                "altitude_true": flight.surface_altitude(),
                "pitch": flight.pitch(),
                "heading": flight.heading(),
                "roll": flight.roll(),
                "surface_speed": flight.speed(),
                "vertical_speed": flight.vertical_speed(),
                "surface_horizontal_speed": flight.horizontal_speed(),
                "latitude": flight.latitude(),
                "longitude": flight.longitude(),
                "biome": vessel.biome(),
                "situation": vessel.situation(),
            },
            "orbit_info": {
                "orbital_speed": orbit.speed(),
                "apoapsis_altitude": orbit.apoapsis_altitude(),
                "periapsis_altitude": orbit.periapsis_altitude(),
                "period": orbit.period(),
                "time_to_apoapsis": orbit.time_to_apoapsis(),
                "time_to_periapsis": orbit.time_to_periapsis(),
                "semi_major_axis": orbit.semi_major_axis(),
                "inclination": orbit.inclination(),
                "eccentricity": orbit.eccentricity(),
                "longitude_of_ascending_node": orbit.longitude_of_ascending_node(),
                "argument_of_periapsis": orbit.argument_of_periapsis(),
                "prograde": flight.prograde(),
            },
            "atmosphere_info": {
                "angle_of_attack": flight.angle_of_attack(),
                "sideslip_angle": flight.sideslip_angle(),
                "mach": flight.mach(),
                "dynamic_pressure": flight.dynamic_pressure(),
                "atmosphere_density": flight.atmosphere_density(),
                "atmospheric_pressure": flight.static_pressure(),
                "atmospheric_drag": self.dynamics.drag_acceleration(
                    flight.atmosphere_density(),
                    flight.speed(),
                    flight.drag_coefficient(),
                    vessel.mass(),
                ),
                "terminal_velocity": flight.terminal_velocity(),
            },
            "delta_v_info": self.delta_v_summary(registry),
        })
    }

    /// Cumulative outward-in stage budget over the stages of the schema.
    ///
    /// Only engines still on the vessel are listed, so after a separation the
    /// last entry is the stage that burns now.
    pub fn delta_v_summary(&self, registry: &UnitRegistry) -> DeltaVSummary {
        let delta_v_list = self
            .schema
            .stages()
            .iter()
            .filter_map(|stage| registry.unit_by_name(stage.engine()))
            .filter(|engine| engine.is_present() && !engine.status().is_terminal())
            .map(|engine| self.engine_metrics(registry, engine))
            .collect();
        DeltaVSummary::from_stages(delta_v_list)
    }

    /// Mass the engine of `unit` has to accelerate: the payload plus its own
    /// stage and every stage stacked above it. Engines outside the stage list
    /// only carry the payload and their own group.
    pub fn start_mass(&self, registry: &UnitRegistry, unit: &Unit) -> f64 {
        let payload = registry.total_mass(self.schema.payload_group());
        let stages = self.schema.stages();
        match stages.iter().position(|s| s.engine() == unit.name()) {
            Some(idx) => {
                payload + stages[..=idx].iter().map(|s| registry.total_mass(s.group_name())).sum::<f64>()
            }
            None => payload + registry.total_mass(unit.descriptor().group_name()),
        }
    }

    fn engine_metrics(&self, registry: &UnitRegistry, unit: &Unit) -> EngineMetrics {
        let status = unit.status();
        let engine = unit.part().and_then(Part::engine).map(|e| e as &dyn AttributeSource);
        let reads = get_status_values(
            status,
            engine,
            &[
                ("thrust", json!(Self::ZERO)),
                ("available_thrust", json!(Self::ZERO)),
                ("max_thrust", json!(Self::ZERO)),
                ("specific_impulse", json!(Self::ZERO)),
                ("vacuum_specific_impulse", json!(Self::ZERO)),
                ("propellant_mass", json!(Self::ZERO)),
            ],
        );
        let temps = get_status_values(
            status,
            unit.part().map(|p| p as &dyn AttributeSource),
            &[("temperature", json!(Self::ZERO)), ("max_temperature", json!(Self::ZERO))],
        );
        let f = |map: &Map<String, Value>, key: &str| {
            map.get(key).and_then(Value::as_f64).unwrap_or(Self::ZERO)
        };
        // A burnt out engine reports zeros, including the mass it would have pushed.
        let start_mass =
            if status.is_terminal() { Self::ZERO } else { self.start_mass(registry, unit) };
        let budget = StageBudget {
            start_mass,
            fuel_mass: f(&reads, "propellant_mass"),
            thrust: f(&reads, "thrust"),
            available_thrust: f(&reads, "available_thrust"),
            max_thrust: f(&reads, "max_thrust"),
            isp: f(&reads, "specific_impulse"),
            vac_isp: f(&reads, "vacuum_specific_impulse"),
        };
        budget.evaluate(status, (f(&temps, "temperature"), f(&temps, "max_temperature")))
    }

    fn module_status(
        unit: &Unit,
        source: Option<&dyn AttributeSource>,
        keys: &[&str],
    ) -> Map<String, Value> {
        let keys: Vec<(&str, Value)> = keys.iter().map(|k| (*k, json!(Self::ZERO))).collect();
        let mut values = get_status_values(unit.status(), source, &keys);
        values.insert("status".to_string(), json!(unit.status()));
        values
    }

    fn tank_status(unit: &Unit) -> Map<String, Value> {
        let mut values = Self::module_status(
            unit,
            unit.part().map(|p| p as &dyn AttributeSource),
            &["temperature", "max_temperature"],
        );
        let empty = json!({"name": "", "amount": Self::ZERO, "max": Self::ZERO});
        values.insert("lqd_oxygen".to_string(), empty.clone());
        values.insert("fuel".to_string(), empty);
        if unit.status().is_terminal() {
            return values;
        }
        for resource in unit.part().map(Part::resources).unwrap_or_default() {
            let key = if resource.name() == Part::LIQUID_OXYGEN { "lqd_oxygen" } else { "fuel" };
            values.insert(
                key.to_string(),
                json!({"name": resource.name(), "amount": resource.amount(), "max": resource.max()}),
            );
        }
        values
    }

    fn reaction_wheel_status(unit: &Unit) -> Map<String, Value> {
        let zero_torque = json!([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let mut values = get_status_values(
            unit.status(),
            unit.part().and_then(Part::reaction_wheel).map(|r| r as &dyn AttributeSource),
            &[
                ("active", json!(false)),
                ("available_torque", zero_torque.clone()),
                ("max_torque", zero_torque),
            ],
        );
        values.insert("status".to_string(), json!(unit.status()));
        values
    }

    fn satellite_bus_status(unit: &Unit, frame: &VesselFrame) -> Map<String, Value> {
        let mut values = get_status_values(
            unit.status(),
            unit.part().map(|p| p as &dyn AttributeSource),
            &[
                ("shielded", json!(false)),
                ("current_charge", json!(Self::ZERO)),
                ("max_charge", json!(Self::ZERO)),
            ],
        );
        values.insert("status".to_string(), json!(unit.status()));
        let comms = frame.vessel.comms();
        values.insert("can_communicate".to_string(), json!(comms.can_communicate()));
        values.insert("can_transmit_science".to_string(), json!(comms.can_transmit_science()));
        values.insert("signal_strength".to_string(), json!(comms.signal_strength()));
        values.insert("signal_delay".to_string(), json!(comms.signal_delay()));
        values.insert("total_comm_power".to_string(), json!(comms.power()));
        values
    }
}
