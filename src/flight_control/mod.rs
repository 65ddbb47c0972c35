//! Vehicle-side core: the supervised connection to the vehicle-control
//! service, the unit lifecycle and the telemetry derived from it.

mod flight_dynamics;
mod game_scene;
mod milestones;
mod part_attributes;
mod rounding;
mod supervisor;
mod telemetry_aggregator;
mod unit;
mod unit_registry;
mod unit_state_machine;
mod vehicle_schema;
mod vessel_service;

#[cfg(test)]
pub(crate) mod tests;

pub use flight_dynamics::{FlightDynamics, G0};
pub use game_scene::GameScene;
pub use milestones::{Milestone, MilestoneTracker, TargetOrbit};
pub use part_attributes::{AttributeSource, get_status_values};
pub use rounding::{SNAPSHOT_PRECISION, round_recursive, round_to};
pub use supervisor::{RetryPolicy, Supervisor};
pub use telemetry_aggregator::{
    DeltaVSummary, EngineMetrics, StageBudget, TelemetryAggregator, TelemetrySnapshot,
};
pub use unit::{Unit, UnitDescriptor, UnitKind, UnitStatus};
pub use unit_registry::UnitRegistry;
pub use unit_state_machine::{Transition, UnitEvent, UnitStateMachine};
pub use vehicle_schema::{SchemaError, StageDescriptor, VehicleSchema};
pub use vessel_service::{
    AscentSettings, Connector, HttpConnector, HttpVesselService, ServiceError, VesselFrame,
    VesselService,
};
