use super::unit::{UnitDescriptor, UnitKind};
use itertools::Itertools;
use strum_macros::Display;

/// One propulsive stage. The schema lists stages uppermost (last burning) first.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct StageDescriptor {
    group_name: String,
    /// Unit name of the engine that burns this stage's propellant.
    engine: String,
}

impl StageDescriptor {
    pub fn new(group_name: &str, engine: &str) -> Self {
        Self { group_name: group_name.to_string(), engine: engine.to_string() }
    }

    pub fn group_name(&self) -> &str { self.group_name.as_str() }
    pub fn engine(&self) -> &str { self.engine.as_str() }
}

/// Declarative description of the vehicle: units, stacking order and the
/// aerodynamic reference area.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct VehicleSchema {
    rocket_schemas: Vec<UnitDescriptor>,
    #[serde(default)]
    stages: Vec<StageDescriptor>,
    #[serde(default = "VehicleSchema::default_payload_group")]
    payload_group: String,
    #[serde(default = "VehicleSchema::default_reference_area")]
    reference_area: f64,
}

#[derive(Debug, Display)]
pub enum SchemaError {
    Io(std::io::Error),
    Decode(serde_json::Error),
    /// A stage names an engine that is not declared as an engine unit.
    UnknownStageEngine(String),
}

impl std::error::Error for SchemaError {}

impl From<std::io::Error> for SchemaError {
    fn from(value: std::io::Error) -> Self { SchemaError::Io(value) }
}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self { SchemaError::Decode(value) }
}

impl VehicleSchema {
    /// Frontal area of the default launcher in m².
    pub const DEFAULT_REFERENCE_AREA: f64 = 5.917;

    pub fn new(
        units: Vec<UnitDescriptor>,
        stages: Vec<StageDescriptor>,
        payload_group: &str,
        reference_area: f64,
    ) -> Self {
        Self {
            rocket_schemas: units,
            stages,
            payload_group: payload_group.to_string(),
            reference_area,
        }
    }

    fn default_payload_group() -> String { String::from("payload_stage") }
    fn default_reference_area() -> f64 { Self::DEFAULT_REFERENCE_AREA }

    /// Parses and validates a schema document.
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let schema: VehicleSchema = serde_json::from_str(raw)?;
        schema.validate()?;
        Ok(schema)
    }

    pub async fn load(path: &std::path::Path) -> Result<Self, SchemaError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for stage in &self.stages {
            let declared = self
                .rocket_schemas
                .iter()
                .any(|d| d.unit_name() == stage.engine() && d.kind() == UnitKind::Engine);
            if !declared {
                return Err(SchemaError::UnknownStageEngine(stage.engine().to_string()));
            }
        }
        Ok(())
    }

    pub fn units(&self) -> &[UnitDescriptor] { &self.rocket_schemas }
    pub fn stages(&self) -> &[StageDescriptor] { &self.stages }
    pub fn payload_group(&self) -> &str { self.payload_group.as_str() }
    pub fn reference_area(&self) -> f64 { self.reference_area }

    /// Groups mentioned by any unit, in declaration order.
    pub fn groups(&self) -> Vec<&str> {
        self.rocket_schemas.iter().map(UnitDescriptor::group_name).unique().collect()
    }
}
