use crate::http_handler::http_response::parts::Part;
use strum_macros::Display;

/// Lifecycle status of a unit.
///
/// Serialized as its integer code. `Cutoff` and `Deployed` are terminal and
/// share the highest rank.
#[derive(
    serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(into = "u8", try_from = "u8")]
#[strum(serialize_all = "UPPERCASE")]
pub enum UnitStatus {
    Wait,
    Go,
    Active,
    Cutoff,
    Deployed,
}

impl UnitStatus {
    /// Position in the lifecycle; a transition never lowers it.
    pub fn rank(self) -> u8 {
        match self {
            UnitStatus::Wait => 0,
            UnitStatus::Go => 1,
            UnitStatus::Active => 2,
            UnitStatus::Cutoff | UnitStatus::Deployed => 3,
        }
    }

    pub fn is_terminal(self) -> bool { matches!(self, UnitStatus::Cutoff | UnitStatus::Deployed) }
}

impl From<UnitStatus> for u8 {
    fn from(value: UnitStatus) -> Self {
        match value {
            UnitStatus::Wait => 0,
            UnitStatus::Go => 1,
            UnitStatus::Active => 2,
            UnitStatus::Cutoff => 3,
            UnitStatus::Deployed => 4,
        }
    }
}

impl TryFrom<u8> for UnitStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UnitStatus::Wait),
            1 => Ok(UnitStatus::Go),
            2 => Ok(UnitStatus::Active),
            3 => Ok(UnitStatus::Cutoff),
            4 => Ok(UnitStatus::Deployed),
            other => Err(format!("unknown unit status code {other}")),
        }
    }
}

/// Part category a unit is tracked as. Unknown names decode as `Generic`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case")]
pub enum UnitKind {
    Engine,
    Tank,
    SolarPanel,
    Fairing,
    ReactionWheel,
    SatelliteBus,
    Antenna,
    Generic,
}

impl From<&str> for UnitKind {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "engine" => UnitKind::Engine,
            "tank" => UnitKind::Tank,
            "solar_panel" => UnitKind::SolarPanel,
            "fairing" => UnitKind::Fairing,
            "reaction_wheel" => UnitKind::ReactionWheel,
            "satellite_bus" => UnitKind::SatelliteBus,
            "antenna" => UnitKind::Antenna,
            _ => UnitKind::Generic,
        }
    }
}

impl From<String> for UnitKind {
    fn from(value: String) -> Self { UnitKind::from(value.as_str()) }
}

impl From<UnitKind> for String {
    fn from(value: UnitKind) -> Self { <&'static str>::from(value).to_string() }
}

impl From<UnitKind> for &'static str {
    fn from(value: UnitKind) -> Self {
        match value {
            UnitKind::Engine => "engine",
            UnitKind::Tank => "tank",
            UnitKind::SolarPanel => "solar_panel",
            UnitKind::Fairing => "fairing",
            UnitKind::ReactionWheel => "reaction_wheel",
            UnitKind::SatelliteBus => "satellite_bus",
            UnitKind::Antenna => "antenna",
            UnitKind::Generic => "generic",
        }
    }
}

/// Static declaration of a unit as read from the vehicle schema.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct UnitDescriptor {
    unit_name: String,
    group_name: String,
    tag: String,
    #[serde(rename = "part_type", default = "UnitDescriptor::default_kind")]
    kind: UnitKind,
    #[serde(rename = "status", default = "UnitDescriptor::default_status")]
    initial_status: UnitStatus,
}

impl UnitDescriptor {
    pub fn new(
        unit_name: &str,
        group_name: &str,
        tag: &str,
        kind: UnitKind,
        initial_status: UnitStatus,
    ) -> Self {
        Self {
            unit_name: unit_name.to_string(),
            group_name: group_name.to_string(),
            tag: tag.to_string(),
            kind,
            initial_status,
        }
    }

    fn default_kind() -> UnitKind { UnitKind::Generic }
    fn default_status() -> UnitStatus { UnitStatus::Wait }

    pub fn unit_name(&self) -> &str { self.unit_name.as_str() }
    pub fn group_name(&self) -> &str { self.group_name.as_str() }
    pub fn tag(&self) -> &str { self.tag.as_str() }
    pub fn kind(&self) -> UnitKind { self.kind }
    pub fn initial_status(&self) -> UnitStatus { self.initial_status }

    /// Human readable name used in event texts, e.g. `main_engine` → `Main engine`.
    pub fn display_name(&self) -> String {
        let spaced = self.unit_name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

/// A declared unit together with its current status and the live part it
/// resolved to in the most recent refresh.
#[derive(Debug, Clone)]
pub struct Unit {
    descriptor: UnitDescriptor,
    status: UnitStatus,
    part: Option<Part>,
}

impl Unit {
    pub(super) fn new(descriptor: UnitDescriptor) -> Self {
        let status = descriptor.initial_status();
        Self { descriptor, status, part: None }
    }

    pub fn descriptor(&self) -> &UnitDescriptor { &self.descriptor }
    pub fn name(&self) -> &str { self.descriptor.unit_name() }
    pub fn kind(&self) -> UnitKind { self.descriptor.kind() }
    pub fn status(&self) -> UnitStatus { self.status }
    pub fn part(&self) -> Option<&Part> { self.part.as_ref() }
    pub fn is_present(&self) -> bool { self.part.is_some() }

    /// Mass of the live part, 0 when absent or unreadable.
    pub fn mass(&self) -> f64 { self.part.as_ref().and_then(Part::mass).unwrap_or(0.0) }

    pub(super) fn set_part(&mut self, part: Option<Part>) { self.part = part; }

    /// Overwrites the status unconditionally. Only the registry (arming) and
    /// the state machine (transitions) call this.
    pub(super) fn set_status(&mut self, status: UnitStatus) { self.status = status; }
}
