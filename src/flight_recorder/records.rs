use crate::http_handler::http_response::{flight::FlightInfo, orbit::OrbitInfo};
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Severity attached to every event record.
#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventLevel {
    Normal,
    Important,
    Error,
}

/// Position and orbit context sampled once per tick.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct FlightSample {
    pub time: DateTime<Utc>,
    /// Whole seconds since the scheduled launch, `None` before a sequence started.
    pub launch_relative_time: Option<i64>,
    pub heading: f64,
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub orbital_speed: f64,
    pub apoapsis_altitude: f64,
    pub periapsis_altitude: f64,
    pub inclination: f64,
    pub eccentricity: f64,
}

impl FlightSample {
    pub fn capture(
        time: DateTime<Utc>,
        launch_relative_time: Option<i64>,
        flight: &FlightInfo,
        orbit: &OrbitInfo,
    ) -> Self {
        Self {
            time,
            launch_relative_time,
            heading: flight.heading(),
            altitude: flight.mean_altitude(),
            latitude: flight.latitude(),
            longitude: flight.longitude(),
            orbital_speed: orbit.speed(),
            apoapsis_altitude: orbit.apoapsis_altitude(),
            periapsis_altitude: orbit.periapsis_altitude(),
            inclination: orbit.inclination(),
            eccentricity: orbit.eccentricity(),
        }
    }

    /// Sample without vessel context, used when no frame was fetched yet.
    pub fn bare(time: DateTime<Utc>, launch_relative_time: Option<i64>) -> Self {
        Self::capture(time, launch_relative_time, &FlightInfo::default(), &OrbitInfo::default())
    }
}

/// A discrete, human readable event together with the sample of the tick it fired in.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event: String,
    pub event_level: EventLevel,
    #[serde(flatten)]
    pub sample: FlightSample,
}

impl EventRecord {
    pub fn new(event: impl Into<String>, event_level: EventLevel, sample: FlightSample) -> Self {
        Self { event: event.into(), event_level, sample }
    }
}
