//! Durable flight log: one NDJSON file holding both the per-tick flight
//! samples and the discrete events.

mod event_log;
mod records;

#[cfg(test)]
mod tests;

pub use event_log::{EventLog, RecorderError};
pub use records::{EventLevel, EventRecord, FlightSample};
