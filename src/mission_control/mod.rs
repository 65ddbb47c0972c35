//! Drives the vehicle: the recording tick, the launch sequence and the
//! per-subscriber session that ties both to the subscriber channel.

mod flight_core;
mod flight_session;
mod launch_command;
mod launch_sequence;
mod schedule;
mod signal;


pub use flight_core::{FlightCore, TelemetryFrame, TickOutcome, launch_relative_seconds};
pub use flight_session::FlightSession;
pub use launch_command::LaunchCommand;
pub use launch_sequence::{LaunchSequence, SequenceOutcome};
pub use schedule::TickSchedule;
pub use signal::{CloseCode, SessionExit};
