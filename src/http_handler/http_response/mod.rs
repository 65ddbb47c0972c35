pub(crate) mod response_common;

pub mod ascent_autopilot;
pub mod connection;
pub mod control;
pub mod flight;
pub mod orbit;
pub mod parts;
pub mod scene;
pub mod vessel;
