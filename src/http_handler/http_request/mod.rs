use super::http_response::{
    ascent_autopilot, connection, control, flight, orbit, parts, response_common, scene, vessel,
};

pub mod ascent_autopilot_get;
pub mod ascent_autopilot_put;
pub mod connection_delete;
pub mod connection_post;
pub mod flight_get;
pub mod orbit_get;
pub mod parts_get;
pub mod request_common;
pub mod sas_put;
pub mod scene_get;
pub mod stage_put;
pub mod vessel_get;
