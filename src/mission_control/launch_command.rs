use super::signal::CloseCode;
use crate::flight_control::TargetOrbit;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Commands a subscriber can send.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LaunchCommand {
    /// Arms all units, counts down to `launch_date` and flies the ascent.
    Sequence { launch_date: DateTime<Utc>, target_orbit: TargetOrbit },
    Disconnect,
}

impl LaunchCommand {
    const KNOWN: [&'static str; 2] = ["sequence", "disconnect"];

    /// Decodes one inbound frame. Anything that is not a JSON object with a
    /// string `command` is malformed; unknown commands are unsupported.
    pub fn decode(raw: &[u8]) -> Result<Self, CloseCode> {
        let value: Value = serde_json::from_slice(raw).map_err(|_| CloseCode::MalformedMessage)?;
        let command = value
            .get("command")
            .and_then(Value::as_str)
            .ok_or(CloseCode::MalformedMessage)?;
        if !Self::KNOWN.contains(&command) {
            return Err(CloseCode::UnsupportedCommand);
        }
        serde_json::from_value(value).map_err(|_| CloseCode::MalformedMessage)
    }
}
