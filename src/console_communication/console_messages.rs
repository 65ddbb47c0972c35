use crate::mission_control::{CloseCode, TelemetryFrame};

/// Messages sent from the core to a subscriber.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownstreamMessage {
    Telemetry(Box<TelemetryFrame>),
    Close { code: u16, reason: String },
}

impl DownstreamMessage {
    pub fn close(code: CloseCode) -> Self {
        DownstreamMessage::Close { code: code.code(), reason: code.reason().to_string() }
    }
}
