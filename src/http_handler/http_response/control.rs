use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Acknowledgement of a control command (staging, SAS).
#[derive(serde::Deserialize, Debug, Default)]
pub struct ControlAckResponse {
    #[serde(default)]
    accepted: bool,
    #[serde(default)]
    current_stage: Option<i32>,
}

impl SerdeJSONBodyHTTPResponseType for ControlAckResponse {}

impl ControlAckResponse {
    pub fn is_accepted(&self) -> bool { self.accepted }
    pub fn current_stage(&self) -> Option<i32> { self.current_stage }
}
