use super::ascent_autopilot::AscentAutopilotResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for polling the ascent autopilot.
#[derive(Debug)]
pub(crate) struct AscentAutopilotStateRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for AscentAutopilotStateRequest {}

impl HTTPRequestType for AscentAutopilotStateRequest {
    type Response = AscentAutopilotResponse;
    fn endpoint(&self) -> &'static str { "/autopilot/ascent" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
