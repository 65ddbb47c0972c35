use super::control::ControlAckResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for `PUT /control/stage`. Fires the next stage.
#[derive(Debug)]
pub(crate) struct ActivateStageRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for ActivateStageRequest {}

impl HTTPRequestType for ActivateStageRequest {
    type Response = ControlAckResponse;
    fn endpoint(&self) -> &'static str { "/control/stage" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
