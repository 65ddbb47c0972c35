use super::control::ControlAckResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, connection_header,
};
use crate::http_handler::common::SasMode;

/// Request type for `PUT /control/sas`.
#[derive(serde::Serialize, Debug)]
pub(crate) struct SasRequest {
    #[serde(skip)]
    pub(crate) connection_id: String,
    pub(crate) enabled: bool,
    pub(crate) mode: SasMode,
}

impl JSONBodyHTTPRequestType for SasRequest {
    type Body = SasRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for SasRequest {
    type Response = ControlAckResponse;
    fn endpoint(&self) -> &'static str { "/control/sas" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
