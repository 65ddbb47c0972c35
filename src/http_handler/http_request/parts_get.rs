use super::parts::PartsResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for the /vessel/parts endpoint.
#[derive(Debug)]
pub(crate) struct PartsRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for PartsRequest {}

impl HTTPRequestType for PartsRequest {
    type Response = PartsResponse;
    fn endpoint(&self) -> &'static str { "/vessel/parts" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
