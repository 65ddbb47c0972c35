use super::connection::ConnectionClosedResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for `DELETE /connections/{id}`.
#[derive(Debug)]
pub(crate) struct CloseConnectionRequest {
    endpoint: String,
}

impl CloseConnectionRequest {
    pub(crate) fn new(connection_id: &str) -> Self {
        Self { endpoint: format!("/connections/{connection_id}") }
    }
}

impl NoBodyHTTPRequestType for CloseConnectionRequest {}

impl HTTPRequestType for CloseConnectionRequest {
    type Response = ConnectionClosedResponse;
    fn endpoint(&self) -> &str { self.endpoint.as_str() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Delete }
}
