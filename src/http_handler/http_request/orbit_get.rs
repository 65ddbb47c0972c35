use super::orbit::OrbitInfo;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for the /vessel/orbit endpoint.
#[derive(Debug)]
pub(crate) struct OrbitRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for OrbitRequest {}

impl HTTPRequestType for OrbitRequest {
    type Response = OrbitInfo;
    fn endpoint(&self) -> &'static str { "/vessel/orbit" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
