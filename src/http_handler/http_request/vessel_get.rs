use super::vessel::VesselInfo;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

#[derive(Debug)]
pub(crate) struct VesselRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for VesselRequest {}

impl HTTPRequestType for VesselRequest {
    type Response = VesselInfo;
    fn endpoint(&self) -> &'static str { "/vessel" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
