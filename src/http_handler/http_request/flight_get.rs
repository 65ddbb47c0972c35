use super::flight::FlightInfo;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for the /vessel/flight endpoint (surface reference frame).
#[derive(Debug)]
pub(crate) struct FlightRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for FlightRequest {}

impl HTTPRequestType for FlightRequest {
    type Response = FlightInfo;
    fn endpoint(&self) -> &'static str { "/vessel/flight" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
