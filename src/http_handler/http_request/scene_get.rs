use super::scene::SceneResponse;
use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType, connection_header,
};

/// Request type for the /scene endpoint. Only the flight scene carries a vessel.
#[derive(Debug)]
pub(crate) struct SceneRequest {
    pub(crate) connection_id: String,
}

impl NoBodyHTTPRequestType for SceneRequest {}

impl HTTPRequestType for SceneRequest {
    type Response = SceneResponse;
    fn endpoint(&self) -> &'static str { "/scene" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn header_params(&self) -> reqwest::header::HeaderMap { connection_header(&self.connection_id) }
}
