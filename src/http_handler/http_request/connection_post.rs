use super::connection::ConnectionResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};

/// Request type for the /connections endpoint. Opens a named client connection.
#[derive(serde::Serialize, Debug)]
pub(crate) struct OpenConnectionRequest {
    /// Name the connection shows up with in the game-side server.
    pub(crate) name: String,
}

impl JSONBodyHTTPRequestType for OpenConnectionRequest {
    type Body = OpenConnectionRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for OpenConnectionRequest {
    type Response = ConnectionResponse;
    fn endpoint(&self) -> &'static str { "/connections" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
