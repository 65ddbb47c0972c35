use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Answer of the bridge when a named client connection was opened.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct ConnectionResponse {
    connection_id: String,
    #[serde(default)]
    server_version: Option<String>,
}

impl SerdeJSONBodyHTTPResponseType for ConnectionResponse {}

impl ConnectionResponse {
    pub fn connection_id(&self) -> &str { self.connection_id.as_str() }
    pub fn server_version(&self) -> Option<&str> { self.server_version.as_deref() }
}

/// Answer to closing a connection.
#[derive(serde::Deserialize, Debug)]
pub struct ConnectionClosedResponse {
    #[serde(default)]
    closed: bool,
}

impl SerdeJSONBodyHTTPResponseType for ConnectionClosedResponse {}

impl ConnectionClosedResponse {
    pub fn is_closed(&self) -> bool { self.closed }
}
