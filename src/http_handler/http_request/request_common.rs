use crate::http_handler::common::HTTPError;
use crate::http_handler::http_client::HTTPClient;
use crate::http_handler::http_response::response_common::HTTPResponseType;
use std::future::Future;
use strum_macros::Display;

/// HTTP verbs used by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HTTPRequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HTTPRequestMethod> for reqwest::Method {
    fn from(value: HTTPRequestMethod) -> Self {
        match value {
            HTTPRequestMethod::Get => reqwest::Method::GET,
            HTTPRequestMethod::Post => reqwest::Method::POST,
            HTTPRequestMethod::Put => reqwest::Method::PUT,
            HTTPRequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Shorthand for the parsed response of a request type.
pub(crate) type ParsedResponse<T> =
    <<T as HTTPRequestType>::Response as HTTPResponseType>::ParsedResponseType;

pub(crate) trait HTTPRequestType: Sync {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// Endpoint path relative to the base URL.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::new() }

    fn get_request_base(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        client.client().request(self.request_method().into(), url).headers(self.header_params())
    }
}

/// Header naming the bridge connection a call belongs to.
pub(crate) const CONNECTION_HEADER: &str = "x-connection-id";

/// Builds the header map carrying the connection id. An id that is not a
/// valid header value yields an empty map and the bridge rejects the call.
pub(crate) fn connection_header(connection_id: &str) -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Ok(value) = reqwest::header::HeaderValue::from_str(connection_id) {
        headers.insert(CONNECTION_HEADER, value);
    }
    headers
}

pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    fn send_request(
        &self,
        client: &HTTPClient,
    ) -> impl Future<Output = Result<ParsedResponse<Self>, HTTPError>> + Send {
        async move {
            let response =
                self.get_request_base(client).send().await.map_err(RequestError::from)?;
            Ok(Self::Response::read_response(response).await?)
        }
    }
}

pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize + Sync;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    fn send_request(
        &self,
        client: &HTTPClient,
    ) -> impl Future<Output = Result<ParsedResponse<Self>, HTTPError>> + Send {
        async move {
            let response = self
                .get_request_base(client)
                .json(self.body())
                .send()
                .await
                .map_err(RequestError::from)?;
            Ok(Self::Response::read_response(response).await?)
        }
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    /// The bridge could not be reached at all.
    NoConnection,
    /// The request did not complete in time.
    Timeout,
    /// The request could not be built (invalid URL, body serialization).
    Malformed,
    Unknown,
}

impl RequestError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RequestError::NoConnection | RequestError::Timeout | RequestError::Unknown)
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() {
            RequestError::NoConnection
        } else if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_builder() || value.is_body() {
            RequestError::Malformed
        } else {
            RequestError::Unknown
        }
    }
}
