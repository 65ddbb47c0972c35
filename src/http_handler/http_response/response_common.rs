use std::future::Future;
use strum_macros::Display;

/// Marker for responses that are plain JSON documents decoded with serde.
pub(crate) trait SerdeJSONBodyHTTPResponseType {}

impl<T> HTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    T: serde::de::DeserializeOwned + Send,
{
    type ParsedResponseType = T;

    fn read_response(
        response: reqwest::Response,
    ) -> impl Future<Output = Result<Self::ParsedResponseType, ResponseError>> + Send {
        async move {
            let resp = Self::unwrap_return_code(response).await?;
            Ok(resp.json::<Self::ParsedResponseType>().await?)
        }
    }
}

pub(crate) trait HTTPResponseType {
    type ParsedResponseType: Send;

    fn read_response(
        response: reqwest::Response,
    ) -> impl Future<Output = Result<Self::ParsedResponseType, ResponseError>> + Send;

    fn unwrap_return_code(
        response: reqwest::Response,
    ) -> impl Future<Output = Result<reqwest::Response, ResponseError>> + Send {
        async move {
            let status = response.status();
            if status.is_success() {
                Ok(response)
            } else if status.is_server_error() {
                Err(ResponseError::InternalServer(status.as_u16()))
            } else if status.is_client_error() {
                Err(ResponseError::BadRequest(response.text().await.unwrap_or_default()))
            } else {
                Err(ResponseError::Unknown)
            }
        }
    }
}

#[derive(Debug, Display)]
pub enum ResponseError {
    /// The bridge answered with a 5xx status, usually because the game-side RPC failed.
    InternalServer(u16),
    /// The bridge rejected the request; the body carries its explanation.
    BadRequest(String),
    /// The body did not match the expected schema.
    Decode,
    NoConnection,
    Unknown,
}

impl ResponseError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResponseError::InternalServer(_) | ResponseError::NoConnection | ResponseError::Unknown
        )
    }
}

impl std::error::Error for ResponseError {}

impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ResponseError::Decode
        } else if value.is_timeout() || value.is_connect() {
            ResponseError::NoConnection
        } else {
            ResponseError::Unknown
        }
    }
}
