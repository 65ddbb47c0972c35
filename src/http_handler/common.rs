use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use strum_macros::Display;

/// Three-component vector as delivered by the bridge (pitch, yaw, roll or x, y, z).
pub type Vector3 = [f64; 3];

/// Torque pair `(positive, negative)` as reported for reaction wheels.
pub type TorquePair = (Vector3, Vector3);

#[derive(Debug, Display)]
pub enum HTTPError {
    HTTPRequestError(RequestError),
    HTTPResponseError(ResponseError),
}

impl HTTPError {
    /// Whether retrying the call on a fresh connection can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            HTTPError::HTTPRequestError(err) => err.is_transient(),
            HTTPError::HTTPResponseError(err) => err.is_transient(),
        }
    }
}

impl std::error::Error for HTTPError {}

impl From<RequestError> for HTTPError {
    fn from(value: RequestError) -> Self { HTTPError::HTTPRequestError(value) }
}

impl From<ResponseError> for HTTPError {
    fn from(value: ResponseError) -> Self { HTTPError::HTTPResponseError(value) }
}

/// Reference direction the stability assist holds.
#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SasMode {
    StabilityAssist,
    Prograde,
    Retrograde,
    Normal,
    AntiNormal,
    Radial,
    AntiRadial,
}
