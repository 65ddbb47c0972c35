//! HTTP bridge to the vehicle-control service.
//!
//! Every endpoint of the bridge is modelled as one request type in
//! [`http_request`] and one parsed response type in [`http_response`]. The
//! request types know their endpoint and method; the response types know how
//! to decode themselves. [`http_client::HTTPClient`] carries the base URL and
//! the configured timeout.

pub mod common;
pub mod http_client;
pub mod http_request;
pub mod http_response;

pub use common::HTTPError;
