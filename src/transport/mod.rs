//! HTTP transport layer for outbound API calls.

mod http;
mod error;
mod reqwest;
pub mod endpoints;
mod request;

pub use http::{HttpTransport, HttpMethod, HttpRequest, HttpResponse};
pub use error::TransportError;
pub use self::reqwest::ReqwestTransport;
pub use request::RequestBuilder;
