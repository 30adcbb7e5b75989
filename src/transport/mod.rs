pub mod api;
pub mod http;

pub use api::{Transport, TransportError};
pub use http::HttpTransport;
