//! Reflection Explorer network layer
//!
//! The [`FetchGateway`] seam through which the tree controller reads one
//! level of children, and its HTTP implementation against the reflection
//! API.

pub mod gateway;
pub mod http;

pub use gateway::{Endpoint, FetchGateway, FetchRequest};
pub use http::{HttpGateway, HttpGatewayConfig};
pub use rfx_protocol::FetchError;
