//! Reflection Explorer protocol - core types
//!
//! Endpoint addresses and the service registry as served by the
//! reflection/discovery API, plus the node contexts that identify each
//! level of the drill-down tree.

pub mod address;
pub mod constants;
pub mod context;
pub mod error;
pub mod registry;

pub use address::*;
pub use constants::*;
pub use context::*;
pub use error::*;
pub use registry::*;
