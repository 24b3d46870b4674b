//! Reflection Explorer
//!
//! Terminal front end for browsing a gRPC reflection service: configuration,
//! logging bootstrap and the interactive tree console.

pub mod config;
pub mod console;
pub mod logging;
