//! Reflection Explorer hierarchy
//!
//! The lazily expanded drill-down tree: node storage, the per-node
//! expansion state machine and the renderer that turns fetched labels into
//! rows.

pub mod controller;
pub mod renderer;
pub mod tree;

pub use controller::{
    spawn_fetch, Activation, ApplyOutcome, FetchCompletion, FetchTicket, StalePolicy,
    TreeController, TreeError,
};
pub use renderer::{HierarchyRenderer, RenderedRow, DEFAULT_INDENT_WIDTH};
pub use tree::{ExpansionState, IdAllocator, NodeId, TreeNode};
