//! Per-node expansion state machine.
//!
//! Activation always clears the node's children and reloads the level:
//! service groups resolve synchronously from the registry, every deeper level
//! issues one fetch through the gateway. Fetches run on tokio tasks and come
//! back as [`FetchCompletion`]s that the owning event loop feeds to
//! [`TreeController::apply`]. Nothing cancels an in-flight fetch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rfx_network::FetchGateway;
use rfx_protocol::{FetchError, NodeContext, NodeRole, ServiceRegistry, NO_FIELD_LABEL};

use crate::renderer::{HierarchyRenderer, RenderedRow};
use crate::tree::{find, find_mut, ExpansionState, IdAllocator, NodeId, TreeNode};

/// What to do with a response when the node was activated again while it
/// was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Only the most recent activation's response is rendered.
    #[default]
    LatestActivation,
    /// Every response replaces the children; the last to arrive wins.
    LastResolved,
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("no node with id {0}")]
    UnknownNode(NodeId),
}

/// A fetch the caller has to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub node: NodeId,
    pub generation: u64,
    pub context: NodeContext,
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub node: NodeId,
    pub generation: u64,
    pub context: NodeContext,
    pub result: Result<Vec<String>, FetchError>,
}

impl FetchTicket {
    pub fn complete(self, result: Result<Vec<String>, FetchError>) -> FetchCompletion {
        FetchCompletion {
            node: self.node,
            generation: self.generation,
            context: self.context,
            result,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Activation {
    /// Children were rendered synchronously.
    Rendered { children: usize },
    /// Children will be rendered once the ticket's fetch completes.
    Fetching(FetchTicket),
    /// Field rows have nothing below them.
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Rendered { children: usize },
    /// Superseded by a later activation of the same node.
    Stale,
    /// The node was removed by the re-activation of an ancestor.
    Orphaned,
    Failed,
}

pub struct TreeController {
    registry: Arc<ServiceRegistry>,
    renderer: HierarchyRenderer,
    policy: StalePolicy,
    ids: IdAllocator,
    roots: Vec<TreeNode>,
}

impl TreeController {
    /// Build the root service rows from the loaded registry.
    pub fn new(
        registry: Arc<ServiceRegistry>,
        renderer: HierarchyRenderer,
        policy: StalePolicy,
    ) -> Self {
        let mut ids = IdAllocator::default();
        let roots = renderer.services(&registry, &mut ids);
        Self {
            registry,
            renderer,
            policy,
            ids,
            roots,
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        find(&self.roots, id)
    }

    pub fn rows(&self) -> Vec<RenderedRow> {
        self.renderer.rows(&self.roots)
    }

    /// Activate a row: drop its children, then reload them.
    pub fn activate(&mut self, id: NodeId) -> Result<Activation, TreeError> {
        let Self {
            registry,
            renderer,
            ids,
            roots,
            ..
        } = self;
        let node = find_mut(roots, id).ok_or(TreeError::UnknownNode(id))?;

        let Some(context) = node.context.clone() else {
            tracing::debug!(node = %id, label = %node.label, "Field row activated");
            return Ok(Activation::Leaf);
        };

        node.children.clear();
        node.generation += 1;

        match &context {
            NodeContext::ServiceGroup { service_name } => {
                node.children = renderer.versions(service_name, registry, ids);
                node.state = ExpansionState::Loaded;
                Ok(Activation::Rendered {
                    children: node.children.len(),
                })
            }
            _ => {
                node.state = ExpansionState::Loading;
                tracing::debug!(
                    node = %id,
                    generation = node.generation,
                    context = %context,
                    "Fetching children"
                );
                Ok(Activation::Fetching(FetchTicket {
                    node: id,
                    generation: node.generation,
                    context,
                }))
            }
        }
    }

    /// Render a finished fetch into the tree.
    ///
    /// Failures leave the node without new children and surface nowhere but
    /// the log.
    pub fn apply(&mut self, completion: FetchCompletion) -> ApplyOutcome {
        let policy = self.policy;
        let Self {
            renderer,
            ids,
            roots,
            ..
        } = self;

        let Some(node) = find_mut(roots, completion.node) else {
            tracing::debug!(node = %completion.node, "Completion for a removed node dropped");
            return ApplyOutcome::Orphaned;
        };

        if policy == StalePolicy::LatestActivation && completion.generation != node.generation {
            tracing::debug!(
                node = %completion.node,
                generation = completion.generation,
                current = node.generation,
                "Stale completion dropped"
            );
            return ApplyOutcome::Stale;
        }

        let Some(context) = node.context.clone() else {
            return ApplyOutcome::Orphaned;
        };
        // An older completion under `LastResolved` renders, but the node
        // stays Loading until its newest fetch lands.
        let latest = completion.generation == node.generation;

        match completion.result {
            Ok(labels) => {
                let labels = if context.child_role() == NodeRole::Field && labels.is_empty() {
                    vec![NO_FIELD_LABEL.to_string()]
                } else {
                    labels
                };
                node.children = renderer.materialize(&context, labels, ids);
                if latest {
                    node.state = ExpansionState::Loaded;
                }
                ApplyOutcome::Rendered {
                    children: node.children.len(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    node = %completion.node,
                    context = %completion.context,
                    error = %e,
                    "Fetch failed"
                );
                if latest {
                    node.state = if node.children.is_empty() {
                        ExpansionState::Collapsed
                    } else {
                        ExpansionState::Loaded
                    };
                }
                ApplyOutcome::Failed
            }
        }
    }
}

/// Run a ticket's fetch on a tokio task and report back on `completions`.
pub fn spawn_fetch<G>(
    gateway: Arc<G>,
    ticket: FetchTicket,
    completions: mpsc::UnboundedSender<FetchCompletion>,
) -> JoinHandle<()>
where
    G: FetchGateway + ?Sized + 'static,
{
    tokio::spawn(async move {
        let result = gateway.fetch(&ticket.context).await;
        if completions.send(ticket.complete(result)).is_err() {
            tracing::debug!("Completion receiver closed");
        }
    })
}
