//! Hierarchy renderer: labels in, rows out.
//!
//! Rows keep the order the labels arrived in; nothing here sorts.

use rfx_protocol::{NodeContext, NodeRole, ServiceRegistry};

use crate::tree::{IdAllocator, NodeId, TreeNode};

pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// One visual row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: NodeId,
    pub depth: usize,
    pub role: NodeRole,
    pub label: String,
    /// Leading spaces, proportional to depth.
    pub indent: usize,
    pub activatable: bool,
}

impl RenderedRow {
    pub fn line(&self) -> String {
        let pad = " ".repeat(self.indent);
        if self.depth == 0 {
            format!("{pad}{}", self.label)
        } else {
            format!("{pad}- {}", self.label)
        }
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyRenderer {
    indent_width: usize,
}

impl Default for HierarchyRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl HierarchyRenderer {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// One service-group row per registered service.
    pub fn services(&self, registry: &ServiceRegistry, ids: &mut IdAllocator) -> Vec<TreeNode> {
        registry
            .service_names()
            .map(|name| {
                TreeNode::new(
                    ids.next_id(),
                    NodeRole::ServiceGroup,
                    name.to_string(),
                    Some(NodeContext::service_group(name)),
                )
            })
            .collect()
    }

    /// Version rows of a service, labelled `scheme:opaque (version)`.
    pub fn versions(
        &self,
        service_name: &str,
        registry: &ServiceRegistry,
        ids: &mut IdAllocator,
    ) -> Vec<TreeNode> {
        let Some(versions) = registry.versions_of(service_name) else {
            tracing::debug!(service = %service_name, "Service not in registry");
            return Vec::new();
        };
        versions
            .into_iter()
            .map(|(version, address)| {
                let context = NodeContext::version_endpoint(service_name, version, address);
                let label = format!("{} ({})", address.endpoint_url(), version);
                TreeNode::new(ids.next_id(), NodeRole::VersionEndpoint, label, Some(context))
            })
            .collect()
    }

    /// Child rows of a fetched level, each bound to its own context.
    pub fn materialize(
        &self,
        parent: &NodeContext,
        labels: Vec<String>,
        ids: &mut IdAllocator,
    ) -> Vec<TreeNode> {
        let role = parent.child_role();
        labels
            .into_iter()
            .map(|label| {
                let context = parent.child(&label);
                TreeNode::new(ids.next_id(), role, label, context)
            })
            .collect()
    }

    /// Flatten the tree in pre-order.
    pub fn rows(&self, roots: &[TreeNode]) -> Vec<RenderedRow> {
        let mut rows = Vec::new();
        for root in roots {
            self.push_rows(root, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, node: &TreeNode, depth: usize, rows: &mut Vec<RenderedRow>) {
        rows.push(RenderedRow {
            id: node.id,
            depth,
            role: node.role,
            label: node.label.clone(),
            indent: depth * self.indent_width,
            activatable: !node.is_leaf(),
        });
        for child in &node.children {
            self.push_rows(child, depth + 1, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"{"grpc_service": {
        "Echo": {
            "v1": [{"Scheme":"dns","Opaque":"echo-v1:50051"}],
            "v2": [{"Scheme":"dns","Opaque":"echo-v2:50051"}]
        },
        "Greeter": {"stable": [{"Scheme":"passthrough","Opaque":"///greeter:9000"}]}
    }}"#;

    #[test]
    fn version_rows_use_joined_url_and_label() {
        let registry = ServiceRegistry::from_json(REGISTRY).unwrap();
        let renderer = HierarchyRenderer::default();
        let mut ids = IdAllocator::default();

        let rows = renderer.versions("Echo", &registry, &mut ids);
        let labels: Vec<&str> = rows.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["dns:echo-v1:50051 (v1)", "dns:echo-v2:50051 (v2)"]);
        assert!(rows.iter().all(|n| n.role == NodeRole::VersionEndpoint));

        let greeter = renderer.versions("Greeter", &registry, &mut ids);
        assert_eq!(greeter[0].label, "passthrough:///greeter:9000 (stable)");
        assert_eq!(
            greeter[0].context.as_ref().and_then(|c| c.endpoint_url()),
            Some("passthrough:///greeter:9000")
        );
    }

    #[test]
    fn service_and_version_rows_follow_registry_order() {
        let registry = ServiceRegistry::from_json(
            r#"{"grpc_service": {
                "Zeta": {
                    "v2": [{"Scheme":"dns","Opaque":"zeta-v2:1"}],
                    "v1": [{"Scheme":"dns","Opaque":"zeta-v1:1"}]
                },
                "Alpha": {"v1": [{"Scheme":"dns","Opaque":"alpha:1"}]}
            }}"#,
        )
        .unwrap();
        let renderer = HierarchyRenderer::default();
        let mut ids = IdAllocator::default();

        let roots = renderer.services(&registry, &mut ids);
        let names: Vec<&str> = roots.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);

        let versions = renderer.versions("Zeta", &registry, &mut ids);
        let labels: Vec<&str> = versions.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["dns:zeta-v2:1 (v2)", "dns:zeta-v1:1 (v1)"]);
    }

    #[test]
    fn materialize_keeps_fetch_order_and_binds_contexts() {
        let renderer = HierarchyRenderer::default();
        let mut ids = IdAllocator::default();
        let parent = NodeContext::ServiceDefinition {
            endpoint_url: "dns:echo-v1:50051".into(),
            service_def_name: "EchoService".into(),
        };

        let nodes = renderer.materialize(
            &parent,
            vec!["Zulu".into(), "Alpha".into(), "Mike".into()],
            &mut ids,
        );
        let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Zulu", "Alpha", "Mike"]);
        assert_eq!(
            nodes[1].context,
            Some(NodeContext::Method {
                endpoint_url: "dns:echo-v1:50051".into(),
                service_def_name: "EchoService".into(),
                method_name: "Alpha".into(),
            })
        );
    }

    #[test]
    fn field_rows_are_leaves() {
        let renderer = HierarchyRenderer::default();
        let mut ids = IdAllocator::default();
        let parent = NodeContext::Method {
            endpoint_url: "dns:echo-v1:50051".into(),
            service_def_name: "EchoService".into(),
            method_name: "Ping".into(),
        };
        let nodes = renderer.materialize(&parent, vec!["message".into()], &mut ids);
        assert_eq!(nodes[0].role, NodeRole::Field);
        assert!(nodes[0].is_leaf());
    }

    #[test]
    fn rows_indent_by_depth() {
        let registry = ServiceRegistry::from_json(REGISTRY).unwrap();
        let renderer = HierarchyRenderer::new(4);
        let mut ids = IdAllocator::default();

        let mut roots = renderer.services(&registry, &mut ids);
        roots[0].children = renderer.versions("Echo", &registry, &mut ids);

        let rows = renderer.rows(&roots);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].line(), "Echo");
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].indent, 4);
        assert_eq!(rows[1].line(), "    - dns:echo-v1:50051 (v1)");
        assert_eq!(rows[3].label, "Greeter");
        assert!(rows.iter().all(|r| r.activatable));
    }
}
