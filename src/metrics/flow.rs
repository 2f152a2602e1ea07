//! Flow graph for Sankey-style diagrams
//!
//! Nodes are listed in the tree's traversal order and links refer to them by
//! position. When part of the planned income is not allocated, an
//! `"Unallocated Surplus"` node is shown as the last child of the root. That
//! node exists only in the graph; the tree is never touched.

use serde::Serialize;

use tracing::trace;

use super::MetricsEngine;
use crate::models::{Money, NodeGroup, OVER_ALLOCATED_COLOR};

/// Label of the synthetic surplus node
pub const SURPLUS_LABEL: &str = "Unallocated Surplus";

/// A node of the flow graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub label: String,
    pub group: NodeGroup,
    /// Outflow when the node has children, inflow otherwise
    pub value: Money,
    pub over_allocated: bool,
    /// True only for the surplus node
    pub synthetic: bool,
    pub color: &'static str,
}

/// A link between two graph positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub amount: Money,
    pub color: &'static str,
}

/// Node and link lists ready for a Sankey renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    pub planned_income: Money,
    pub allocated: Money,
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    /// Position of a label in the node list
    pub fn position(&self, label: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.label == label && !n.synthetic)
    }

    /// The synthetic surplus node, if the graph has one
    pub fn surplus_node(&self) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.synthetic)
    }
}

impl<'a> MetricsEngine<'a> {
    /// Build the flow graph of the current tree
    pub fn flow_graph(&self) -> FlowGraph {
        let tree = self.tree();
        let root = tree.root();
        let order = tree.collect_nodes();
        let over = self.over_allocations();
        let allocated = self.total_allocated();
        let surplus = self.surplus();

        // The surplus node has the highest priority and is appended after
        // every real child of the root, so traversal puts it last.
        let surplus = (surplus > super::TOLERANCE).then_some(surplus);

        let mut position = vec![None; order.iter().map(|id| id.index() + 1).max().unwrap_or(0)];
        for (i, id) in order.iter().enumerate() {
            position[id.index()] = Some(i);
        }
        let surplus_position = order.len();

        let mut nodes = Vec::with_capacity(order.len() + 1);
        let mut links = Vec::new();

        for &id in &order {
            let Some(node) = tree.node(id) else { continue };
            let over_allocated = over.flags(id, root);
            let value = if node.is_leaf() {
                tree.inflow(id).unwrap_or_default()
            } else {
                node.outflow()
            };

            nodes.push(FlowNode {
                label: node.label.clone(),
                group: node.group,
                value,
                over_allocated,
                synthetic: false,
                color: if over_allocated {
                    OVER_ALLOCATED_COLOR
                } else {
                    node.group.node_color()
                },
            });

            let Some(source) = position[id.index()] else { continue };
            for edge in &node.edges {
                let Some(target) = position.get(edge.child.index()).copied().flatten() else {
                    continue;
                };
                let child_group = tree.node(edge.child).map_or(NodeGroup::Intermediate, |c| c.group);
                links.push(FlowLink {
                    source,
                    target,
                    amount: edge.amount,
                    color: child_group.link_color(),
                });
            }

            if id == root {
                if let Some(amount) = surplus {
                    links.push(FlowLink {
                        source,
                        target: surplus_position,
                        amount,
                        color: NodeGroup::Unallocated.link_color(),
                    });
                }
            }
        }

        if let Some(amount) = surplus {
            nodes.push(FlowNode {
                label: SURPLUS_LABEL.to_string(),
                group: NodeGroup::Unallocated,
                value: amount,
                over_allocated: false,
                synthetic: true,
                color: NodeGroup::Unallocated.node_color(),
            });
        }

        trace!(nodes = nodes.len(), links = links.len(), "built flow graph");
        FlowGraph {
            planned_income: self.planned_income(),
            allocated,
            nodes,
            links,
        }
    }
}
