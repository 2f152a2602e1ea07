//! Over-allocation detection and category totals

use serde::Serialize;
use std::collections::BTreeMap;

use tracing::trace;

use super::{MetricsEngine, TOLERANCE};
use crate::models::{Money, NodeGroup, NodeId};

/// Warning label used when the root hands out more than the planned income
pub const OVERALL_BUDGET: &str = "Overall budget";

/// Result of an over-allocation check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverAllocation {
    /// Root outflow exceeds planned income
    pub overall_budget: bool,
    /// Non-root nodes whose outflow exceeds their inflow, in pre-order
    pub nodes: Vec<NodeId>,
}

impl OverAllocation {
    pub fn is_empty(&self) -> bool {
        !self.overall_budget && self.nodes.is_empty()
    }

    /// Whether a node is drawn as over-allocated. The root counts as
    /// over-allocated when the overall budget is.
    pub fn flags(&self, id: NodeId, root: NodeId) -> bool {
        (id == root && self.overall_budget) || self.nodes.contains(&id)
    }
}

/// Sum of inflows into leaf nodes, per group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<NodeGroup, Money>);

impl CategoryTotals {
    /// Total for a group; zero when no leaf of that group exists
    pub fn get(&self, group: NodeGroup) -> Money {
        self.0.get(&group).copied().unwrap_or_default()
    }

    pub fn savings(&self) -> Money {
        self.get(NodeGroup::Savings)
    }

    pub fn expenses(&self) -> Money {
        self.get(NodeGroup::Expense)
    }

    /// Groups with at least one contributing leaf
    pub fn iter(&self) -> impl Iterator<Item = (NodeGroup, Money)> + '_ {
        self.0.iter().map(|(g, m)| (*g, *m))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add(&mut self, group: NodeGroup, amount: Money) {
        *self.0.entry(group).or_default() += amount;
    }
}

impl<'a> MetricsEngine<'a> {
    /// Find every place where committed outflow exceeds inflow by more than
    /// one cent
    ///
    /// The walk is pre-order in insertion order; each node's inflow is the
    /// amount on its own parent edge.
    pub fn over_allocations(&self) -> OverAllocation {
        let tree = self.tree();
        let root = tree.root();
        let mut result = OverAllocation {
            overall_budget: tree.outflow(root) > self.planned_income() + TOLERANCE,
            nodes: Vec::new(),
        };

        let mut stack: Vec<(NodeId, Money)> = tree
            .node(root)
            .map(|n| n.edges.iter().rev().map(|e| (e.child, e.amount)).collect())
            .unwrap_or_default();

        while let Some((id, inflow)) = stack.pop() {
            let Some(node) = tree.node(id) else { continue };
            if node.outflow() > inflow + TOLERANCE {
                result.nodes.push(id);
            }
            stack.extend(node.edges.iter().rev().map(|e| (e.child, e.amount)));
        }

        trace!(
            overall = result.overall_budget,
            nodes = result.nodes.len(),
            "checked over-allocations"
        );
        result
    }

    /// Labels of over-allocated places, `"Overall budget"` first
    pub fn check_over_allocations(&self) -> Vec<String> {
        let over = self.over_allocations();
        let tree = self.tree();

        let mut labels = Vec::with_capacity(over.nodes.len() + 1);
        if over.overall_budget {
            labels.push(OVERALL_BUDGET.to_string());
        }
        labels.extend(
            over.nodes
                .iter()
                .filter_map(|id| tree.node(*id))
                .map(|n| n.label.clone()),
        );
        labels
    }

    /// Sum the flows into leaf nodes, bucketed by the leaf's group
    ///
    /// Interior nodes do not contribute; their money is counted at the
    /// leaves it ends up in.
    pub fn category_totals(&self) -> CategoryTotals {
        let tree = self.tree();
        let mut totals = CategoryTotals::default();

        for id in tree.collect_nodes() {
            let Some(node) = tree.node(id) else { continue };
            if !node.is_leaf() {
                continue;
            }
            if let Some(inflow) = tree.inflow(id) {
                totals.add(node.group, inflow);
            }
        }

        totals
    }
}
