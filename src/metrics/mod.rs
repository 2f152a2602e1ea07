//! Derived budget metrics
//!
//! [`MetricsEngine`] reads a snapshot of the allocation tree and computes
//! everything the rendering side needs: over-allocations, leaf category
//! totals, the flow graph, savings projections and the combined
//! [`Visualization`] payload. It never mutates the tree and reaches nodes
//! only through the tree's traversal order.

pub mod allocation;
pub mod flow;
pub mod projection;
pub mod visualization;

pub use allocation::{CategoryTotals, OverAllocation, OVERALL_BUDGET};
pub use flow::{FlowGraph, FlowLink, FlowNode, SURPLUS_LABEL};
pub use projection::{ProjectionSeries, SavingsProjection};
pub use visualization::{
    AssetBreakdown, AssetSlice, BalanceStatus, BudgetSummary, CoverageBand, ExpenseCoverage,
    Visualization,
};

use crate::models::Money;
use crate::services::AllocationTree;

/// Outflow may exceed inflow by this much before it counts as over-allocated
pub const TOLERANCE: Money = Money::from_cents(1);

/// Read-only metrics over one tree snapshot
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    tree: &'a AllocationTree,
    planned_income: Money,
}

impl<'a> MetricsEngine<'a> {
    /// Create a metrics engine for a tree and its planned income
    pub fn new(tree: &'a AllocationTree, planned_income: Money) -> Self {
        Self {
            tree,
            planned_income,
        }
    }

    pub fn tree(&self) -> &'a AllocationTree {
        self.tree
    }

    pub fn planned_income(&self) -> Money {
        self.planned_income
    }

    /// Total amount allocated directly from the root
    pub fn total_allocated(&self) -> Money {
        self.tree.total_allocated()
    }

    /// Planned income minus total allocated; negative for a deficit
    pub fn surplus(&self) -> Money {
        self.planned_income - self.total_allocated()
    }
}
