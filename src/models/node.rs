//! Allocation node model
//!
//! Nodes live in the arena of an [`AllocationTree`](crate::services::AllocationTree)
//! and refer to each other by [`NodeId`]. A parent owns an ordered list of
//! [`Edge`]s, each carrying the monthly amount flowing into one child.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::NodeGroup;
use super::money::{Money, MAX_AMOUNT};
use crate::error::{CashflowError, CashflowResult};

/// Label of the root node created by `start`
pub const ROOT_LABEL: &str = "Income";

/// Highest APR accepted for a savings node, in percent
pub const MAX_APR: f64 = 20.0;

/// Index of a node slot in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the slot in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A parent → child flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Receiving node
    pub child: NodeId,
    /// Monthly amount, always positive
    pub amount: Money,
}

/// Interest-bearing properties of a savings node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SavingsProperties {
    /// Annual percentage rate, 0 to 20
    pub apr: f64,
    /// Balance already sitting in the account
    pub current_balance: Money,
}

impl SavingsProperties {
    pub fn new(apr: f64, current_balance: Money) -> Self {
        Self {
            apr,
            current_balance,
        }
    }

    /// Monthly growth factor derived from the APR
    pub fn monthly_factor(&self) -> f64 {
        1.0 + self.apr / 1200.0
    }

    /// Validate the properties
    pub fn validate(&self) -> CashflowResult<()> {
        validate_apr(self.apr)?;
        validate_balance(self.current_balance)
    }
}

/// Check that an APR lies within the accepted range
pub fn validate_apr(apr: f64) -> CashflowResult<()> {
    if !apr.is_finite() || !(0.0..=MAX_APR).contains(&apr) {
        return Err(CashflowError::InvalidAmount(format!(
            "APR must be between 0 and {}, got {}",
            MAX_APR, apr
        )));
    }
    Ok(())
}

/// Check that a starting balance is not negative or above [`MAX_AMOUNT`]
pub fn validate_balance(balance: Money) -> CashflowResult<()> {
    if balance.is_negative() {
        return Err(CashflowError::InvalidAmount(format!(
            "Current balance cannot be negative, got {}",
            balance
        )));
    }
    validate_cap(balance, "Current balance")
}

/// Check that an amount does not exceed [`MAX_AMOUNT`]
pub fn validate_cap(amount: Money, what: &str) -> CashflowResult<()> {
    if amount > MAX_AMOUNT {
        return Err(CashflowError::InvalidAmount(format!(
            "{} must be at most {}, got {}",
            what, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

/// Check that a flow amount or income is strictly positive and capped
pub fn validate_positive(amount: Money, what: &str) -> CashflowResult<()> {
    if !amount.is_positive() {
        return Err(CashflowError::InvalidAmount(format!(
            "{} must be positive, got {}",
            what, amount
        )));
    }
    validate_cap(amount, what)
}

/// Trim a label and reject empty ones
pub fn normalize_label(label: &str) -> CashflowResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CashflowError::Validation("Node name cannot be empty".into()));
    }
    Ok(label.to_string())
}

/// A node of the allocation tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Globally unique label
    pub label: String,

    /// Node group (priority, color, projection eligibility)
    pub group: NodeGroup,

    /// Outgoing flows in insertion order
    pub edges: Vec<Edge>,

    /// Parent slot; `None` only for the root
    pub parent: Option<NodeId>,

    /// Present only while the node is in the savings group
    pub savings: Option<SavingsProperties>,
}

impl Node {
    /// Create a new childless node
    pub fn new(label: impl Into<String>, group: NodeGroup, parent: Option<NodeId>) -> Self {
        Self {
            label: label.into(),
            group,
            edges: Vec::new(),
            parent,
            savings: None,
        }
    }

    /// True when the node has no outgoing flows
    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all outgoing flows
    pub fn outflow(&self) -> Money {
        self.edges.iter().map(|e| e.amount).sum()
    }

    /// Savings properties, or zeroes when none were ever set
    pub fn savings_or_default(&self) -> SavingsProperties {
        self.savings.unwrap_or_default()
    }

    /// Edge pointing at `child`, if this node is its parent
    pub fn edge_to(&self, child: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.child == child)
    }

    pub(crate) fn edge_to_mut(&mut self, child: NodeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.child == child)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
