//! Node group model
//!
//! The group of an allocation node decides its traversal priority, its
//! diagram colors and whether it takes part in savings projections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CashflowError;

/// Color used for any over-allocated node, overriding its group color
pub const OVER_ALLOCATED_COLOR: &str = "#FF0000";

/// Kind of allocation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    /// The root planned income
    Income,
    /// A pass-through bucket that splits further
    #[default]
    Intermediate,
    /// Savings or investment bucket, eligible for interest projection
    Savings,
    /// Terminal spending
    Expense,
    /// Money parked in an account without a specific purpose
    Holding,
    /// Synthetic surplus bucket in the flow diagram
    Unallocated,
}

impl NodeGroup {
    /// Groups a user may assign to a node they create
    pub fn assignable() -> &'static [Self] {
        &[Self::Intermediate, Self::Savings, Self::Expense, Self::Holding]
    }

    /// Sibling ordering score; lower visits first
    pub const fn priority(&self) -> i32 {
        match self {
            Self::Income => -20,
            Self::Savings => 0,
            Self::Intermediate => 10,
            Self::Holding => 15,
            Self::Expense => 20,
            Self::Unallocated => 25,
        }
    }

    /// Whether nodes of this group carry APR and balance properties
    pub const fn is_savings(&self) -> bool {
        matches!(self, Self::Savings)
    }

    /// Fill color of a node of this group
    pub const fn node_color(&self) -> &'static str {
        match self {
            Self::Income => "#90EE90",
            Self::Savings => "#228B22",
            Self::Expense => "#FF6347",
            Self::Holding => "#4682B4",
            Self::Unallocated => "#FFA500",
            Self::Intermediate => "#A9A9A9",
        }
    }

    /// Color of an edge flowing into a node of this group
    pub const fn link_color(&self) -> &'static str {
        match self {
            Self::Savings => "rgba(34, 139, 34, 0.6)",
            Self::Expense => "rgba(255, 99, 71, 0.6)",
            Self::Unallocated => "rgba(255, 165, 0, 0.6)",
            _ => "rgba(70, 130, 180, 0.6)",
        }
    }

    /// Lowercase name as used on the command line and in exports
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Intermediate => "intermediate",
            Self::Savings => "savings",
            Self::Expense => "expense",
            Self::Holding => "holding",
            Self::Unallocated => "unallocated",
        }
    }

    /// Parse group from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "intermediate" | "bucket" => Some(Self::Intermediate),
            "savings" | "saving" => Some(Self::Savings),
            "expense" | "expenses" => Some(Self::Expense),
            "holding" => Some(Self::Holding),
            "unallocated" => Some(Self::Unallocated),
            _ => None,
        }
    }
}

impl FromStr for NodeGroup {
    type Err = CashflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            CashflowError::Validation(format!(
                "Unknown node group '{}' (expected one of: intermediate, savings, expense, holding)",
                s.trim()
            ))
        })
    }
}

impl fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let groups = [
            NodeGroup::Income,
            NodeGroup::Savings,
            NodeGroup::Intermediate,
            NodeGroup::Holding,
            NodeGroup::Expense,
            NodeGroup::Unallocated,
        ];
        let priorities: Vec<i32> = groups.iter().map(|g| g.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(NodeGroup::Income.priority(), -20);
        assert_eq!(NodeGroup::Unallocated.priority(), 25);
    }

    #[test]
    fn test_parse() {
        assert_eq!(NodeGroup::parse("Savings"), Some(NodeGroup::Savings));
        assert_eq!(NodeGroup::parse(" expense "), Some(NodeGroup::Expense));
        assert_eq!(NodeGroup::parse("nope"), None);
        assert!("nope".parse::<NodeGroup>().is_err());
        assert_eq!("holding".parse::<NodeGroup>().unwrap(), NodeGroup::Holding);
    }

    #[test]
    fn test_colors() {
        assert_eq!(NodeGroup::Savings.node_color(), "#228B22");
        assert_eq!(NodeGroup::Holding.link_color(), "rgba(70, 130, 180, 0.6)");
        assert_eq!(NodeGroup::Unallocated.link_color(), "rgba(255, 165, 0, 0.6)");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&NodeGroup::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
        let back: NodeGroup = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(back, NodeGroup::Expense);
    }
}
