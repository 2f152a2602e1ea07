//! Service layer for Cashflow
//!
//! The service layer holds the mutable budget: the allocation tree with its
//! structural rules, and the session state that wraps it together with the
//! planned income and standalone assets.

pub mod budget;
pub mod tree;

pub use budget::BudgetState;
pub use tree::{AllocationTree, NodeEdit};
