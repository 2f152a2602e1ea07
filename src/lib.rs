//! Cashflow - monthly budget allocation modelling
//!
//! This library models a monthly budget as a tree of cash flows rooted at the
//! planned income. Money is allocated from a node to its children, and the
//! metrics engine derives over-allocations, category totals, a Sankey-ready
//! flow graph and savings projections from the tree.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, groups, nodes, assets)
//! - `services`: Allocation tree and budget session state
//! - `metrics`: Derived metrics and the visualization payload
//! - `export`: JSON, YAML and CSV export of the payload
//! - `display`: Terminal formatting
//! - `cli`: Session command parsing and execution
//!
//! # Example
//!
//! ```rust
//! use cashflow::models::{Money, NodeGroup};
//! use cashflow::services::BudgetState;
//!
//! let mut state = BudgetState::new();
//! state.start(Money::from_dollars(5000)).unwrap();
//! state
//!     .add_node("Income", "Rent", Money::from_dollars(1500), NodeGroup::Expense, 0.0, Money::zero())
//!     .unwrap();
//!
//! let viz = state.visualization(0).unwrap();
//! assert!(viz.warnings.is_empty());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::{CashflowError, CashflowResult};
