//! Core data models for Cashflow
//!
//! This module contains the data structures of the budgeting domain:
//! allocation nodes and their groups, flow edges, standalone assets and
//! the money type they all share.

pub mod asset;
pub mod group;
pub mod money;
pub mod node;

pub use asset::Asset;
pub use group::{NodeGroup, OVER_ALLOCATED_COLOR};
pub use money::{Money, MoneyParseError, MAX_AMOUNT};
pub use node::{Edge, Node, NodeId, SavingsProperties, MAX_APR, ROOT_LABEL};
