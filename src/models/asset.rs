//! Standalone asset model
//!
//! Assets are net-worth items (a house, a brokerage account) tracked next to
//! the allocation tree. They take no part in the monthly cash flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::node::validate_cap;
use crate::error::{CashflowError, CashflowResult};

/// A named standalone asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset name
    pub name: String,

    /// Current value
    pub value: Money,
}

impl Asset {
    /// Create a new asset
    pub fn new(name: impl Into<String>, value: Money) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Validate the asset
    pub fn validate(&self) -> CashflowResult<()> {
        if self.name.trim().is_empty() {
            return Err(CashflowError::Validation("Asset name cannot be empty".into()));
        }

        if self.value.is_negative() {
            return Err(CashflowError::InvalidAmount(format!(
                "Asset value cannot be negative, got {}",
                self.value
            )));
        }

        validate_cap(self.value, "Asset value")
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
