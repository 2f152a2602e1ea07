//! Visualization payload
//!
//! Bundles everything a renderer needs after a mutation: the flow graph,
//! over-allocation warnings, category totals, the expense coverage gauge,
//! the asset breakdown, an optional savings projection and the summary
//! figures. Only numbers, labels and small classification tags go in here;
//! composing markup or chart objects is the renderer's job.

use serde::Serialize;

use tracing::trace;

use super::{CategoryTotals, FlowGraph, MetricsEngine, SavingsProjection};
use crate::models::{Asset, Money};

/// Upper bound of the expense gauge axis, in percent
pub const GAUGE_AXIS_MAX: f64 = 130.0;

/// Label of the placeholder slice shown when there are no assets
pub const NO_ASSETS_LABEL: &str = "No assets yet";

/// Color band of the expense gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageBand {
    /// Expenses take at most 80% of income
    Ok,
    /// Between 80% and 100%
    Caution,
    /// Expenses exceed income
    Over,
}

impl CoverageBand {
    /// Classify an expense percentage
    pub fn classify(percent: f64) -> Self {
        if percent > 100.0 {
            Self::Over
        } else if percent > 80.0 {
            Self::Caution
        } else {
            Self::Ok
        }
    }

    /// Bar color of the gauge
    pub fn color(&self) -> &'static str {
        match self {
            Self::Ok => "green",
            Self::Caution => "darkorange",
            Self::Over => "red",
        }
    }
}

/// Expenses as a share of planned income
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseCoverage {
    pub expense_total: Money,
    pub percent: f64,
    pub band: CoverageBand,
    pub axis_max: f64,
    /// Background steps of the gauge: `[from, to]` percent ranges
    pub steps: [(f64, f64); 3],
}

impl ExpenseCoverage {
    pub fn new(expense_total: Money, planned_income: Money) -> Self {
        let percent = if planned_income.is_positive() {
            expense_total.as_f64() / planned_income.as_f64() * 100.0
        } else {
            0.0
        };

        Self {
            expense_total,
            percent,
            band: CoverageBand::classify(percent),
            axis_max: GAUGE_AXIS_MAX,
            steps: [(0.0, 80.0), (80.0, 100.0), (100.0, GAUGE_AXIS_MAX)],
        }
    }
}

/// One slice of the asset pie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSlice {
    pub name: String,
    pub value: Money,
    /// Share of the asset total, in percent
    pub share: f64,
}

/// Standalone assets as pie slices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetBreakdown {
    pub total: Money,
    pub slices: Vec<AssetSlice>,
    /// True when `slices` holds only the "No assets yet" placeholder
    pub placeholder: bool,
}

impl AssetBreakdown {
    pub fn new(assets: &[Asset]) -> Self {
        if assets.is_empty() {
            return Self {
                total: Money::zero(),
                slices: vec![AssetSlice {
                    name: NO_ASSETS_LABEL.to_string(),
                    value: Money::from_dollars(1),
                    share: 100.0,
                }],
                placeholder: true,
            };
        }

        let total: Money = assets.iter().map(|a| a.value).sum();
        let slices = assets
            .iter()
            .map(|a| AssetSlice {
                name: a.name.clone(),
                value: a.value,
                share: if total.is_positive() {
                    a.value.as_f64() / total.as_f64() * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            total,
            slices,
            placeholder: false,
        }
    }
}

/// Whether the planned income is fully used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "amount")]
pub enum BalanceStatus {
    /// Income left unallocated
    Surplus(Money),
    /// Allocations exceed income by this much
    Deficit(Money),
    Balanced,
}

impl BalanceStatus {
    /// Classify planned income minus total allocated
    pub fn from_difference(difference: Money) -> Self {
        if difference.is_positive() {
            Self::Surplus(difference)
        } else if difference.is_negative() {
            Self::Deficit(difference.abs())
        } else {
            Self::Balanced
        }
    }
}

/// Headline numbers of the budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub planned_income: Money,
    pub total_allocated: Money,
    pub balance: BalanceStatus,
    pub savings_total: Money,
    pub expense_total: Money,
    pub assets_total: Money,
}

/// Everything a renderer needs after a mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visualization {
    pub flow_graph: FlowGraph,
    /// Over-allocated labels, `"Overall budget"` first when present
    pub warnings: Vec<String>,
    pub category_totals: CategoryTotals,
    pub expense_coverage: ExpenseCoverage,
    pub asset_breakdown: AssetBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<SavingsProjection>,
    pub summary: BudgetSummary,
}

impl Visualization {
    /// Build the payload; a projection is attached only for `projection_months > 0`
    pub fn build(engine: &MetricsEngine<'_>, assets: &[Asset], projection_months: u32) -> Self {
        let planned_income = engine.planned_income();
        let category_totals = engine.category_totals();
        let asset_breakdown = AssetBreakdown::new(assets);

        let summary = BudgetSummary {
            planned_income,
            total_allocated: engine.total_allocated(),
            balance: BalanceStatus::from_difference(engine.surplus()),
            savings_total: category_totals.savings(),
            expense_total: category_totals.expenses(),
            assets_total: asset_breakdown.total,
        };

        let projection = if projection_months > 0 {
            engine.project_savings(projection_months)
        } else {
            None
        };

        trace!(projection_months, "built visualization");
        Self {
            flow_graph: engine.flow_graph(),
            warnings: engine.check_over_allocations(),
            expense_coverage: ExpenseCoverage::new(category_totals.expenses(), planned_income),
            category_totals,
            asset_breakdown,
            projection,
            summary,
        }
    }

    /// Single-line warning, e.g. `Over-allocation detected in: Overall budget, Bills`
    pub fn warning_message(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(format!("Over-allocation detected in: {}", self.warnings.join(", ")))
        }
    }
}
