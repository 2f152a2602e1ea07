//! Savings growth projection
//!
//! Every savings leaf grows month by month from its current balance:
//!
//! ```text
//! b[0] = current_balance
//! b[t] = round_cents(b[t-1] * (1 + apr / 1200) + contribution)
//! ```
//!
//! The contribution is the fixed inflow on the leaf's parent edge. Each
//! month's balance is rounded to the cent before the next month compounds
//! on it, so results are reproducible to the cent.

use serde::Serialize;

use tracing::trace;

use super::MetricsEngine;
use crate::models::Money;

/// Projected balances of one savings leaf
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSeries {
    pub label: String,
    pub apr: f64,
    pub monthly_contribution: Money,
    /// `months + 1` points, starting with the current balance
    pub balances: Vec<Money>,
}

/// Projection of all savings leaves plus their total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProjection {
    pub months: u32,
    pub series: Vec<ProjectionSeries>,
    /// Element-wise sum of all series
    pub total: Vec<Money>,
}

impl SavingsProjection {
    /// Month numbers on the x axis, `0..=months`
    pub fn time_points(&self) -> impl Iterator<Item = u32> {
        0..=self.months
    }
}

impl<'a> MetricsEngine<'a> {
    /// Project the balance of every savings leaf over `months` months
    ///
    /// Returns `None` when no leaf in the savings group exists. With
    /// `months == 0` each series holds just the current balance.
    pub fn project_savings(&self, months: u32) -> Option<SavingsProjection> {
        let tree = self.tree();
        let points = months as usize + 1;

        let series: Vec<ProjectionSeries> = tree
            .collect_nodes()
            .into_iter()
            .filter_map(|id| {
                let node = tree.node(id)?;
                if !node.is_leaf() || !node.group.is_savings() {
                    return None;
                }
                let contribution = tree.inflow(id)?;
                let props = node.savings_or_default();
                let factor = props.monthly_factor();

                let mut balances = Vec::with_capacity(points);
                let mut balance = props.current_balance;
                balances.push(balance);
                for _ in 0..months {
                    balance = balance.grow(factor) + contribution;
                    balances.push(balance);
                }

                Some(ProjectionSeries {
                    label: node.label.clone(),
                    apr: props.apr,
                    monthly_contribution: contribution,
                    balances,
                })
            })
            .collect();

        if series.is_empty() {
            return None;
        }

        let mut total = vec![Money::zero(); points];
        for s in &series {
            for (sum, balance) in total.iter_mut().zip(&s.balances) {
                *sum += *balance;
            }
        }

        trace!(months, series = series.len(), "projected savings");
        Some(SavingsProjection {
            months,
            series,
            total,
        })
    }
}
