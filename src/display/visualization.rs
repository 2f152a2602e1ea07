//! Visualization display formatting
//!
//! Text rendering of the visualization payload for the session shell: the
//! summary block, the flow table, the expense gauge, the asset breakdown and
//! the projection table.

use crate::metrics::visualization::NO_ASSETS_LABEL;
use crate::metrics::{BalanceStatus, CoverageBand, FlowGraph, SavingsProjection, Visualization};

use super::report::{format_bar, format_money_whole, format_percentage, separator, truncate};

const LABEL_WIDTH: usize = 24;
const GAUGE_WIDTH: usize = 26;

/// Format the headline figures
pub fn format_summary(viz: &Visualization, symbol: &str) -> String {
    let summary = &viz.summary;
    let balance = match summary.balance {
        BalanceStatus::Surplus(amount) => {
            format!("Surplus:              {}", format_money_whole(amount, symbol))
        }
        BalanceStatus::Deficit(amount) => {
            format!("Deficit:              {}", format_money_whole(amount, symbol))
        }
        BalanceStatus::Balanced => "Balanced:             fully allocated".to_string(),
    };

    let mut output = String::from("Budget Summary\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!(
        "Planned Income:       {}\n",
        format_money_whole(summary.planned_income, symbol)
    ));
    output.push_str(&format!(
        "Total Allocated:      {}\n",
        format_money_whole(summary.total_allocated, symbol)
    ));
    output.push_str(&balance);
    output.push('\n');
    output.push_str(&format!(
        "Savings/Investments:  {}\n",
        format_money_whole(summary.savings_total, symbol)
    ));
    output.push_str(&format!(
        "Expenses:             {}\n",
        format_money_whole(summary.expense_total, symbol)
    ));
    output.push_str(&format!(
        "Standalone Assets:    {}\n",
        format_money_whole(summary.assets_total, symbol)
    ));
    output
}

/// Format the flow links as a table, over-allocated targets marked with `!`
pub fn format_flow_table(graph: &FlowGraph, symbol: &str) -> String {
    if graph.links.is_empty() {
        return "No allocations yet.\n".to_string();
    }

    let mut output = format!(
        "{:<w$}  {:<w$}  {:>12}  {}\n",
        "Source",
        "Target",
        "Amount",
        "Group",
        w = LABEL_WIDTH
    );
    output.push_str(&separator(LABEL_WIDTH * 2 + 30));
    output.push('\n');

    for link in &graph.links {
        let (Some(source), Some(target)) = (graph.nodes.get(link.source), graph.nodes.get(link.target))
        else {
            continue;
        };
        let marker = if target.over_allocated { " !" } else { "" };
        output.push_str(&format!(
            "{:<w$}  {:<w$}  {:>12}  {}{}\n",
            truncate(&source.label, LABEL_WIDTH),
            truncate(&target.label, LABEL_WIDTH),
            format_money_whole(link.amount, symbol),
            target.group,
            marker,
            w = LABEL_WIDTH
        ));
    }

    output
}

/// Format the expense gauge, e.g. `Expenses 30% of income [████░░░] ok`
pub fn format_expense_gauge(viz: &Visualization) -> String {
    let coverage = &viz.expense_coverage;
    let band = match coverage.band {
        CoverageBand::Ok => "ok",
        CoverageBand::Caution => "caution",
        CoverageBand::Over => "over budget",
    };
    format!(
        "Expenses {} of income [{}] {}\n",
        format_percentage(coverage.percent),
        format_bar(coverage.percent, coverage.axis_max, GAUGE_WIDTH),
        band
    )
}

/// Format the asset breakdown with each slice's share
pub fn format_asset_breakdown(viz: &Visualization, symbol: &str) -> String {
    let breakdown = &viz.asset_breakdown;
    if breakdown.placeholder {
        return format!("Assets: {}\n", NO_ASSETS_LABEL);
    }

    let mut output = format!("Assets ({} total)\n", format_money_whole(breakdown.total, symbol));
    for slice in &breakdown.slices {
        output.push_str(&format!(
            "  {:<w$} {:>12}  {}\n",
            truncate(&slice.name, LABEL_WIDTH),
            format_money_whole(slice.value, symbol),
            format_percentage(slice.share),
            w = LABEL_WIDTH
        ));
    }
    output
}

/// Format the projection as a table; long horizons show yearly rows plus the last month
pub fn format_projection_table(projection: &SavingsProjection, symbol: &str) -> String {
    let step = if projection.months <= 12 { 1 } else { 12 };

    let mut output = format!("Savings Projection ({} months)\n", projection.months);
    output.push_str(&format!("{:>6}", "Month"));
    for series in &projection.series {
        output.push_str(&format!("  {:>14}", truncate(&series.label, 14)));
    }
    output.push_str(&format!("  {:>14}\n", "Total"));

    for month in projection
        .time_points()
        .filter(|m| m % step == 0 || *m == projection.months)
    {
        let t = month as usize;
        output.push_str(&format!("{:>6}", month));
        for series in &projection.series {
            let balance = series.balances.get(t).copied().unwrap_or_default();
            output.push_str(&format!("  {:>14}", format_money_whole(balance, symbol)));
        }
        let total = projection.total.get(t).copied().unwrap_or_default();
        output.push_str(&format!("  {:>14}\n", format_money_whole(total, symbol)));
    }

    output
}

/// Format the full payload the way the `show` command prints it
pub fn format_visualization(viz: &Visualization, symbol: &str) -> String {
    let mut output = format_summary(viz, symbol);
    output.push('\n');
    output.push_str(&format_flow_table(&viz.flow_graph, symbol));
    output.push('\n');
    output.push_str(&format_expense_gauge(viz));
    output.push_str(&format_asset_breakdown(viz, symbol));

    if let Some(projection) = &viz.projection {
        output.push('\n');
        output.push_str(&format_projection_table(projection, symbol));
    }

    if let Some(message) = viz.warning_message() {
        output.push('\n');
        output.push_str(&format!("Warning: {}\n", message));
    }

    output
}
