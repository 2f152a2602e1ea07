//! CSV Export functionality
//!
//! Two flat views of the payload: the flow links of the diagram, and the
//! month-by-month savings projection. Amounts are written in currency units
//! with two decimals.

use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::metrics::{FlowGraph, SavingsProjection};
use crate::models::Money;

fn amount(m: Money) -> String {
    format!("{:.2}", m.as_f64())
}

fn to_export_err(e: impl std::fmt::Display) -> CashflowError {
    CashflowError::Export(e.to_string())
}

/// Export flow links as `Source,Target,Amount,Target Group`
pub fn export_flow_csv<W: Write>(graph: &FlowGraph, writer: W) -> CashflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Source", "Target", "Amount", "Target Group"])
        .map_err(to_export_err)?;

    for link in &graph.links {
        let (Some(source), Some(target)) = (graph.nodes.get(link.source), graph.nodes.get(link.target))
        else {
            continue;
        };
        csv.write_record([
            source.label.as_str(),
            target.label.as_str(),
            amount(link.amount).as_str(),
            target.group.as_str(),
        ])
        .map_err(to_export_err)?;
    }

    csv.flush().map_err(to_export_err)?;
    Ok(())
}

/// Export a projection as `Month,<series...>,Total`
pub fn export_projection_csv<W: Write>(
    projection: &SavingsProjection,
    writer: W,
) -> CashflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Month".to_string()];
    header.extend(projection.series.iter().map(|s| s.label.clone()));
    header.push("Total".to_string());
    csv.write_record(&header).map_err(to_export_err)?;

    for month in projection.time_points() {
        let t = month as usize;
        let mut row = vec![month.to_string()];
        row.extend(
            projection
                .series
                .iter()
                .map(|s| s.balances.get(t).copied().map(amount).unwrap_or_default()),
        );
        row.push(projection.total.get(t).copied().map(amount).unwrap_or_default());
        csv.write_record(&row).map_err(to_export_err)?;
    }

    csv.flush().map_err(to_export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsEngine;
    use crate::models::NodeGroup;
    use crate::services::AllocationTree;

    fn tree() -> AllocationTree {
        let mut tree = AllocationTree::new();
        tree.add_node(
            "Income",
            "Rent, Flat 2",
            Money::from_dollars(1500),
            NodeGroup::Expense,
            0.0,
            Money::zero(),
        )
        .unwrap();
        tree.add_node(
            "Income",
            "Save",
            Money::from_dollars(100),
            NodeGroup::Savings,
            0.0,
            Money::from_dollars(50),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_export_flow_csv() {
        let tree = tree();
        let graph = MetricsEngine::new(&tree, Money::from_dollars(2000)).flow_graph();

        let mut buffer = Vec::new();
        export_flow_csv(&graph, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Source,Target,Amount,Target Group");
        assert_eq!(lines[1], "Income,\"Rent, Flat 2\",1500.00,expense");
        assert_eq!(lines[2], "Income,Save,100.00,savings");
        assert_eq!(lines[3], "Income,Unallocated Surplus,400.00,unallocated");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_projection_csv() {
        let tree = tree();
        let projection = MetricsEngine::new(&tree, Money::from_dollars(2000))
            .project_savings(2)
            .unwrap();

        let mut buffer = Vec::new();
        export_projection_csv(&projection, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month,Save,Total");
        assert_eq!(lines[1], "0,50.00,50.00");
        assert_eq!(lines[3], "2,250.00,250.00");
    }
}
