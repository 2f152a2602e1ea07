//! Allocation tree and asset display formatting

use crate::models::{Asset, Money, NodeId};
use crate::services::AllocationTree;

use super::report::format_money_whole;

/// Format the allocation tree, siblings in traversal order
///
/// ```text
/// Income ($5,000 planned, $2,000 allocated)
/// ├── Save $500 [savings, 3% APR, balance $1,000]
/// └── Rent $1,500 [expense]
/// ```
pub fn format_node_tree(tree: &AllocationTree, planned_income: Money, symbol: &str) -> String {
    let mut output = format!(
        "Income ({} planned, {} allocated)\n",
        format_money_whole(planned_income, symbol),
        format_money_whole(tree.total_allocated(), symbol)
    );

    let children: Vec<NodeId> = tree.ordered_edges(tree.root()).iter().map(|e| e.child).collect();
    for (i, child) in children.iter().enumerate() {
        write_subtree(tree, *child, "", i == children.len() - 1, symbol, &mut output);
    }

    output
}

fn write_subtree(
    tree: &AllocationTree,
    id: NodeId,
    prefix: &str,
    is_last: bool,
    symbol: &str,
    output: &mut String,
) {
    let Some(node) = tree.node(id) else { return };
    let branch = if is_last { "└── " } else { "├── " };
    let amount = tree.inflow(id).unwrap_or_default();

    let details = match node.savings {
        Some(props) if node.group.is_savings() => format!(
            "{}, {}% APR, balance {}",
            node.group,
            props.apr,
            format_money_whole(props.current_balance, symbol)
        ),
        _ => node.group.to_string(),
    };

    output.push_str(&format!(
        "{}{}{} {} [{}]\n",
        prefix,
        branch,
        node.label,
        format_money_whole(amount, symbol),
        details
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    let children: Vec<NodeId> = tree.ordered_edges(id).iter().map(|e| e.child).collect();
    for (i, child) in children.iter().enumerate() {
        write_subtree(tree, *child, &child_prefix, i == children.len() - 1, symbol, output);
    }
}

/// Format node labels one per line
pub fn format_label_list(labels: &[String]) -> String {
    let mut output = String::from("Cashflow Nodes:\n");
    for label in labels {
        output.push_str(&format!("  {}\n", label));
    }
    output
}

/// Format standalone assets, e.g. `House: $300,000`
pub fn format_asset_list(assets: &[Asset], symbol: &str) -> String {
    if assets.is_empty() {
        return "No standalone assets.\n".to_string();
    }

    let mut output = String::from("Standalone Assets:\n");
    for asset in assets {
        output.push_str(&format!(
            "  {}: {}\n",
            asset.name,
            format_money_whole(asset.value, symbol)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeGroup;

    #[test]
    fn test_format_node_tree() {
        let mut tree = AllocationTree::new();
        tree.add_node("Income", "Rent", Money::from_dollars(1500), NodeGroup::Expense, 0.0, Money::zero())
            .unwrap();
        tree.add_node("Income", "Bills", Money::from_dollars(150), NodeGroup::Intermediate, 0.0, Money::zero())
            .unwrap();
        tree.add_node("Bills", "Power", Money::from_dollars(100), NodeGroup::Expense, 0.0, Money::zero())
            .unwrap();
        tree.add_node("Income", "Save", Money::from_dollars(500), NodeGroup::Savings, 3.0, Money::from_dollars(1000))
            .unwrap();

        let text = format_node_tree(&tree, Money::from_dollars(5000), "$");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Income ($5,000 planned, $2,150 allocated)");
        assert_eq!(lines[1], "├── Save $500 [savings, 3% APR, balance $1,000]");
        assert_eq!(lines[2], "├── Bills $150 [intermediate]");
        assert_eq!(lines[3], "│   └── Power $100 [expense]");
        assert_eq!(lines[4], "└── Rent $1,500 [expense]");
    }

    #[test]
    fn test_format_asset_list() {
        assert_eq!(format_asset_list(&[], "$"), "No standalone assets.\n");
        let assets = vec![Asset::new("House", Money::from_dollars(300_000))];
        assert_eq!(
            format_asset_list(&assets, "$"),
            "Standalone Assets:\n  House: $300,000\n"
        );
    }
}
