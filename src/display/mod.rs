//! Display formatting for terminal output
//!
//! Renders the allocation tree, asset lists and the visualization payload as
//! plain text for the session shell.

pub mod report;
pub mod tree;
pub mod visualization;

pub use report::format_money_whole;
pub use tree::{format_asset_list, format_label_list, format_node_tree};
pub use visualization::{format_summary, format_visualization};
