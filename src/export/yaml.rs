//! YAML Export functionality
//!
//! Writes the same envelope as the JSON export, for human reading.

use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::export::json::VisualizationExport;
use crate::metrics::Visualization;

/// Export the payload as YAML with a short header comment
pub fn export_yaml<W: Write>(visualization: &Visualization, writer: &mut W) -> CashflowResult<()> {
    let export = VisualizationExport::new(visualization);
    let to_export_err = |e: std::io::Error| CashflowError::Export(e.to_string());

    writeln!(writer, "# Cashflow Visualization Export").map_err(to_export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(to_export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(to_export_err)?;
    writeln!(writer, "# Amounts are in cents.").map_err(to_export_err)?;
    writeln!(writer).map_err(to_export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| CashflowError::Export(e.to_string()))?;

    Ok(())
}
