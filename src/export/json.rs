//! JSON Export functionality
//!
//! Wraps the visualization payload in a versioned envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::metrics::Visualization;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Versioned export of one visualization payload
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    pub visualization: &'a Visualization,
}

impl<'a> VisualizationExport<'a> {
    pub fn new(visualization: &'a Visualization) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            visualization,
        }
    }
}

/// Export the payload as pretty-printed JSON
pub fn export_json<W: Write>(visualization: &Visualization, writer: &mut W) -> CashflowResult<()> {
    let export = VisualizationExport::new(visualization);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| CashflowError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CashflowError::Export(e.to_string()))?;
    Ok(())
}
