//! Output rendering: JSON array or per-record template.

use serde::Serialize;

use crate::error::{InspectError, Result};
use crate::record::InspectionRecord;
use crate::template::TemplateEngine;

/// Format string selecting the default JSON output.
pub const JSON_FORMAT: &str = "json";

/// Output mode chosen from the (normalized) format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Template(String),
}

impl OutputFormat {
    pub fn parse(format: &str) -> Self {
        if format.is_empty() || format == JSON_FORMAT {
            OutputFormat::Json
        } else {
            OutputFormat::Template(format.to_string())
        }
    }
}

/// Render records in batch order. The output always ends with a newline
/// unless there is nothing to render in template mode.
pub fn render(
    records: &[InspectionRecord],
    format: &OutputFormat,
    engine: &dyn TemplateEngine,
) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(records),
        OutputFormat::Template(template) => render_template(records, template, engine),
    }
}

fn render_json(records: &[InspectionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| InspectError::RenderFailed(e.to_string()))?;

    let mut out =
        String::from_utf8(buf).map_err(|e| InspectError::RenderFailed(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

fn render_template(
    records: &[InspectionRecord],
    template: &str,
    engine: &dyn TemplateEngine,
) -> Result<String> {
    engine
        .validate(template)
        .map_err(|e| InspectError::RenderFailed(e.to_string()))?;

    let mut out = String::new();
    for record in records {
        let line = engine
            .render(template, record.as_value())
            .map_err(|e| InspectError::RenderFailed(e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
