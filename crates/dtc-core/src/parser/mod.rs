//! Parsers for vendor DTC export files
//!
//! Two layouts are supported:
//! - [`annotated`]: ECU sections with `dtc.contains(...)` predicate lines and
//!   `<string name="...">` tables (exported from the 850 OBD-II app)
//! - [`delimited`]: one space-separated DTC record per line

pub mod annotated;
pub mod delimited;

use crate::error::{Error, Result};
use crate::model::ParsedExport;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Layout of an export file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Annotated export with string tables ("annotated", or "aleksi")
    Annotated,
    /// Space-delimited export ("delimited", or "richard")
    Delimited,
}

impl ExportFormat {
    /// Canonical selector token
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Annotated => "annotated",
            ExportFormat::Delimited => "delimited",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annotated" | "aleksi" => Ok(ExportFormat::Annotated),
            "delimited" | "richard" => Ok(ExportFormat::Delimited),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an export file in the given format
pub fn parse_export<P: AsRef<Path>>(path: P, format: ExportFormat) -> Result<ParsedExport> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Parsing {} as {} export", path.display(), format);
    Ok(parse_export_str(&content, format))
}

/// Parse export content from a string
pub fn parse_export_str(content: &str, format: ExportFormat) -> ParsedExport {
    match format {
        ExportFormat::Annotated => annotated::parse(content),
        ExportFormat::Delimited => delimited::parse(content),
    }
}
