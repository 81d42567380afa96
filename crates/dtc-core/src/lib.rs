//! dtc-core: Core library for generating DTC tables from vendor exports
//!
//! This library provides functionality to:
//! - Parse annotated and delimited DTC export files into a common record model
//! - Resolve descriptions from per-ECU string tables, including vendor quirks
//! - Escape description text for C string literals
//! - Group codes by ECU and render them through text templates

pub mod error;
pub mod escape;
pub mod group;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolver;

pub use error::{Error, Result};
pub use escape::{escape_annotated, escape_quotes};
pub use group::{group_by_ecu, EcuGroup};
pub use model::{Dtc, Ecu, ParsedExport, StringTable};
pub use parser::{parse_export, parse_export_str, ExportFormat};
pub use render::{render, RenderOptions, Template, Templates};
pub use resolver::{resolve, ResolveWarning};
