//! Template loading and rendering of generated tables
//!
//! Templates are plain text with `{{token}}` placeholders. Substitution is a
//! literal replacement, one token at a time; all repetition happens here.

use crate::error::{Error, Result};
use crate::escape::escape_quotes;
use crate::group::group_by_ecu;
use crate::model::{Dtc, Ecu, ParsedExport};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Default file extension of the template files
pub const TEMPLATE_EXTENSION: &str = "mustache";

/// A single text template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Create a template from its text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load a template from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::TemplateRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(text))
    }

    /// Replace each `{{token}}` with its value, in the order given
    pub fn fill(&self, fields: &[(&str, &str)]) -> String {
        fields.iter().fold(self.text.clone(), |out, (token, value)| {
            out.replace(&format!("{{{{{token}}}}}"), value)
        })
    }
}

/// The five templates making up a generated file
#[derive(Debug, Clone)]
pub struct Templates {
    /// One code entry (`{{ecu}}`, `{{code}}`, `{{prefix}}`, `{{suffix}}`, `{{description}}`)
    pub dtc: Template,
    /// Table of one ECU's codes (`{{dtc_list}}`, `{{dtc_list_name}}`)
    pub dtc_list: Template,
    /// ECU to table mapping entry (`{{ecu}}`, `{{dtc_table}}`)
    pub ecu: Template,
    /// File header (`{{name}}`)
    pub prefix: Template,
    /// File footer (`{{name}}`, `{{ecu_list}}`)
    pub suffix: Template,
}

impl Templates {
    /// Load `dtc`, `dtc_list`, `ecu`, `prefix` and `suffix` `.mustache` files from a directory
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load_with_extension(dir, TEMPLATE_EXTENSION)
    }

    /// Load the templates using a custom file extension
    pub fn load_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let load = |name: &str| Template::load(dir.join(name).with_extension(extension));

        Ok(Self {
            dtc: load("dtc")?,
            dtc_list: load("dtc_list")?,
            ecu: load("ecu")?,
            prefix: load("prefix")?,
            suffix: load("suffix")?,
        })
    }
}

/// Rendering switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit the `ecu_list` descriptor array between the tables and the footer
    pub ecu_table: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { ecu_table: true }
    }
}

/// Render a parsed export into the generated source text.
///
/// Output order: header, one table per ECU, the ECU descriptor array (if
/// enabled), footer. Every fragment ends with a newline.
pub fn render(
    export: &ParsedExport,
    templates: &Templates,
    name: &str,
    options: &RenderOptions,
) -> String {
    let name = name.to_uppercase();
    let mut out = String::new();

    push_line(&mut out, &templates.prefix.fill(&[("name", name.as_str())]));

    let groups = group_by_ecu(&export.dtcs);
    let mut ecu_entries = Vec::with_capacity(groups.len());

    for group in &groups {
        let list_name = group.list_name();
        ecu_entries.push(
            templates
                .ecu
                .fill(&[("ecu", group.ecu), ("dtc_table", list_name.as_str())]),
        );

        let entries: Vec<String> = group
            .dtcs
            .iter()
            .map(|dtc| render_dtc(&templates.dtc, dtc))
            .collect();
        let dtc_list = entries.join("\n");
        push_line(
            &mut out,
            &templates.dtc_list.fill(&[
                ("dtc_list", dtc_list.as_str()),
                ("dtc_list_name", list_name.as_str()),
            ]),
        );
    }

    if options.ecu_table {
        out.push_str(&render_ecu_table(&export.ecus));
    }

    let ecu_list = ecu_entries.join("\n");
    push_line(
        &mut out,
        &templates
            .suffix
            .fill(&[("name", name.as_str()), ("ecu_list", ecu_list.as_str())]),
    );

    out
}

/// Render one code entry
pub fn render_dtc(template: &Template, dtc: &Dtc) -> String {
    template.fill(&[
        ("ecu", dtc.ecu.as_str()),
        ("code", dtc.code.as_str()),
        ("prefix", dtc.prefix.as_str()),
        ("suffix", dtc.suffix.as_str()),
        ("description", dtc.description.as_str()),
    ])
}

/// Render the static array of ECU descriptors
pub fn render_ecu_table(ecus: &[Ecu]) -> String {
    let mut out = String::from("static struct ecu_info ecu_list[] = {\n");
    for ecu in ecus {
        let _ = writeln!(
            out,
            "    {{ .addr = 0x{}, .desc = \"{}\", .dtc_prefix = \"{}\" }},",
            ecu.address,
            escape_quotes(&ecu.description),
            escape_quotes(&ecu.prefix)
        );
    }
    out.push_str("};\n");
    out
}

fn push_line(out: &mut String, fragment: &str) {
    out.push_str(fragment);
    out.push('\n');
}
