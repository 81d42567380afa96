//! Core record types shared by the parsers and the renderer

use crate::resolver::ResolveWarning;
use std::collections::HashMap;

/// Prefix given to an annotated-export ECU before any of its codes is seen
pub const UNKNOWN_PREFIX: &str = "unknown";

/// A single diagnostic trouble code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dtc {
    /// Address of the owning ECU, as written in the export
    pub ecu: String,
    /// Raw code identifier (hex digits)
    pub code: String,
    /// Code family tag (e.g., "P" or "EFI")
    pub prefix: String,
    /// Digits plus an optional trailing lowercase letter
    pub suffix: String,
    /// Description text; holds the lookup key until resolved
    pub description: String,
}

impl Dtc {
    /// Create a new DTC
    pub fn new(
        ecu: impl Into<String>,
        code: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            ecu: ecu.into(),
            code: code.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            description: description.into(),
        }
    }

    /// Key used to find the description in the owning ECU's string table
    pub fn lookup_key(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }
}

/// An electronic control unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ecu {
    /// Address as written in the export (e.g., "29" or "01")
    pub address: String,
    /// Human-readable name
    pub description: String,
    /// DTC prefix used by this ECU
    pub prefix: String,
}

impl Ecu {
    /// Create a new ECU
    pub fn new(
        address: impl Into<String>,
        description: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            description: description.into(),
            prefix: prefix.into(),
        }
    }
}

/// Localized strings per ECU address, collected while scanning an annotated export
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: HashMap<String, HashMap<String, String>>,
}

impl StringTable {
    /// Create an empty string table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a string under the given ECU address, replacing any earlier value for the key
    pub fn insert(
        &mut self,
        ecu: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .entry(ecu.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Get the strings stored under an ECU address
    pub fn for_ecu(&self, ecu: &str) -> Option<&HashMap<String, String>> {
        self.entries.get(ecu)
    }

    /// Number of ECU addresses with at least one string
    pub fn ecu_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of stored strings
    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }

    /// Check if no strings were stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a parser hands over to grouping and rendering
#[derive(Debug, Clone, Default)]
pub struct ParsedExport {
    /// Trouble codes in source order
    pub dtcs: Vec<Dtc>,
    /// ECUs in source order
    pub ecus: Vec<Ecu>,
    /// Descriptions that could not be resolved
    pub warnings: Vec<ResolveWarning>,
}

impl ParsedExport {
    /// Get the number of trouble codes
    pub fn dtc_count(&self) -> usize {
        self.dtcs.len()
    }

    /// Get the number of ECUs
    pub fn ecu_count(&self) -> usize {
        self.ecus.len()
    }

    /// Find the first ECU with the given address
    pub fn find_ecu(&self, address: &str) -> Option<&Ecu> {
        self.ecus.iter().find(|e| e.address == address)
    }
}
