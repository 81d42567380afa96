//! Parser for delimited DTC exports
//!
//! Each record is one line: `<ecu> <code> <PREFIX>-<digits> <description>`, e.g.
//! `01 10 ABS-311 Left Front Wheel Sensor, open/short.`

use crate::escape::escape_quotes;
use crate::model::{Dtc, Ecu, ParsedExport};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+) ([0-9A-F]+) ([A-Z]+)-([0-9]+) (.+)").expect("Invalid record pattern")
});

/// Parse a delimited export.
///
/// One ECU is synthesized per distinct address, kept at the position where the
/// address first appeared and carrying the prefix of its last record.
pub fn parse(content: &str) -> ParsedExport {
    let mut dtcs = Vec::new();
    let mut ecus: Vec<Ecu> = Vec::new();
    let mut ecu_index: HashMap<String, usize> = HashMap::new();

    for line in content.lines() {
        let Some(caps) = RECORD.captures(line.trim()) else {
            continue;
        };

        let (address, code, prefix, suffix) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        dtcs.push(Dtc::new(address, code, prefix, suffix, escape_quotes(&caps[5])));

        let ecu = Ecu::new(address, prefix, prefix);
        match ecu_index.get(address) {
            Some(&i) => ecus[i] = ecu,
            None => {
                ecu_index.insert(address.to_string(), ecus.len());
                ecus.push(ecu);
            }
        }
    }

    log::debug!("Parsed {} codes across {} ECUs", dtcs.len(), ecus.len());

    ParsedExport {
        dtcs,
        ecus,
        warnings: Vec::new(),
    }
}
