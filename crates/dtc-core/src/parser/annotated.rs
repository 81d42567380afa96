//! Parser for annotated DTC exports
//!
//! The export is a sequence of ECU sections:
//!
//! ```text
//! 29 - Engine Control Module
//! if (dtc.contains("0301")) // P-0301 (a)
//! if (dtc.contains("54") || dtc.contains("55")) // EFI-445
//! <string name="P0301a">Misfire cylinder 1</string>
//! ```
//!
//! Lines are matched in order against the current ECU section. Descriptions are
//! resolved against the collected string tables once the whole file is scanned.

use crate::model::{Dtc, Ecu, ParsedExport, StringTable, UNKNOWN_PREFIX};
use crate::resolver::resolve_descriptions;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ECU_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9A-F]{2}) - (.+)").expect("Invalid ECU header pattern"));

static SINGLE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^if \(dtc\.contains\("([0-9A-F]+)"\)\) ?// ?([^-]+)-?([0-9]+) ?\(?([a-z])?\)?"#)
        .expect("Invalid single-code pattern")
});

static DUAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^if \(dtc\.contains\("([0-9A-F]+)"\) ?\|\| ?dtc\.contains\("([0-9A-F]+)"\)\) ?// ?([^-]+)-?([0-9]+) ?\(?([a-z])?\)?"#,
    )
    .expect("Invalid dual-code pattern")
});

static STRING_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<string name="([0-9A-Za-z_]+)">(.+)</string>"#)
        .expect("Invalid string entry pattern")
});

/// Raw scan result, before descriptions are resolved
#[derive(Debug, Clone, Default)]
pub struct AnnotatedScan {
    /// Trouble codes; each description still holds its lookup key
    pub dtcs: Vec<Dtc>,
    /// ECU sections in file order
    pub ecus: Vec<Ecu>,
    /// Strings keyed by the address of the section they appeared in
    pub strings: StringTable,
    /// Index into `ecus` of the section being scanned
    current: Option<usize>,
}

impl AnnotatedScan {
    /// Create an empty scan
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of the export into the scan
    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim();

        if let Some(caps) = ECU_HEADER.captures(line) {
            self.ecus.push(Ecu::new(&caps[1], &caps[2], UNKNOWN_PREFIX));
            self.current = Some(self.ecus.len() - 1);
        } else if let Some(caps) = SINGLE_CODE.captures(line) {
            let Some(index) = self.current else {
                log::debug!("Skipping code outside of an ECU section: {}", line);
                return;
            };
            let (prefix, suffix) = prefix_and_suffix(&caps, 2);
            let ecu = &mut self.ecus[index];
            self.dtcs.push(keyed_dtc(&ecu.address, &caps[1], &prefix, &suffix));
            ecu.prefix = prefix;
        } else if let Some(caps) = DUAL_CODE.captures(line) {
            // Dual-code lines leave the ECU prefix alone.
            let Some(index) = self.current else {
                log::debug!("Skipping codes outside of an ECU section: {}", line);
                return;
            };
            let (prefix, suffix) = prefix_and_suffix(&caps, 3);
            let address = &self.ecus[index].address;
            self.dtcs.push(keyed_dtc(address, &caps[1], &prefix, &suffix));
            self.dtcs.push(keyed_dtc(address, &caps[2], &prefix, &suffix));
        } else if let Some(caps) = STRING_ENTRY.captures(line) {
            let Some(index) = self.current else {
                log::debug!("Skipping string outside of an ECU section: {}", line);
                return;
            };
            self.strings
                .insert(self.ecus[index].address.as_str(), &caps[1], &caps[2]);
        }
    }

    /// Resolve descriptions and hand the records over
    pub fn into_export(self) -> ParsedExport {
        let AnnotatedScan {
            mut dtcs,
            ecus,
            strings,
            ..
        } = self;

        let warnings = resolve_descriptions(&mut dtcs, &strings);
        log::debug!(
            "Resolved {} codes across {} ECUs ({} strings, {} unresolved)",
            dtcs.len(),
            ecus.len(),
            strings.len(),
            warnings.len()
        );

        ParsedExport {
            dtcs,
            ecus,
            warnings,
        }
    }
}

/// Scan an annotated export without resolving descriptions
pub fn scan(content: &str) -> AnnotatedScan {
    let mut scan = AnnotatedScan::new();
    for line in content.lines() {
        scan.feed_line(line);
    }
    scan
}

/// Parse an annotated export and resolve all descriptions
pub fn parse(content: &str) -> ParsedExport {
    scan(content).into_export()
}

/// Extract (prefix, suffix) from the comment part of a predicate line.
///
/// `first` is the capture group holding the prefix text; the digits and the
/// optional letter follow it.
fn prefix_and_suffix(caps: &Captures<'_>, first: usize) -> (String, String) {
    let prefix = caps[first].trim().to_string();
    let mut suffix = caps[first + 1].to_string();
    if let Some(letter) = caps.get(first + 2) {
        suffix.push_str(letter.as_str());
    }
    (prefix, suffix)
}

fn keyed_dtc(ecu: &str, code: &str, prefix: &str, suffix: &str) -> Dtc {
    Dtc::new(ecu, code, prefix, suffix, format!("{prefix}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolveWarning;

    #[test]
    fn test_single_code_with_letter() {
        let export = parse("29 - Engine Control Module\nif (dtc.contains(\"0301\")) // P-0301 (a)\n");

        assert_eq!(export.dtcs.len(), 1);
        let dtc = &export.dtcs[0];
        assert_eq!(dtc.ecu, "29");
        assert_eq!(dtc.code, "0301");
        assert_eq!(dtc.prefix, "P");
        assert_eq!(dtc.suffix, "0301a");
        assert_eq!(dtc.description, "P0301a");
        assert_eq!(
            export.warnings,
            vec![ResolveWarning::NoEcu { ecu: "29".to_string() }]
        );
    }

    #[test]
    fn test_ecu_header_fields() {
        let scan = scan("  29 - Engine Control Module  \n");

        assert_eq!(scan.ecus, vec![Ecu::new("29", "Engine Control Module", "unknown")]);
        assert!(scan.dtcs.is_empty());
    }

    #[test]
    fn test_single_code_updates_ecu_prefix() {
        let scan = scan(
            "7A - Motronic M4.4\n\
             if (dtc.contains(\"54\")) // EFI-445\n\
             if (dtc.contains(\"55\")) //ECM-446\n",
        );

        assert_eq!(scan.dtcs[0].prefix, "EFI");
        assert_eq!(scan.dtcs[0].suffix, "445");
        assert_eq!(scan.dtcs[1].prefix, "ECM");
        assert_eq!(scan.ecus[0].prefix, "ECM");
    }

    #[test]
    fn test_prefix_is_trimmed() {
        let scan = scan("58 - Airbags\nif (dtc.contains(\"88\")) // SRS -210\n");

        assert_eq!(scan.dtcs[0].prefix, "SRS");
        assert_eq!(scan.dtcs[0].description, "SRS210");
    }

    #[test]
    fn test_dual_code_produces_two_records() {
        let scan = scan(
            "6E - AW50-42 transmission\n\
             if (dtc.contains(\"02\") || dtc.contains(\"03\")) // AT-122 (b)\n",
        );

        assert_eq!(scan.dtcs.len(), 2);
        assert_eq!(scan.dtcs[0].code, "02");
        assert_eq!(scan.dtcs[1].code, "03");
        for dtc in &scan.dtcs {
            assert_eq!(dtc.ecu, "6E");
            assert_eq!(dtc.prefix, "AT");
            assert_eq!(dtc.suffix, "122b");
            assert_eq!(dtc.description, "AT122b");
        }
    }

    #[test]
    fn test_dual_code_leaves_ecu_prefix() {
        let scan = scan(
            "6E - AW50-42 transmission\n\
             if (dtc.contains(\"02\") || dtc.contains(\"03\")) // AT-122\n",
        );

        assert_eq!(scan.ecus[0].prefix, "unknown");
    }

    #[test]
    fn test_dtcs_bound_to_latest_header() {
        let scan = scan(
            "01 - ABS\n\
             if (dtc.contains(\"10\")) // ABS-311\n\
             11 - MSA 15.7\n\
             if (dtc.contains(\"00\")) // EFI-131\n\
             if (dtc.contains(\"01\") || dtc.contains(\"02\")) // EFI-719\n",
        );

        let ecus: Vec<&str> = scan.dtcs.iter().map(|d| d.ecu.as_str()).collect();
        assert_eq!(ecus, vec!["01", "11", "11", "11"]);
    }

    #[test]
    fn test_strings_stored_under_literal_address() {
        let scan = scan(
            "2E - Left power seat\n\
             <string name=\"PSL111\">Seat motor</string>\n\
             2F - Right power seat\n\
             <string name=\"PSR111\">Other motor</string>\n",
        );

        assert!(scan.strings.for_ecu("2E").is_some());
        assert_eq!(
            scan.strings.for_ecu("2F").and_then(|m| m.get("PSR111")),
            Some(&"Other motor".to_string())
        );
    }

    #[test]
    fn test_2e_resolves_through_2f_strings() {
        let export = parse(
            "2F - Right power seat\n\
             <string name=\"PSL111\">Seat motor \"left\"</string>\n\
             2E - Left power seat\n\
             <string name=\"PSL111\">shadowed</string>\n\
             if (dtc.contains(\"11\")) // PSL-111\n",
        );

        assert_eq!(export.dtcs[0].ecu, "2E");
        assert_eq!(export.dtcs[0].description, r#"Seat motor \"left\""#);
        assert!(export.warnings.is_empty());
    }

    #[test]
    fn test_fallback_keys_resolved() {
        let export = parse(
            "7A - Motronic M4.4\n\
             if (dtc.contains(\"54\")) // EFI-445\n\
             if (dtc.contains(\"56\")) // EFI-446\n\
             if (dtc.contains(\"57\")) // EFI-447\n\
             <string name=\"EFI445_7A\">Secondary air pump</string>\n\
             <string name=\"V_EFI446\">EMS string</string>\n",
        );

        assert_eq!(export.dtcs[0].description, "Secondary air pump");
        assert_eq!(export.dtcs[1].description, "EMS string");
        assert_eq!(export.dtcs[2].description, "EFI447");
        assert_eq!(export.warnings.len(), 1);
        assert_eq!(export.warnings[0].to_string(), "no description found for EFI447");
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        let scan = scan(
            "// generated file\n\
             \n\
             29 - Climate\n\
             } else {\n\
             if (dtc.startsWith(\"1\")) // ECC-111\n\
             <string name=\"bad key!\">x</string>\n",
        );

        assert_eq!(scan.ecus.len(), 1);
        assert!(scan.dtcs.is_empty());
        assert!(scan.strings.is_empty());
    }

    #[test]
    fn test_lines_before_first_header_skipped() {
        let scan = scan(
            "if (dtc.contains(\"10\")) // ABS-311\n\
             <string name=\"ABS311\">Wheel sensor</string>\n\
             01 - ABS\n",
        );

        assert!(scan.dtcs.is_empty());
        assert!(scan.strings.is_empty());
        assert_eq!(scan.ecus.len(), 1);
    }
}
