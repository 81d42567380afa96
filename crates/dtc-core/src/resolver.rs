//! Description lookup for annotated exports
//!
//! A DTC's description lives in the string table of its ECU under the key
//! `prefix + suffix`. Two vendor quirks apply:
//! - ECU `2E` answers with codes whose strings are filed under `2F`
//! - some variants store the key as `<key>_7A` (Motronic 4.4) or `V_<key>` (EMS)

use crate::escape::escape_annotated;
use crate::model::{Dtc, StringTable};
use thiserror::Error;

/// A description that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveWarning {
    /// No string table exists for the ECU (after aliasing)
    #[error("no ECU found for \"{ecu}\"")]
    NoEcu { ecu: String },

    /// The ECU has strings, but none for this key or its fallbacks
    #[error("no description found for {key}")]
    NoDescription { ecu: String, key: String },
}

/// Address whose string table is used for lookups on `ecu`
pub fn lookup_address(ecu: &str) -> &str {
    if ecu == "2E" {
        "2F"
    } else {
        ecu
    }
}

/// Find the raw description for `key` under `ecu`, trying the fallback keys in order
pub fn resolve<'a>(
    strings: &'a StringTable,
    ecu: &str,
    key: &str,
) -> std::result::Result<&'a str, ResolveWarning> {
    let ecu_key = lookup_address(ecu);
    let table = strings.for_ecu(ecu_key).ok_or_else(|| ResolveWarning::NoEcu {
        ecu: ecu_key.to_string(),
    })?;

    let candidates = [key.to_string(), format!("{key}_7A"), format!("V_{key}")];
    candidates
        .iter()
        .find_map(|candidate| table.get(candidate))
        .map(String::as_str)
        .ok_or_else(|| ResolveWarning::NoDescription {
            ecu: ecu_key.to_string(),
            key: key.to_string(),
        })
}

/// Resolve and escape the description of every DTC in place.
///
/// Unresolved DTCs keep their lookup key as description. The returned warnings
/// are in DTC order.
pub fn resolve_descriptions(dtcs: &mut [Dtc], strings: &StringTable) -> Vec<ResolveWarning> {
    let mut warnings = Vec::new();

    for dtc in dtcs.iter_mut() {
        let key = dtc.lookup_key();
        let text = match resolve(strings, &dtc.ecu, &key) {
            Ok(found) => found.to_string(),
            Err(warning) => {
                log::warn!("{}", warning);
                warnings.push(warning);
                key
            }
        };
        dtc.description = escape_annotated(&text);
    }

    warnings
}
