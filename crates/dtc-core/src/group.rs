//! Grouping of trouble codes by owning ECU

use crate::model::Dtc;
use std::collections::HashMap;

/// The trouble codes of one ECU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcuGroup<'a> {
    /// ECU address shared by every code in the group
    pub ecu: &'a str,
    /// Codes in source order
    pub dtcs: Vec<&'a Dtc>,
}

impl EcuGroup<'_> {
    /// Name of the generated table for this ECU (e.g., "dtc_list_7a")
    pub fn list_name(&self) -> String {
        format!("dtc_list_{}", self.ecu.to_lowercase())
    }
}

/// Group DTCs by ECU address.
///
/// Groups appear in the order their first DTC was seen.
pub fn group_by_ecu(dtcs: &[Dtc]) -> Vec<EcuGroup<'_>> {
    let mut groups: Vec<EcuGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for dtc in dtcs {
        match index.get(dtc.ecu.as_str()) {
            Some(&i) => groups[i].dtcs.push(dtc),
            None => {
                index.insert(&dtc.ecu, groups.len());
                groups.push(EcuGroup {
                    ecu: &dtc.ecu,
                    dtcs: vec![dtc],
                });
            }
        }
    }

    groups
}
