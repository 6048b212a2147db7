//! Consumer safety checklist models

use serde::{Deserialize, Serialize};

/// Answers recorded during a consumer safety check
///
/// One record per field visit; every question defaults to "not checked".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistAnswers {
    /// Regulator and hose are in serviceable condition
    pub regulator_hose_ok: bool,
    /// Cylinder stored upright on a level surface
    pub cylinder_upright: bool,
    /// No visible damage or corrosion on the cylinder body
    pub cylinder_undamaged: bool,
    /// Safety cap seal intact, no signs of spurious refilling
    pub seal_intact: bool,
    /// Kitchen has adequate ventilation
    pub kitchen_ventilated: bool,
    /// Test date stamped on the cylinder is legible and current
    pub test_date_valid: bool,
    /// Consumer briefed on leak response and valve handling
    pub consumer_briefed: bool,
    pub remarks: Option<String>,
}

impl ChecklistAnswers {
    /// Number of checks that passed out of the seven recorded
    pub fn passed_count(&self) -> u8 {
        [
            self.regulator_hose_ok,
            self.cylinder_upright,
            self.cylinder_undamaged,
            self.seal_intact,
            self.kitchen_ventilated,
            self.test_date_valid,
            self.consumer_briefed,
        ]
        .iter()
        .filter(|&&b| b)
        .count() as u8
    }

    /// A visit is compliant when every check passed
    pub fn is_compliant(&self) -> bool {
        self.passed_count() == 7
    }
}
