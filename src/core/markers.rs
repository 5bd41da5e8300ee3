use crate::domain::model::MarkerSpec;

const LIPID_PROFILE: Option<&str> = Some("LIPID PROFILE");
const RENAL_FUNCTION: Option<&str> = Some("RENAL FUNCTION TEST");

/// The biomarkers tracked on the dashboard.
///
/// Alias order matters: specific phrases come before generic ones, so
/// `CHOLESTEROL` is only tried once `TOTAL CHOLESTEROL` found nothing.
pub static MARKERS: &[MarkerSpec] = &[
    MarkerSpec {
        name: "Total Cholesterol",
        aliases: &["TOTAL CHOLESTEROL", "CHOLESTEROL"],
        section: LIPID_PROFILE,
    },
    MarkerSpec {
        name: "HDL",
        aliases: &["H D L CHOLESTEROL", "HDL CHOLESTEROL", "HDL-C"],
        section: LIPID_PROFILE,
    },
    MarkerSpec {
        name: "LDL",
        aliases: &["L D L CHOLESTEROL", "LDL CHOLESTEROL", "LDL-C"],
        section: LIPID_PROFILE,
    },
    MarkerSpec {
        name: "Triglycerides",
        aliases: &["TRIGLYCERIDES"],
        section: LIPID_PROFILE,
    },
    MarkerSpec {
        name: "Creatinine",
        aliases: &["CREATININE"],
        section: RENAL_FUNCTION,
    },
    MarkerSpec {
        name: "Vitamin D",
        aliases: &["VITAMIN D", "VIT D", "25-OH VITAMIN D"],
        section: None,
    },
    MarkerSpec {
        name: "Vitamin B12",
        aliases: &["VITAMIN B12", "VIT B12"],
        section: None,
    },
    MarkerSpec {
        name: "HbA1c",
        aliases: &["HBA1C", "GLYCATED HEMOGLOBIN"],
        section: None,
    },
];
