//! Clinical reference bands for the dashboard summary.
//!
//! Separate from the plausibility windows in `core::range`: those decide
//! whether a parsed number is believable, these bands grade a believable value.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Optimal,
    Borderline,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Optimal => "OPTIMAL",
            RiskLevel::Borderline => "BORDERLINE",
            RiskLevel::High => "HIGH RISK",
        };
        f.write_str(label)
    }
}

struct ReferenceBands {
    marker: &'static str,
    unit: &'static str,
    optimal: (f64, f64),
    borderline: Option<(f64, f64)>,
    messages: [&'static str; 3],
}

const REFERENCE_BANDS: &[ReferenceBands] = &[
    ReferenceBands {
        marker: "Total Cholesterol",
        unit: "mg/dL",
        optimal: (0.0, 200.0),
        borderline: Some((200.0, 239.0)),
        messages: [
            "Desirable level - Continue healthy lifestyle",
            "Borderline high - Consider dietary changes",
            "High risk - Consult physician for treatment",
        ],
    },
    ReferenceBands {
        marker: "HDL",
        unit: "mg/dL",
        optimal: (40.0, 60.0),
        borderline: Some((35.0, 39.0)),
        messages: [
            "Good protective level against heart disease",
            "Below optimal - Increase physical activity",
            "Low HDL - Major risk factor for heart disease",
        ],
    },
    ReferenceBands {
        marker: "LDL",
        unit: "mg/dL",
        optimal: (0.0, 100.0),
        borderline: Some((100.0, 129.0)),
        messages: [
            "Optimal level - Low cardiovascular risk",
            "Near optimal - Monitor closely",
            "High risk - May require medication",
        ],
    },
    ReferenceBands {
        marker: "Triglycerides",
        unit: "mg/dL",
        optimal: (0.0, 150.0),
        borderline: Some((150.0, 199.0)),
        messages: [
            "Normal level - Continue current lifestyle",
            "Borderline high - Reduce refined carbs",
            "High level - Significant cardiovascular risk",
        ],
    },
    ReferenceBands {
        marker: "Creatinine",
        unit: "mg/dL",
        optimal: (0.7, 1.18),
        borderline: None,
        messages: [
            "Normal kidney function",
            "Normal kidney function",
            "Elevated - May indicate kidney dysfunction",
        ],
    },
    ReferenceBands {
        marker: "Vitamin D",
        unit: "ng/mL",
        optimal: (30.0, 100.0),
        borderline: Some((20.0, 29.0)),
        messages: [
            "Sufficient vitamin D status",
            "Insufficient - Consider supplementation",
            "Deficient - Requires immediate supplementation",
        ],
    },
    ReferenceBands {
        marker: "Vitamin B12",
        unit: "pg/mL",
        optimal: (211.0, 911.0),
        borderline: Some((150.0, 210.0)),
        messages: [
            "Adequate B12 levels",
            "Low normal - Monitor closely",
            "Deficient - Risk of anemia and neuropathy",
        ],
    },
    ReferenceBands {
        marker: "HbA1c",
        unit: "%",
        optimal: (4.0, 5.6),
        borderline: Some((5.7, 6.4)),
        messages: [
            "Normal glucose control",
            "Prediabetic - Lifestyle intervention needed",
            "Diabetic - Requires medical management",
        ],
    },
];

fn bands(marker: &str) -> Option<&'static ReferenceBands> {
    REFERENCE_BANDS.iter().find(|b| b.marker == marker)
}

fn within((min, max): (f64, f64), value: f64) -> bool {
    value >= min && value <= max
}

/// Risk level of `value`, or `None` for markers without reference bands.
/// Anything outside the optimal and borderline bands counts as high risk,
/// whichever side it falls on.
pub fn classify(marker: &str, value: f64) -> Option<RiskLevel> {
    let bands = bands(marker)?;
    if within(bands.optimal, value) {
        Some(RiskLevel::Optimal)
    } else if bands.borderline.is_some_and(|b| within(b, value)) {
        Some(RiskLevel::Borderline)
    } else {
        Some(RiskLevel::High)
    }
}

pub fn interpretation(marker: &str, value: f64) -> &'static str {
    let (Some(bands), Some(level)) = (bands(marker), classify(marker, value)) else {
        return "Consult healthcare provider";
    };
    match level {
        RiskLevel::Optimal => bands.messages[0],
        RiskLevel::Borderline => bands.messages[1],
        RiskLevel::High => bands.messages[2],
    }
}

pub fn unit(marker: &str) -> Option<&'static str> {
    bands(marker).map(|b| b.unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify("Total Cholesterol", 132.0), Some(RiskLevel::Optimal));
        assert_eq!(classify("Total Cholesterol", 220.0), Some(RiskLevel::Borderline));
        assert_eq!(classify("Total Cholesterol", 260.0), Some(RiskLevel::High));
        assert_eq!(classify("HDL", 35.0), Some(RiskLevel::Borderline));
        assert_eq!(classify("HDL", 30.0), Some(RiskLevel::High));
        assert_eq!(classify("HbA1c", 5.8), Some(RiskLevel::Borderline));
        assert_eq!(classify("Creatinine", 1.19), Some(RiskLevel::High));
    }

    #[test]
    fn test_unknown_marker() {
        assert_eq!(classify("Glucose", 90.0), None);
        assert_eq!(interpretation("Glucose", 90.0), "Consult healthcare provider");
        assert_eq!(unit("Glucose"), None);
    }

    #[test]
    fn test_plausible_value_can_still_be_high_risk() {
        // Inside the HDL plausibility window, but clinically low.
        assert!(crate::core::range::validate("HDL", 25.0));
        assert_eq!(classify("HDL", 25.0), Some(RiskLevel::High));
        assert_eq!(
            interpretation("HDL", 25.0),
            "Low HDL - Major risk factor for heart disease"
        );
    }

    #[test]
    fn test_units() {
        assert_eq!(unit("Vitamin D"), Some("ng/mL"));
        assert_eq!(unit("HbA1c"), Some("%"));
    }
}
