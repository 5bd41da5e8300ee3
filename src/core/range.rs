use crate::domain::model::PlausibilityWindow;

/// Plausibility windows keyed by canonical marker name.
///
/// These filter out parse artifacts (page numbers, reference ranges, dates)
/// and say nothing about clinical status; see `core::clinical` for that.
const PLAUSIBILITY_WINDOWS: &[(&str, PlausibilityWindow)] = &[
    ("Total Cholesterol", PlausibilityWindow::new(100.0, 500.0)), // mg/dL
    ("HDL", PlausibilityWindow::new(20.0, 100.0)),                // mg/dL
    ("LDL", PlausibilityWindow::new(30.0, 300.0)),                // mg/dL
    ("Triglycerides", PlausibilityWindow::new(30.0, 1000.0)),     // mg/dL
    ("Creatinine", PlausibilityWindow::new(0.3, 4.0)),            // mg/dL
    ("Vitamin D", PlausibilityWindow::new(5.0, 150.0)),           // ng/mL
    ("Vitamin B12", PlausibilityWindow::new(150.0, 2000.0)),      // pg/mL
    ("HbA1c", PlausibilityWindow::new(3.0, 15.0)),                // %
    ("Glucose", PlausibilityWindow::new(50.0, 500.0)),            // mg/dL
    ("ALT", PlausibilityWindow::new(0.0, 500.0)),                 // U/L
    ("AST", PlausibilityWindow::new(0.0, 500.0)),                 // U/L
];

pub fn window_for(marker: &str) -> Option<PlausibilityWindow> {
    PLAUSIBILITY_WINDOWS
        .iter()
        .find(|(name, _)| *name == marker)
        .map(|(_, window)| *window)
}

/// Accepts `value` for `marker` unless it falls outside the marker's window.
/// Markers without a window are always accepted.
pub fn validate(marker: &str, value: f64) -> bool {
    match window_for(marker) {
        Some(window) if !window.contains(value) => {
            tracing::warn!(
                marker,
                value,
                window = %window,
                "Value {} is outside reasonable range for {}",
                value,
                marker
            );
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_lookup() {
        assert_eq!(window_for("HDL"), Some(PlausibilityWindow::new(20.0, 100.0)));
        assert_eq!(window_for("Creatinine"), Some(PlausibilityWindow::new(0.3, 4.0)));
        assert_eq!(window_for("hdl"), None);
        assert_eq!(window_for("Ferritin"), None);
    }

    #[test]
    fn test_rejects_outside_window() {
        assert!(validate("HDL", 42.0));
        assert!(validate("HDL", 20.0));
        assert!(validate("HDL", 100.0));
        assert!(!validate("HDL", 500.0));
        assert!(!validate("Vitamin B12", 149.0));
        assert!(!validate("Creatinine", 12.0));
    }

    #[test]
    fn test_unknown_marker_is_accepted() {
        assert!(validate("Ferritin", 9999.0));
        assert!(validate("Ferritin", -1.0));
    }
}
