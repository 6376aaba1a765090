//! Plain-text report renderer for one evaluated patient.
//!
//! Output is a fixed-structure note suitable for copy-paste into a record:
//! header, one line per quantitative marker with value, unit and band,
//! one line per qualitative flag that is present, the overall tier and the
//! rationale list. The same inputs always yield byte-identical text.

use riskband_core::{Marker, Patient, RiskResult};

const HEADER: &str = "CARDIOVASCULAR RISK BANDING REPORT";
const RULE_WIDTH: usize = 40;

/// Render the evaluation of `patient` as a copy-paste-ready note.
///
/// Echoes only fields present in `patient`; fabricates nothing. The Lp(a)
/// line carries whichever unit the value was reported in.
pub fn render(patient: &Patient, result: &RiskResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(HEADER.to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("Age: {}", patient.age));
    lines.push(String::new());

    lines.push("Markers:".to_string());
    for marker in Marker::ALL {
        lines.push(marker_line(patient, result, marker));
    }

    let flags = flag_lines(patient);
    if !flags.is_empty() {
        lines.push(String::new());
        lines.push("Flags:".to_string());
        lines.extend(flags);
    }

    lines.push(String::new());
    lines.push(format!("Overall tier: {}", result.overall_tier));

    lines.push(String::new());
    lines.push("Rationale:".to_string());
    if result.rationale.is_empty() {
        lines.push("- No marker above the low band".to_string());
    } else {
        for entry in &result.rationale {
            lines.push(format!("- {entry}"));
        }
    }

    let mut note = lines.join("\n");
    note.push('\n');
    note
}

fn marker_line(patient: &Patient, result: &RiskResult, marker: Marker) -> String {
    let band = result.bands.band_for(marker);
    let (value, unit) = match marker {
        Marker::Ldl => (patient.ldl.to_string(), "mg/dL".to_string()),
        Marker::ApoB => (patient.apob.to_string(), "mg/dL".to_string()),
        Marker::Lpa => (patient.lpa.to_string(), patient.lpa_unit.to_string()),
        Marker::Cac => (patient.cac.to_string(), "Agatston".to_string()),
        Marker::Hscrp => (patient.hscrp.to_string(), "mg/L".to_string()),
    };
    format!("- {}: {value} {unit} [{band}]", marker.label())
}

fn flag_lines(patient: &Patient) -> Vec<String> {
    let mut lines = Vec::new();
    if patient.ascvd {
        lines.push("- Clinical ASCVD".to_string());
    }
    if patient.fhx {
        lines.push("- Premature family history".to_string());
    }
    lines
}
