//! Fixed threshold tables and the banded evaluation pipeline.
//!
//! Every table is a `const` ordered list of `(inclusive lower bound, band)`
//! pairs covering the full non-negative range, highest interval unbounded.
//! Guideline updates touch this block only, never the control flow below.

use crate::{Band, LpaUnit, Marker, MarkerBands, Patient, RiskResult, ValidationError};

/// Published Lp(a) mass-to-molar conversion (mg/dL to nmol/L). Estimated
/// conversion only; isoform-size dependent.
pub const LPA_MGDL_TO_NMOLL: f64 = 2.5;

/// Upper bound of the plausible age range enforced at the boundary.
pub const MAX_AGE: u32 = 120;

/// FHx escalation is confined to the premature-risk window.
const FHX_AGE_LIMIT: u32 = 65;

/// LDL-C, mg/dL (NCEP ATP III classification).
const LDL_BANDS: [(f64, Band); 5] = [
    (190.0, Band::VeryHigh),
    (160.0, Band::High),
    (130.0, Band::Intermediate),
    (100.0, Band::Borderline),
    (0.0, Band::Low),
];

/// ApoB, mg/dL.
const APOB_BANDS: [(f64, Band); 5] = [
    (150.0, Band::VeryHigh),
    (120.0, Band::High),
    (100.0, Band::Intermediate),
    (80.0, Band::Borderline),
    (0.0, Band::Low),
];

/// Lp(a), nmol/L (EAS consensus: 75–125 grey zone, 125 elevated, 430 very high).
const LPA_BANDS: [(f64, Band); 4] = [
    (430.0, Band::VeryHigh),
    (125.0, Band::High),
    (75.0, Band::Borderline),
    (0.0, Band::Low),
];

/// CAC, Agatston score.
const CAC_BANDS: [(f64, Band); 5] = [
    (400.0, Band::VeryHigh),
    (100.0, Band::High),
    (10.0, Band::Intermediate),
    (1.0, Band::Borderline),
    (0.0, Band::Low),
];

/// hsCRP, mg/L (AHA/CDC cut points; 10 and above reads as acute-phase signal).
const HSCRP_BANDS: [(f64, Band); 4] = [
    (10.0, Band::VeryHigh),
    (3.0, Band::High),
    (1.0, Band::Intermediate),
    (0.0, Band::Low),
];

/// Escalate-only tier rule. Rules run in declaration order; a rule that
/// fires never lowers the tier. Established-disease rules lead the
/// rationale, enhancer rules trail it.
struct TierOverride {
    leads_rationale: bool,
    fire: fn(&Patient, Band) -> Option<(Band, String)>,
}

static OVERRIDE_CHAIN: [TierOverride; 2] = [
    TierOverride {
        leads_rationale: true,
        fire: ascvd_override,
    },
    TierOverride {
        leads_rationale: false,
        fire: fhx_override,
    },
];

/// Established disease dominates every marker band.
fn ascvd_override(patient: &Patient, _tier: Band) -> Option<(Band, String)> {
    if patient.ascvd {
        Some((
            Band::VeryHigh,
            "Clinical ASCVD: overall tier forced to Very high".to_string(),
        ))
    } else {
        None
    }
}

/// Premature family history raises a sub-High tier by one step. Age gates
/// the rule; it is never banded itself.
fn fhx_override(patient: &Patient, tier: Band) -> Option<(Band, String)> {
    if patient.fhx && patient.age < FHX_AGE_LIMIT && tier < Band::High {
        let raised = tier.step_up();
        Some((
            raised,
            format!("Premature family history: tier raised one step to {raised}"),
        ))
    } else {
        None
    }
}

/// Map a value onto an ordered threshold table. A value exactly on a
/// boundary takes the higher band.
fn band_of(value: f64, table: &[(f64, Band)]) -> Band {
    table
        .iter()
        .find(|(lower, _)| value >= *lower)
        .map(|(_, band)| *band)
        .unwrap_or(Band::Low)
}

/// Lp(a) normalized to nmol/L; all Lp(a) thresholds are molar.
fn lpa_nmol_per_l(patient: &Patient) -> f64 {
    match patient.lpa_unit {
        LpaUnit::NmolPerL => patient.lpa,
        LpaUnit::MgPerDl => patient.lpa * LPA_MGDL_TO_NMOLL,
    }
}

/// Re-check the numeric domains the form boundary already clamps. The
/// evaluator refuses to coerce out-of-domain input silently.
fn validate(patient: &Patient) -> Result<(), ValidationError> {
    let floats = [
        ("ldl", patient.ldl),
        ("apob", patient.apob),
        ("lpa", patient.lpa),
        ("hscrp", patient.hscrp),
    ];
    for (field, value) in floats {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::OutOfDomain { field, value });
        }
    }
    if patient.age > MAX_AGE {
        return Err(ValidationError::AgeOutOfRange(patient.age));
    }
    Ok(())
}

fn marker_entry(patient: &Patient, marker: Marker, band: Band) -> String {
    match marker {
        Marker::Ldl => format!("LDL-C {} mg/dL: {band}", patient.ldl),
        Marker::ApoB => format!("ApoB {} mg/dL: {band}", patient.apob),
        Marker::Lpa => match patient.lpa_unit {
            LpaUnit::NmolPerL => format!("Lp(a) {} nmol/L: {band}", patient.lpa),
            LpaUnit::MgPerDl => format!(
                "Lp(a) {} mg/dL ({} nmol/L): {band}",
                patient.lpa,
                patient.lpa * LPA_MGDL_TO_NMOLL
            ),
        },
        Marker::Cac => format!("CAC {} Agatston: {band}", patient.cac),
        Marker::Hscrp => format!("hsCRP {} mg/L: {band}", patient.hscrp),
    }
}

/// Evaluate one patient: validate, normalize units, band each marker,
/// combine bands through the override chain and assemble the rationale.
///
/// Pure and deterministic; identical inputs yield an identical result.
pub fn evaluate(patient: &Patient) -> Result<RiskResult, ValidationError> {
    validate(patient)?;

    let bands = MarkerBands {
        ldl: band_of(patient.ldl, &LDL_BANDS),
        apob: band_of(patient.apob, &APOB_BANDS),
        lpa: band_of(lpa_nmol_per_l(patient), &LPA_BANDS),
        cac: band_of(f64::from(patient.cac), &CAC_BANDS),
        hscrp: band_of(patient.hscrp, &HSCRP_BANDS),
    };

    let mut tier = bands.max();
    let mut leading = Vec::new();
    let mut trailing = Vec::new();

    for rule in &OVERRIDE_CHAIN {
        if let Some((raised, entry)) = (rule.fire)(patient, tier) {
            tier = tier.max(raised);
            if rule.leads_rationale {
                leading.push(entry);
            } else {
                trailing.push(entry);
            }
        }
    }

    let mut rationale = leading;
    for marker in Marker::ALL {
        let band = bands.band_for(marker);
        if band > Band::Low {
            rationale.push(marker_entry(patient, marker, band));
        }
    }
    rationale.extend(trailing);

    Ok(RiskResult {
        bands,
        overall_tier: tier,
        rationale,
    })
}
