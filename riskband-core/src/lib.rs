//! Core model and banded evaluator for single-patient cardiovascular risk inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

mod bands;

pub use bands::{evaluate, LPA_MGDL_TO_NMOLL, MAX_AGE};

/// One evaluation's input set. Built either from structured form fields
/// (the serde field names are the form contract) or from smart-phrase text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Patient {
    /// Age in whole years, 0–120.
    pub age: u32,
    /// Established atherosclerotic cardiovascular disease.
    pub ascvd: bool,
    /// Premature family history of cardiovascular disease.
    pub fhx: bool,
    /// LDL cholesterol, mg/dL.
    pub ldl: f64,
    /// Apolipoprotein B, mg/dL.
    pub apob: f64,
    /// Lipoprotein(a); meaningful only together with `lpa_unit`.
    pub lpa: f64,
    pub lpa_unit: LpaUnit,
    /// Coronary artery calcium, Agatston score.
    pub cac: u32,
    /// High-sensitivity C-reactive protein, mg/L.
    pub hscrp: f64,
}

/// Reporting unit for Lp(a). The wire tokens match the form values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LpaUnit {
    #[serde(rename = "nmol/L")]
    NmolPerL,
    #[serde(rename = "mg/dL")]
    MgPerDl,
}

impl fmt::Display for LpaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LpaUnit::NmolPerL => "nmol/L",
            LpaUnit::MgPerDl => "mg/dL",
        })
    }
}

/// Per-marker severity band. Declared in ascending severity so the derived
/// `Ord` is the clinical comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Borderline,
    Intermediate,
    High,
    VeryHigh,
}

impl Band {
    /// Stable display label used in rationale entries and rendered notes.
    pub fn label(self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Borderline => "Borderline",
            Band::Intermediate => "Intermediate",
            Band::High => "High",
            Band::VeryHigh => "Very high",
        }
    }

    /// The next band up; saturates at `VeryHigh`.
    pub fn step_up(self) -> Band {
        match self {
            Band::Low => Band::Borderline,
            Band::Borderline => Band::Intermediate,
            Band::Intermediate => Band::High,
            Band::High | Band::VeryHigh => Band::VeryHigh,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five quantitative markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Ldl,
    ApoB,
    Lpa,
    Cac,
    Hscrp,
}

impl Marker {
    /// Canonical table order. Rationale entries and rendered marker lines
    /// both follow it.
    pub const ALL: [Marker; 5] = [
        Marker::Ldl,
        Marker::ApoB,
        Marker::Lpa,
        Marker::Cac,
        Marker::Hscrp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Marker::Ldl => "LDL-C",
            Marker::ApoB => "ApoB",
            Marker::Lpa => "Lp(a)",
            Marker::Cac => "CAC",
            Marker::Hscrp => "hsCRP",
        }
    }
}

/// Band assigned to each quantitative marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerBands {
    pub ldl: Band,
    pub apob: Band,
    pub lpa: Band,
    pub cac: Band,
    pub hscrp: Band,
}

impl MarkerBands {
    pub fn band_for(&self, marker: Marker) -> Band {
        match marker {
            Marker::Ldl => self.ldl,
            Marker::ApoB => self.apob,
            Marker::Lpa => self.lpa,
            Marker::Cac => self.cac,
            Marker::Hscrp => self.hscrp,
        }
    }

    /// Most severe band among the five markers.
    pub fn max(&self) -> Band {
        Marker::ALL
            .iter()
            .map(|marker| self.band_for(*marker))
            .max()
            .unwrap_or(Band::Low)
    }
}

/// Output of one evaluation. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskResult {
    pub bands: MarkerBands,
    /// Single combined tier after the override chain.
    pub overall_tier: Band,
    /// Ordered explanations of which rule fired for each contributor.
    pub rationale: Vec<String>,
}

/// Contract violation detected by the evaluator before any banding.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a non-negative finite value, got {value}")]
    OutOfDomain { field: &'static str, value: f64 },
    #[error("age must be at most {MAX_AGE} years, got {0}")]
    AgeOutOfRange(u32),
}
