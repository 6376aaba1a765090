//! Smart-phrase shorthand to `Patient` converter.
//!
//! The phrase is a compact structured shorthand: entries separated by `;`
//! or newlines, each entry `key value` (`:` or `=` after the key also
//! accepted), keys case-insensitive. `lpa` takes an optional two-letter
//! unit token, `nm` for nmol/L or `mg` for mg/dL; without one the value is
//! read as nmol/L. Booleans accept y/n, yes/no, true/false and 1/0.
//!
//! A full record looks like:
//!
//! ```text
//! age 52; ascvd n; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0; hscrp 2.7
//! ```
//!
//! Parsing is deterministic and locale-free, fails on the first malformed
//! token and never returns a partial `Patient`.

use riskband_core::{LpaUnit, Patient, MAX_AGE};

/// The required field set, in canonical order. Identical to the form path.
pub const REQUIRED_KEYS: [&str; 8] = [
    "age", "ascvd", "fhx", "ldl", "apob", "lpa", "cac", "hscrp",
];

/// Smart-phrase rejection, naming the first offending token.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty smart-phrase text")]
    Empty,
    #[error("unrecognized key `{0}`")]
    UnknownKey(String),
    #[error("missing value for `{0}`")]
    MissingValue(&'static str),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("unexpected trailing token `{token}` after `{key}`")]
    TrailingToken { key: &'static str, token: String },
    #[error("duplicate key `{0}`")]
    DuplicateKey(&'static str),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

#[derive(Default)]
struct PhraseFields {
    age: Option<u32>,
    ascvd: Option<bool>,
    fhx: Option<bool>,
    ldl: Option<f64>,
    apob: Option<f64>,
    lpa: Option<(f64, LpaUnit)>,
    cac: Option<u32>,
    hscrp: Option<f64>,
}

impl PhraseFields {
    fn missing_key(&self) -> Option<&'static str> {
        // Reported in canonical key order.
        if self.age.is_none() {
            Some("age")
        } else if self.ascvd.is_none() {
            Some("ascvd")
        } else if self.fhx.is_none() {
            Some("fhx")
        } else if self.ldl.is_none() {
            Some("ldl")
        } else if self.apob.is_none() {
            Some("apob")
        } else if self.lpa.is_none() {
            Some("lpa")
        } else if self.cac.is_none() {
            Some("cac")
        } else if self.hscrp.is_none() {
            Some("hscrp")
        } else {
            None
        }
    }

    fn finish(self) -> Result<Patient, ParseError> {
        if let Some(key) = self.missing_key() {
            return Err(ParseError::MissingField(key));
        }
        let (lpa, lpa_unit) = self.lpa.unwrap();
        Ok(Patient {
            age: self.age.unwrap(),
            ascvd: self.ascvd.unwrap(),
            fhx: self.fhx.unwrap(),
            ldl: self.ldl.unwrap(),
            apob: self.apob.unwrap(),
            lpa,
            lpa_unit,
            cac: self.cac.unwrap(),
            hscrp: self.hscrp.unwrap(),
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_count(key: &'static str, raw: &str) -> Result<u32, ParseError> {
    raw.parse::<u32>().map_err(|_| ParseError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_measure(key: &'static str, raw: &str) -> Result<f64, ParseError> {
    let value: f64 = raw.parse().map_err(|_| ParseError::InvalidValue {
        key,
        value: raw.to_string(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::InvalidValue {
            key,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn parse_lpa_unit(key: &'static str, raw: &str) -> Result<LpaUnit, ParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "nm" => Ok(LpaUnit::NmolPerL),
        "mg" => Ok(LpaUnit::MgPerDl),
        _ => Err(ParseError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &'static str, value: T) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateKey(key));
    }
    *slot = Some(value);
    Ok(())
}

fn reject_trailing(key: &'static str, rest: &[&str]) -> Result<(), ParseError> {
    match rest.first() {
        Some(token) => Err(ParseError::TrailingToken {
            key,
            token: (*token).to_string(),
        }),
        None => Ok(()),
    }
}

/// Parse smart-phrase text into a `Patient` with the same field set and
/// constraints as the form path.
pub fn parse_phrase(text: &str) -> Result<Patient, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut fields = PhraseFields::default();

    for entry in text.split(|c| c == ';' || c == '\n') {
        let normalized = entry.replace([':', '='], " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let Some((raw_key, rest)) = tokens.split_first() else {
            continue;
        };

        let key = raw_key.to_ascii_lowercase();
        let value = match rest.first() {
            Some(value) => *value,
            None => {
                return Err(match canonical_key(&key) {
                    Some(known) => ParseError::MissingValue(known),
                    None => ParseError::UnknownKey(key),
                })
            }
        };

        match key.as_str() {
            "age" => {
                let age = parse_count("age", value)?;
                if age > MAX_AGE {
                    return Err(ParseError::InvalidValue {
                        key: "age",
                        value: value.to_string(),
                    });
                }
                set_once(&mut fields.age, "age", age)?;
                reject_trailing("age", &rest[1..])?;
            }
            "ascvd" => {
                set_once(&mut fields.ascvd, "ascvd", parse_bool("ascvd", value)?)?;
                reject_trailing("ascvd", &rest[1..])?;
            }
            "fhx" => {
                set_once(&mut fields.fhx, "fhx", parse_bool("fhx", value)?)?;
                reject_trailing("fhx", &rest[1..])?;
            }
            "ldl" => {
                set_once(&mut fields.ldl, "ldl", parse_measure("ldl", value)?)?;
                reject_trailing("ldl", &rest[1..])?;
            }
            "apob" => {
                set_once(&mut fields.apob, "apob", parse_measure("apob", value)?)?;
                reject_trailing("apob", &rest[1..])?;
            }
            "lpa" => {
                let measure = parse_measure("lpa", value)?;
                let unit = match rest.get(1) {
                    Some(token) => parse_lpa_unit("lpa", token)?,
                    None => LpaUnit::NmolPerL,
                };
                set_once(&mut fields.lpa, "lpa", (measure, unit))?;
                reject_trailing("lpa", rest.get(2..).unwrap_or(&[]))?;
            }
            "cac" => {
                set_once(&mut fields.cac, "cac", parse_count("cac", value)?)?;
                reject_trailing("cac", &rest[1..])?;
            }
            "hscrp" => {
                set_once(&mut fields.hscrp, "hscrp", parse_measure("hscrp", value)?)?;
                reject_trailing("hscrp", &rest[1..])?;
            }
            _ => return Err(ParseError::UnknownKey(key)),
        }
    }

    fields.finish()
}

/// Canonical smart-phrase text for a patient. `parse_phrase(encode(p))`
/// reproduces `p` exactly.
pub fn encode(patient: &Patient) -> String {
    let unit = match patient.lpa_unit {
        LpaUnit::NmolPerL => "nm",
        LpaUnit::MgPerDl => "mg",
    };
    format!(
        "age {}; ascvd {}; fhx {}; ldl {}; apob {}; lpa {} {}; cac {}; hscrp {}",
        patient.age,
        flag(patient.ascvd),
        flag(patient.fhx),
        patient.ldl,
        patient.apob,
        patient.lpa,
        unit,
        patient.cac,
        patient.hscrp,
    )
}

fn flag(value: bool) -> &'static str {
    if value {
        "y"
    } else {
        "n"
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    REQUIRED_KEYS.iter().find(|known| **known == key).copied()
}
