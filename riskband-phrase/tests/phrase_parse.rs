use riskband_core::{evaluate, LpaUnit, Patient};
use riskband_phrase::{encode, parse_phrase, ParseError};

fn sample() -> Patient {
    Patient {
        age: 52,
        ascvd: false,
        fhx: false,
        ldl: 148.0,
        apob: 112.0,
        lpa: 165.0,
        lpa_unit: LpaUnit::NmolPerL,
        cac: 0,
        hscrp: 2.7,
    }
}

#[test]
fn canonical_phrase_parses_to_the_form_equivalent_patient() {
    let parsed = parse_phrase("age 52; ascvd n; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0; hscrp 2.7")
        .expect("canonical phrase parses");
    assert_eq!(parsed, sample());
}

#[test]
fn separators_case_and_boolean_spellings_are_tolerated() {
    let text = "AGE: 52\nASCVD = no\nFHX: YES\nldl=148\napob 112\nLPA 66 MG\ncac: 0\nhscrp 2.7";
    let parsed = parse_phrase(text).expect("variant phrase parses");
    assert_eq!(
        parsed,
        Patient {
            fhx: true,
            lpa: 66.0,
            lpa_unit: LpaUnit::MgPerDl,
            ..sample()
        }
    );
}

#[test]
fn lpa_without_a_unit_token_defaults_to_nmol_per_l() {
    let parsed = parse_phrase("age 52; ascvd n; fhx n; ldl 148; apob 112; lpa 165; cac 0; hscrp 2.7")
        .expect("unit-less lpa parses");
    assert_eq!(parsed.lpa_unit, LpaUnit::NmolPerL);
}

#[test]
fn encode_then_parse_round_trips_and_evaluates_identically() {
    let patients = [
        sample(),
        Patient {
            age: 67,
            ascvd: true,
            fhx: true,
            lpa: 66.0,
            lpa_unit: LpaUnit::MgPerDl,
            cac: 412,
            hscrp: 0.4,
            ..sample()
        },
        Patient {
            age: 0,
            ldl: 0.0,
            apob: 0.0,
            lpa: 0.0,
            cac: 0,
            hscrp: 0.0,
            ..sample()
        },
    ];

    for patient in patients {
        let parsed = parse_phrase(&encode(&patient)).expect("encoded phrase parses");
        assert_eq!(parsed, patient);
        assert_eq!(
            evaluate(&parsed).expect("parsed patient evaluates"),
            evaluate(&patient).expect("direct patient evaluates")
        );
    }
}

#[test]
fn empty_text_is_rejected() {
    assert_eq!(parse_phrase("  \n "), Err(ParseError::Empty));
}

#[test]
fn the_first_unrecognized_key_is_named() {
    let text = "age 52; bogus 3; ldl 148";
    assert_eq!(
        parse_phrase(text),
        Err(ParseError::UnknownKey("bogus".to_string()))
    );
}

#[test]
fn a_missing_required_field_is_named_in_canonical_order() {
    let text = "ascvd n; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0";
    // Both age and hscrp are absent; age is first in canonical order.
    assert_eq!(parse_phrase(text), Err(ParseError::MissingField("age")));
}

#[test]
fn malformed_values_are_rejected_with_the_offending_token() {
    assert_eq!(
        parse_phrase("age 52; ascvd n; fhx n; ldl abc; apob 112; lpa 165 nm; cac 0; hscrp 2.7"),
        Err(ParseError::InvalidValue {
            key: "ldl",
            value: "abc".to_string()
        })
    );
    assert_eq!(
        parse_phrase("age 52; ascvd maybe; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0; hscrp 2.7"),
        Err(ParseError::InvalidValue {
            key: "ascvd",
            value: "maybe".to_string()
        })
    );
    assert_eq!(
        parse_phrase("age 52; ascvd n; fhx n; ldl 148; apob 112; lpa 165 kg; cac 0; hscrp 2.7"),
        Err(ParseError::InvalidValue {
            key: "lpa",
            value: "kg".to_string()
        })
    );
    assert_eq!(
        parse_phrase("age 121; ascvd n; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0; hscrp 2.7"),
        Err(ParseError::InvalidValue {
            key: "age",
            value: "121".to_string()
        })
    );
    assert_eq!(
        parse_phrase("age 52; ascvd n; fhx n; ldl -5; apob 112; lpa 165 nm; cac 0; hscrp 2.7"),
        Err(ParseError::InvalidValue {
            key: "ldl",
            value: "-5".to_string()
        })
    );
}

#[test]
fn a_key_without_a_value_is_rejected() {
    assert_eq!(parse_phrase("age"), Err(ParseError::MissingValue("age")));
}

#[test]
fn duplicate_keys_are_rejected() {
    let text = "age 52; age 53; ascvd n; fhx n; ldl 148; apob 112; lpa 165 nm; cac 0; hscrp 2.7";
    assert_eq!(parse_phrase(text), Err(ParseError::DuplicateKey("age")));
}

#[test]
fn trailing_tokens_are_rejected() {
    assert_eq!(
        parse_phrase("age 52 years; ascvd n"),
        Err(ParseError::TrailingToken {
            key: "age",
            token: "years".to_string()
        })
    );
}
