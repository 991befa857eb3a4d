/// State codec integration tests
///
/// Exercises the public encode/decode surface with realistic calculator
/// states, including what happens to links that get damaged in transit.

use erasmus_core::validation::is_valid_shared_state;
use erasmus_core::{decode_state, encode_state, BudgetSummary, SharedState};
use erasmus_test_utils::{distinct_states, sample_state};

#[test]
fn test_full_state_survives_link() {
    let state = sample_state();
    let encoded = encode_state(&state).unwrap();

    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_eq!(decode_state(&encoded), Some(state));
}

#[test]
fn test_unicode_description_survives() {
    let mut state = sample_state();
    state.flights[0].description = "Zürich ✈ Kraków, 🎒 backpack only".to_string();

    let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();
    assert_eq!(decoded.flights[0].description, state.flights[0].description);
}

#[test]
fn test_malformed_payload_decodes_to_none() {
    assert_eq!(decode_state("not-a-valid-payload"), None);
    assert_eq!(decode_state(""), None);
    assert_eq!(decode_state("%%%"), None);
}

#[test]
fn test_truncated_link_decodes_to_none() {
    let encoded = encode_state(&sample_state()).unwrap();

    for cut in [1, encoded.len() / 2, encoded.len() - 3] {
        assert_eq!(decode_state(&encoded[..cut]), None, "cut at {}", cut);
    }
}

#[test]
fn test_empty_state() {
    let state = SharedState::default();
    let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();

    assert_eq!(decoded, state);
    assert!(decoded.flights.is_empty());
    assert_eq!(decoded.scholarship.additional_support, None);
}

#[test]
fn test_distinct_states_get_distinct_links() {
    let encoded: Vec<String> = distinct_states(20)
        .iter()
        .map(|s| encode_state(s).unwrap())
        .collect();

    for (i, a) in encoded.iter().enumerate() {
        for b in &encoded[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_decoded_state_is_usable() {
    let decoded = decode_state(&encode_state(&sample_state()).unwrap()).unwrap();

    assert!(is_valid_shared_state(&decoded));
    assert_eq!(
        BudgetSummary::calculate(&decoded),
        BudgetSummary::calculate(&sample_state())
    );
}

#[test]
fn test_many_flights() {
    let mut state = sample_state();
    let template = state.flights[0].clone();
    state.flights = (0..50)
        .map(|i| erasmus_core::Flight {
            id: format!("{}", 1_718_900_000_000u64 + i),
            price: 20.0 + i as f64,
            ..template.clone()
        })
        .collect();

    let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();
    assert_eq!(decoded.flights.len(), 50);
    assert_eq!(decoded, state);
}
