/// Advisory checks on calculator input.
///
/// Each check returns human-readable messages instead of failing fast so a
/// caller can report every problem at once.

use crate::types::{BudgetParameters, ExpenseCategory, SharedState};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$")
        .expect("ISO date pattern is valid");
}

fn check_amount(errors: &mut Vec<String>, label: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("Invalid {} amount", label));
    } else if value < 0.0 {
        errors.push(format!("Negative {} amount", label));
    }
}

pub fn validate_budget_parameters(params: &BudgetParameters) -> Vec<String> {
    let mut errors = Vec::new();

    for category in ExpenseCategory::ALL {
        check_amount(&mut errors, category.name(), params.expense(category).amount);
    }

    if !params.accommodation.deposit.is_finite() || params.accommodation.deposit < 0.0 {
        errors.push("Invalid accommodation deposit".to_string());
    }
    if params.accommodation.number_of_people < 1 {
        errors.push("Invalid number of people for accommodation".to_string());
    }

    errors
}

pub fn is_valid_budget_parameters(params: &BudgetParameters) -> bool {
    validate_budget_parameters(params).is_empty()
}

pub fn is_iso_date(date: &str) -> bool {
    ISO_DATE.is_match(date)
}

pub fn validate_shared_state(state: &SharedState) -> Vec<String> {
    let mut errors = validate_budget_parameters(&state.budget_params);

    if state.city_id.trim().is_empty() {
        errors.push("Missing city".to_string());
    }
    if !state.stay_duration.is_finite() || state.stay_duration < 0.0 {
        errors.push("Invalid stay duration".to_string());
    }

    for flight in &state.flights {
        if !is_iso_date(&flight.date) {
            errors.push(format!("Invalid date for flight {}: {:?}", flight.id, flight.date));
        }
        if !flight.price.is_finite() || flight.price < 0.0 {
            errors.push(format!("Invalid price for flight {}", flight.id));
        }
    }

    let scholarship = &state.scholarship;
    let support = [
        ("monthly grant", Some(scholarship.monthly_grant)),
        ("travel support", Some(scholarship.travel_support)),
        ("additional support", scholarship.additional_support),
    ];
    for (label, value) in support {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("Invalid scholarship {}", label));
            }
        }
    }

    errors
}

pub fn is_valid_shared_state(state: &SharedState) -> bool {
    validate_shared_state(state).is_empty()
}
