use crate::types::{ExpenseCategory, SharedState};
use serde::Serialize;

/// Cost breakdown for one person over the whole stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Per-person monthly cost, in canonical category order
    pub monthly: Vec<(&'static str, f64)>,
    pub total_monthly: f64,
    pub total_for_stay: f64,
    pub deposit: f64,
    pub flight_costs: f64,
    pub total_one_time: f64,
    pub scholarship_total: f64,
    pub total_cost: f64,
    pub net_cost: f64,
    pub net_cost_after_deposit: f64,
}

/// Divisor applied to a shared, non-accommodation expense.
const SHARED_SPLIT: f64 = 2.0;

impl BudgetSummary {
    pub fn calculate(state: &SharedState) -> Self {
        let params = &state.budget_params;
        let people = params.accommodation.number_of_people.max(1) as f64;

        let monthly: Vec<(&'static str, f64)> = ExpenseCategory::ALL
            .iter()
            .map(|category| {
                let expense = params.expense(*category);
                let share = match (category, expense.is_shared) {
                    (ExpenseCategory::Accommodation, true) => expense.amount / people,
                    (_, true) => expense.amount / SHARED_SPLIT,
                    (_, false) => expense.amount,
                };
                (category.name(), share)
            })
            .collect();

        let total_monthly: f64 = monthly.iter().map(|(_, v)| v).sum();
        let total_for_stay = total_monthly * state.stay_duration;

        let deposit_amount = params.accommodation.deposit * params.accommodation.amount;
        let deposit = if params.accommodation.is_shared {
            deposit_amount / people
        } else {
            deposit_amount
        };

        let flight_costs: f64 = state
            .flights
            .iter()
            .map(|f| if f.is_shared { f.price / SHARED_SPLIT } else { f.price })
            .sum();

        let scholarship = &state.scholarship;
        let funded_months = state.stay_duration.min(scholarship.max_months as f64).max(0.0);
        let scholarship_total = scholarship.monthly_grant * funded_months
            + scholarship.travel_support
            + scholarship.additional_support.unwrap_or(0.0);

        let total_one_time = deposit + flight_costs;
        let total_cost = total_for_stay + total_one_time;
        let net_cost = total_cost - scholarship_total;

        Self {
            monthly,
            total_monthly,
            total_for_stay,
            deposit,
            flight_costs,
            total_one_time,
            scholarship_total,
            total_cost,
            net_cost,
            net_cost_after_deposit: net_cost - deposit,
        }
    }
}
