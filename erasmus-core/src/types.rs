use serde::{Deserialize, Serialize};
use std::fmt;

/// A monthly expense line with an optional split between flatmates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseParameter {
    pub amount: f64,
    pub is_shared: bool,
}

/// Rent plus the deposit and the number of people splitting it.
///
/// `deposit` is expressed in months of rent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationParameter {
    pub amount: f64,
    pub is_shared: bool,
    pub deposit: f64,
    pub number_of_people: u32,
}

impl Default for AccommodationParameter {
    fn default() -> Self {
        Self {
            amount: 0.0,
            is_shared: false,
            deposit: 0.0,
            number_of_people: 1,
        }
    }
}

impl AccommodationParameter {
    /// View the rent as a plain expense line
    pub fn as_expense(&self) -> ExpenseParameter {
        ExpenseParameter {
            amount: self.amount,
            is_shared: self.is_shared,
        }
    }
}

/// The eight budget categories, in canonical (wire) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Accommodation,
    Utilities,
    Groceries,
    Transport,
    Entertainment,
    Dining,
    Leisure,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Accommodation,
        ExpenseCategory::Utilities,
        ExpenseCategory::Groceries,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Dining,
        ExpenseCategory::Leisure,
        ExpenseCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExpenseCategory::Accommodation => "accommodation",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Dining => "dining",
            ExpenseCategory::Leisure => "leisure",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetParameters {
    pub accommodation: AccommodationParameter,
    pub utilities: ExpenseParameter,
    pub groceries: ExpenseParameter,
    pub transport: ExpenseParameter,
    pub entertainment: ExpenseParameter,
    pub dining: ExpenseParameter,
    pub leisure: ExpenseParameter,
    pub other: ExpenseParameter,
}

impl BudgetParameters {
    /// Amount and sharing flag for any category, accommodation included.
    pub fn expense(&self, category: ExpenseCategory) -> ExpenseParameter {
        match category {
            ExpenseCategory::Accommodation => self.accommodation.as_expense(),
            ExpenseCategory::Utilities => self.utilities,
            ExpenseCategory::Groceries => self.groceries,
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Entertainment => self.entertainment,
            ExpenseCategory::Dining => self.dining,
            ExpenseCategory::Leisure => self.leisure,
            ExpenseCategory::Other => self.other,
        }
    }

    /// Mutable access to a non-accommodation category.
    ///
    /// Returns `None` for accommodation, which carries extra fields.
    pub fn expense_mut(&mut self, category: ExpenseCategory) -> Option<&mut ExpenseParameter> {
        match category {
            ExpenseCategory::Accommodation => None,
            ExpenseCategory::Utilities => Some(&mut self.utilities),
            ExpenseCategory::Groceries => Some(&mut self.groceries),
            ExpenseCategory::Transport => Some(&mut self.transport),
            ExpenseCategory::Entertainment => Some(&mut self.entertainment),
            ExpenseCategory::Dining => Some(&mut self.dining),
            ExpenseCategory::Leisure => Some(&mut self.leisure),
            ExpenseCategory::Other => Some(&mut self.other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub description: String,
    pub price: f64,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub is_shared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipConfig {
    pub monthly_grant: f64,
    pub max_months: u32,
    pub travel_support: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_support: Option<f64>,
}

/// Everything a shared link restores in the calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedState {
    pub city_id: String,
    pub budget_params: BudgetParameters,
    #[serde(default)]
    pub flights: Vec<Flight>,
    pub scholarship: ScholarshipConfig,
    /// Length of the stay in months
    pub stay_duration: f64,
}
