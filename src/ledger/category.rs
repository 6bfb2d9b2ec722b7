//! Fixed classifications attached to every transaction.

use std::{fmt, str::FromStr};

use strsim::levenshtein;

use crate::errors::ValidationError;

const SUGGESTION_DISTANCE: usize = 3;

/// Purpose of a transaction. Parsed case-insensitively, displayed capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wages,
    Rent,
    Bills,
    Subscriptions,
    Restaurants,
    Groceries,
    Household,
    Entertainment,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Wages,
        Category::Rent,
        Category::Bills,
        Category::Subscriptions,
        Category::Restaurants,
        Category::Groceries,
        Category::Household,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wages => "Wages",
            Category::Rent => "Rent",
            Category::Bills => "Bills",
            Category::Subscriptions => "Subscriptions",
            Category::Restaurants => "Restaurants",
            Category::Groceries => "Groceries",
            Category::Household => "Household",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Comma separated list of accepted values, for error messages.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Closest known category to a mistyped value, if any is near enough.
    pub fn suggest(input: &str) -> Option<Category> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .map(|category| (levenshtein(&category.as_str().to_lowercase(), &needle), *category))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, category)| category)
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: trimmed.to_string(),
                suggestion: Category::suggest(trimmed),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cashflow {
    Income,
    Expenditure,
}

impl Cashflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cashflow::Income => "Income",
            Cashflow::Expenditure => "Expenditure",
        }
    }
}

impl FromStr for Cashflow {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("income") {
            Ok(Cashflow::Income)
        } else if trimmed.eq_ignore_ascii_case("expenditure") {
            Ok(Cashflow::Expenditure)
        } else {
            Err(ValidationError::InvalidCashflow(trimmed.to_string()))
        }
    }
}

impl fmt::Display for Cashflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
