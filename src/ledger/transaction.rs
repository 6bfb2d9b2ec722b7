use std::str::FromStr;

use rust_decimal::Decimal;

use super::category::{Cashflow, Category};
use crate::errors::ValidationError;

/// Stored in place of a blank name.
pub const NAME_PLACEHOLDER: &str = "-";

/// One validated income or expenditure record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    name: String,
    price: Decimal,
    category: Category,
    cashflow: Cashflow,
}

/// Unvalidated field text, in file column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransaction {
    pub name: String,
    pub price: String,
    pub category: String,
    pub cashflow: String,
}

impl RawTransaction {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
        cashflow: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category: category.into(),
            cashflow: cashflow.into(),
        }
    }
}

impl Transaction {
    /// Validates raw field text and builds a transaction.
    ///
    /// Every field is trimmed. Price is parsed as a decimal when it contains a
    /// single `.`, otherwise as an integer, and must not be negative. Category and
    /// cashflow are matched case-insensitively and stored in canonical form. A
    /// blank name becomes [`NAME_PLACEHOLDER`].
    pub fn create(
        name: &str,
        price: &str,
        category: &str,
        cashflow: &str,
    ) -> Result<Self, ValidationError> {
        let price = parse_price(price)?;
        let category = Category::from_str(category)?;
        let cashflow = Cashflow::from_str(cashflow)?;
        Ok(Self {
            name: normalize_name(name),
            price,
            category,
            cashflow,
        })
    }

    pub fn from_raw(raw: &RawTransaction) -> Result<Self, ValidationError> {
        Self::create(&raw.name, &raw.price, &raw.category, &raw.cashflow)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn cashflow(&self) -> Cashflow {
        self.cashflow
    }

    pub fn is_income(&self) -> bool {
        self.cashflow == Cashflow::Income
    }

    /// The four fields as written to a ledger file row.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.price.to_string(),
            self.category.to_string(),
            self.cashflow.to_string(),
        ]
    }
}

/// Trimmed name, or the placeholder when nothing is left.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Most digits accepted before the decimal point, ignoring leading zeros.
pub const MAX_WHOLE_DIGITS: usize = 15;
/// Most digits accepted after the decimal point.
pub const MAX_FRACTION_DIGITS: usize = 10;

/// Parses price text into an exact, non-negative amount.
///
/// Integers keep scale 0 (`27`), decimals keep the scale they were written with
/// (`50.0`), so the stored value prints back the way it was entered. Both forms
/// share the same bounds, which keep any realistic ledger total representable.
pub fn parse_price(text: &str) -> Result<Decimal, ValidationError> {
    let trimmed = text.trim();
    let invalid = || ValidationError::InvalidPrice(trimmed.to_string());

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let fraction_text = fraction.unwrap_or("");
    let well_formed = match fraction {
        None => !whole.is_empty(),
        Some(fraction) => !(whole.is_empty() && fraction.is_empty()),
    };
    if !well_formed || !digits_only(whole) || !digits_only(fraction_text) {
        return Err(invalid());
    }

    let significant = whole.trim_start_matches('0');
    if significant.len() > MAX_WHOLE_DIGITS || fraction_text.len() > MAX_FRACTION_DIGITS {
        return Err(invalid());
    }

    let whole = if significant.is_empty() { "0" } else { significant };
    let mut value = match fraction {
        None => Decimal::from_str(whole),
        Some("") => Decimal::from_str(&format!("{whole}.0")),
        Some(fraction) => Decimal::from_str(&format!("{whole}.{fraction}")),
    }
    .map_err(|_| invalid())?;

    if negative && !value.is_zero() {
        return Err(invalid());
    }
    value.set_sign_positive(true);
    Ok(value)
}
