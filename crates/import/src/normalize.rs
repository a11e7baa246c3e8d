use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use impensa_core::{Category, CategoryId, ExpenseDraft, Money};

use crate::mapping::{ColumnMapping, Field};
use crate::resolve::resolve_category;
use crate::tokenizer::RawRow;

/// Tie-break for ambiguous `NN/NN/YYYY` dates. Month-first is the
/// deterministic default; day-first swaps only the ambiguous pattern
/// pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl DateOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            DateOrder::MonthFirst => "month-first",
            DateOrder::DayFirst => "day-first",
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month-first" => Ok(DateOrder::MonthFirst),
            "day-first" => Ok(DateOrder::DayFirst),
            other => Err(format!("unknown date order: '{other}'")),
        }
    }
}

// Ambiguous slash/dash orderings, tried right after ISO. Pattern order is
// the tie-break: "01/02/2024" resolves to whichever side comes first.
// The %y variants sit before their %Y counterparts because chrono's %Y
// happily accepts a two-digit year (as year 24), while %y fails cleanly
// on a four-digit one.
const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%y", "%m/%d/%Y", "%d/%m/%y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y",
];
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d/%m/%Y", "%m/%d/%y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y",
];

// Unambiguous forms tried last: slashed ISO and verbose month names.
const VERBOSE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Tries the explicit pattern list in order, then falls back to a generic
/// ISO-8601 parse. chrono only succeeds on real calendar dates, so a
/// pattern that merely matches the shape of an impossible date is
/// rejected. Returns `None` when everything fails.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let ambiguous = match order {
        DateOrder::MonthFirst => MONTH_FIRST_FORMATS,
        DateOrder::DayFirst => DAY_FIRST_FORMATS,
    };

    for fmt in std::iter::once(&"%Y-%m-%d")
        .chain(ambiguous.iter())
        .chain(VERBOSE_FORMATS.iter())
    {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    s.parse::<NaiveDate>().ok()
}

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Parses a raw amount string into signed money.
///
/// An accounting-style parenthesized value is a negation applied to
/// whatever the cleaned string parses to: `-5` stays −5, `(5)` is −5,
/// and the unusual `(-5)` comes out +5. Currency symbols, thousands
/// commas, and whitespace are stripped before parsing. Returns `None`
/// for anything that does not parse as a decimal number.
pub fn parse_amount(raw: &str) -> Option<Money> {
    let s = raw.trim();
    let (parenthesized, s) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };

    let cleaned: String = s
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let mut value = Decimal::from_str(&cleaned).ok()?;
    if parenthesized {
        value = -value;
    }
    Some(Money::from_decimal(value))
}

/// A candidate expense, ready for caller review. Only exists when date
/// and amount parsing both succeeded; an unresolved category does not
/// block it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category_id: Option<CategoryId>,
}

impl From<&NormalizedRow> for ExpenseDraft {
    fn from(row: &NormalizedRow) -> Self {
        ExpenseDraft {
            date: row.date,
            amount: row.amount,
            description: row.description.clone(),
            category_id: row.category_id.clone(),
        }
    }
}

/// Per-row normalization failure. A value, not an exception: batch
/// processing continues past it by construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("no column mapped for {0}")]
    Unmapped(Field),
    #[error("row has no column {index}")]
    MissingColumn { index: usize },
    #[error("unparseable date {0:?}")]
    InvalidDate(String),
    #[error("unparseable amount {0:?}")]
    InvalidAmount(String),
}

/// Normalizes one raw row against the mapping. Date and amount columns
/// must be mapped and parseable; an unmapped description yields an empty
/// string and an unmapped or unresolved category yields `None`.
pub fn normalize_row(
    row: &RawRow,
    mapping: &ColumnMapping,
    categories: &[Category],
    order: DateOrder,
) -> Result<NormalizedRow, RowError> {
    let date_column = mapping.date_column.ok_or(RowError::Unmapped(Field::Date))?;
    let amount_column = mapping
        .amount_column
        .ok_or(RowError::Unmapped(Field::Amount))?;

    let date_raw = field(row, date_column)?;
    let amount_raw = field(row, amount_column)?;

    let date =
        parse_date(date_raw, order).ok_or_else(|| RowError::InvalidDate(date_raw.to_string()))?;
    let amount =
        parse_amount(amount_raw).ok_or_else(|| RowError::InvalidAmount(amount_raw.to_string()))?;

    let description = match mapping.description_column {
        Some(column) => field(row, column)?.to_string(),
        None => String::new(),
    };

    let category_id = mapping
        .category_column
        .and_then(|column| row.fields.get(column))
        .and_then(|raw| resolve_category(raw, categories));

    Ok(NormalizedRow {
        date,
        amount,
        description,
        category_id,
    })
}

fn field(row: &RawRow, index: usize) -> Result<&str, RowError> {
    row.fields
        .get(index)
        .map(String::as_str)
        .ok_or(RowError::MissingColumn { index })
}
