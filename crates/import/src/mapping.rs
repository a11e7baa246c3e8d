use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Semantic fields the mapper tries to locate in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Amount,
    Description,
    Category,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Date => write!(f, "date"),
            Field::Amount => write!(f, "amount"),
            Field::Description => write!(f, "description"),
            Field::Category => write!(f, "category"),
        }
    }
}

// Ordered by priority: the first synonym with a header hit wins, so the
// generic name must precede the bank-specific ones ("amount" before
// "debit").
const DATE_SYNONYMS: &[&str] = &[
    "date",
    "transaction date",
    "posted date",
    "post date",
    "trans date",
    "booking date",
    "value date",
];

const AMOUNT_SYNONYMS: &[&str] = &[
    "amount",
    "transaction amount",
    "debit",
    "value",
    "sum",
    "total",
    "charge",
];

const DESCRIPTION_SYNONYMS: &[&str] = &[
    "description",
    "payee",
    "merchant",
    "name",
    "memo",
    "details",
    "narrative",
    "reference",
];

const CATEGORY_SYNONYMS: &[&str] = &["category", "type", "classification", "group"];

/// Advisory assignment of semantic fields to header columns. `None` means
/// no column could be inferred; the caller must override before that field
/// can be normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date_column: Option<usize>,
    pub amount_column: Option<usize>,
    pub description_column: Option<usize>,
    pub category_column: Option<usize>,
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{field} column {index} is out of range for a {width}-column header")]
    OutOfRange {
        field: Field,
        index: usize,
        width: usize,
    },
}

impl ColumnMapping {
    /// Guesses the mapping from header names. Deterministic: the same
    /// header always yields the same mapping.
    pub fn infer(header: &[String]) -> Self {
        let lowered: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        ColumnMapping {
            date_column: find_column(&lowered, DATE_SYNONYMS),
            amount_column: find_column(&lowered, AMOUNT_SYNONYMS),
            description_column: find_column(&lowered, DESCRIPTION_SYNONYMS),
            category_column: find_column(&lowered, CATEGORY_SYNONYMS),
        }
    }

    /// Checks that every mapped index falls inside a `width`-column header.
    /// Inferred mappings always pass; manual overrides go through here.
    pub fn validate(&self, width: usize) -> Result<(), MappingError> {
        let assignments = [
            (Field::Date, self.date_column),
            (Field::Amount, self.amount_column),
            (Field::Description, self.description_column),
            (Field::Category, self.category_column),
        ];
        for (field, column) in assignments {
            if let Some(index) = column {
                if index >= width {
                    return Err(MappingError::OutOfRange {
                        field,
                        index,
                        width,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Single generic lookup shared by all four fields: first synonym that
/// matches a header cell (case-insensitive, trimmed, exact) wins.
fn find_column(lowered_header: &[String], synonyms: &[&str]) -> Option<usize> {
    synonyms
        .iter()
        .find_map(|syn| lowered_header.iter().position(|h| h == syn))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_common_bank_header() {
        let m = ColumnMapping::infer(&header(&["Date", "Description", "Amount", "Category"]));
        assert_eq!(m.date_column, Some(0));
        assert_eq!(m.description_column, Some(1));
        assert_eq!(m.amount_column, Some(2));
        assert_eq!(m.category_column, Some(3));
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let m = ColumnMapping::infer(&header(&[" TRANSACTION DATE ", "PAYEE", "amount"]));
        assert_eq!(m.date_column, Some(0));
        assert_eq!(m.description_column, Some(1));
        assert_eq!(m.amount_column, Some(2));
    }

    #[test]
    fn generic_amount_outranks_debit() {
        let m = ColumnMapping::infer(&header(&["Date", "Debit", "Amount"]));
        assert_eq!(m.amount_column, Some(2));
    }

    #[test]
    fn debit_maps_when_amount_is_absent() {
        let m = ColumnMapping::infer(&header(&["Date", "Debit", "Payee"]));
        assert_eq!(m.amount_column, Some(1));
    }

    #[test]
    fn unknown_headers_stay_unmapped() {
        let m = ColumnMapping::infer(&header(&["Foo", "Bar", "Baz"]));
        assert_eq!(m, ColumnMapping::default());
    }

    #[test]
    fn inference_is_idempotent() {
        let h = header(&["Posted Date", "Merchant", "Charge", "Type"]);
        assert_eq!(ColumnMapping::infer(&h), ColumnMapping::infer(&h));
    }

    #[test]
    fn validate_accepts_in_bounds_overrides() {
        let m = ColumnMapping {
            date_column: Some(0),
            amount_column: Some(3),
            description_column: None,
            category_column: None,
        };
        assert!(m.validate(4).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_bounds_override() {
        let m = ColumnMapping {
            date_column: Some(4),
            ..ColumnMapping::default()
        };
        let err = m.validate(4).unwrap_err();
        assert!(matches!(
            err,
            MappingError::OutOfRange {
                field: Field::Date,
                index: 4,
                width: 4
            }
        ));
    }

    #[test]
    fn inferred_mapping_is_always_in_bounds() {
        let h = header(&["Date", "Amount"]);
        let m = ColumnMapping::infer(&h);
        assert!(m.validate(h.len()).is_ok());
    }
}
