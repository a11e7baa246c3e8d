use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::category::CategoryId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    BankTransfer,
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

/// The fields an import (or manual entry) supplies before the record is
/// stamped with an id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub description: String,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Stamps a draft with a fresh id and the supplied instant. Batch
    /// imports pass one instant for every row so the whole batch shares
    /// its creation timestamp.
    pub fn from_draft(draft: ExpenseDraft, at: DateTime<Utc>) -> Self {
        ExpenseRecord {
            id: Uuid::new_v4(),
            amount: draft.amount,
            category_id: draft.category_id,
            description: draft.description,
            date: draft.date,
            payment_method: PaymentMethod::default(),
            note: None,
            created_at: at,
            updated_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: Money::from_cents(4999),
            description: "AMAZON".to_string(),
            category_id: Some(CategoryId::from("c1")),
        }
    }

    #[test]
    fn from_draft_stamps_shared_instant() {
        let at = Utc::now();
        let rec = ExpenseRecord::from_draft(draft(), at);
        assert_eq!(rec.created_at, at);
        assert_eq!(rec.updated_at, at);
        assert_eq!(rec.payment_method, PaymentMethod::Card);
        assert!(rec.note.is_none());
    }

    #[test]
    fn from_draft_generates_distinct_ids() {
        let at = Utc::now();
        let a = ExpenseRecord::from_draft(draft(), at);
        let b = ExpenseRecord::from_draft(draft(), at);
        assert_ne!(a.id, b.id);
    }
}
