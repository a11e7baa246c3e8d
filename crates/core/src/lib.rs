pub mod category;
pub mod expense;
pub mod money;

pub use category::{Category, CategoryId, DEFAULT_CATEGORIES};
pub use expense::{ExpenseDraft, ExpenseRecord, PaymentMethod};
pub use money::Money;
