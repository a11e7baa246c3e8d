use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn generate() -> Self {
        CategoryId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        CategoryId(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Category {
            id: CategoryId::generate(),
            name: name.to_string(),
        }
    }
}

/// Seeded on first run; users add their own on top.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Groceries",
    "Transport",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Health",
    "Travel",
    "Education",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(CategoryId::generate(), CategoryId::generate());
    }

    #[test]
    fn new_category_carries_name() {
        let c = Category::new("Groceries");
        assert_eq!(c.name, "Groceries");
        assert!(!c.id.as_str().is_empty());
    }
}
