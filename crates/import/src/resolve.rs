use impensa_core::{Category, CategoryId};

/// Matches a raw category string against the caller's category list.
///
/// Exact match after trimming and case-folding both sides — no fuzzy or
/// partial matching. Blank input resolves to `None` without scanning the
/// list. The list is never mutated.
pub fn resolve_category(raw: &str, categories: &[Category]) -> Option<CategoryId> {
    let needle = raw.trim();
    if needle.is_empty() {
        return None;
    }
    let needle = needle.to_lowercase();
    categories
        .iter()
        .find(|c| c.name.trim().to_lowercase() == needle)
        .map(|c| c.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::from("c1"),
                name: "Food".to_string(),
            },
            Category {
                id: CategoryId::from("c2"),
                name: "Bills & Utilities".to_string(),
            },
        ]
    }

    #[test]
    fn matches_ignoring_case_and_whitespace() {
        assert_eq!(
            resolve_category(" food ", &known()),
            Some(CategoryId::from("c1"))
        );
        assert_eq!(
            resolve_category("BILLS & UTILITIES", &known()),
            Some(CategoryId::from("c2"))
        );
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(resolve_category("Transport", &known()), None);
    }

    #[test]
    fn no_partial_matching() {
        assert_eq!(resolve_category("Foo", &known()), None);
        assert_eq!(resolve_category("Food Court", &known()), None);
    }

    #[test]
    fn blank_input_is_none() {
        assert_eq!(resolve_category("", &known()), None);
        assert_eq!(resolve_category("   ", &known()), None);
    }
}
