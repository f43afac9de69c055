//! Data model for combobox choices and selections.

pub mod selection;

/// A selectable item with a stable identity and a display label.
///
/// Equality is deep value equality: two `Choice` values denote the same
/// choice when their fields match, regardless of where they were allocated.
/// Every membership check in the selection and navigation code relies on
/// this, never on pointer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Stable identity of the choice.
    pub id: String,
    /// The text shown for this choice.
    pub label: String,
}

impl Choice {
    /// Create a new choice.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_equality_is_by_value() {
        let a = Choice::new("1", "Apple");
        let b = Choice::new("1", "Apple");
        let c = Choice::new("2", "Apple");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, a.clone());
    }
}
