//! Selection mutation semantics.
//!
//! The selection is an ordered sequence of [`Choice`] values; order matters
//! because pills are rendered and navigated in selection order. All
//! membership tests are by value equality.

use super::Choice;

/// Check whether `candidate` is part of `selection`, by value equality.
pub fn is_selected(selection: &[Choice], candidate: &Choice) -> bool {
    selection.contains(candidate)
}

/// Compute the selection that results from committing `candidate`.
///
/// - Single mode, candidate not selected: the candidate replaces the whole
///   selection.
/// - Multiple mode, candidate not selected: the candidate is appended,
///   preserving existing order.
/// - Candidate already selected (either mode): the value-equal entry is
///   removed (toggle-off), everything else keeps its order.
pub fn reduce_selection(selection: &[Choice], candidate: &Choice, multiple: bool) -> Vec<Choice> {
    if is_selected(selection, candidate) {
        return selection
            .iter()
            .filter(|&choice| choice != candidate)
            .cloned()
            .collect();
    }

    if multiple {
        let mut next = selection.to_vec();
        next.push(candidate.clone());
        next
    } else {
        vec![candidate.clone()]
    }
}

/// The selection with the entry at `index` removed.
///
/// Returns `None` when `index` is out of bounds; removal of a pill that no
/// longer exists is a no-op for the caller.
pub fn without_index(selection: &[Choice], index: usize) -> Option<Vec<Choice>> {
    if index >= selection.len() {
        return None;
    }
    let mut next = selection.to_vec();
    next.remove(index);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Choice> {
        vec![
            Choice::new("a", "Apple"),
            Choice::new("b", "Banana"),
            Choice::new("c", "Cherry"),
        ]
    }

    #[test]
    fn test_single_mode_replaces() {
        let selection = abc();
        let candidate = Choice::new("d", "Date");

        let next = reduce_selection(&selection, &candidate, false);
        assert_eq!(next, vec![candidate]);
    }

    #[test]
    fn test_multiple_mode_appends_preserving_order() {
        let selection = abc();
        let candidate = Choice::new("d", "Date");

        let next = reduce_selection(&selection, &candidate, true);
        assert_eq!(next.len(), 4);
        assert_eq!(&next[..3], &abc()[..]);
        assert_eq!(next[3], candidate);
    }

    #[test]
    fn test_already_selected_toggles_off_in_both_modes() {
        let selection = abc();
        let candidate = Choice::new("b", "Banana");

        for multiple in [false, true] {
            let next = reduce_selection(&selection, &candidate, multiple);
            assert_eq!(
                next,
                vec![Choice::new("a", "Apple"), Choice::new("c", "Cherry")],
                "multiple={multiple}"
            );
        }
    }

    #[test]
    fn test_membership_is_by_value_not_identity() {
        let selection = abc();
        // A freshly built value-equal candidate counts as selected.
        let candidate = Choice::new("a", "Apple");
        assert!(is_selected(&selection, &candidate));

        let next = reduce_selection(&selection, &candidate, true);
        assert!(!is_selected(&next, &candidate));
    }

    #[test]
    fn test_empty_selection() {
        let candidate = Choice::new("a", "Apple");

        assert!(!is_selected(&[], &candidate));
        assert_eq!(reduce_selection(&[], &candidate, false), vec![candidate.clone()]);
        assert_eq!(reduce_selection(&[], &candidate, true), vec![candidate]);
    }

    #[test]
    fn test_without_index() {
        let selection = abc();

        let next = without_index(&selection, 1).unwrap();
        assert_eq!(next, vec![Choice::new("a", "Apple"), Choice::new("c", "Cherry")]);

        assert!(without_index(&selection, 3).is_none());
        assert!(without_index(&[], 0).is_none());
    }
}
