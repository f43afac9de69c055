//! Index navigation over the option menu and the pill strip.
//!
//! Both "navigators" are the same computation with a different wrap policy:
//! menu navigation clamps at the ends, pill navigation wraps around.

/// Sentinel index meaning "no item is active".
pub const NO_INDEX: i32 = -1;

/// What happens when a navigation step would leave the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWrap {
    /// Out-of-range steps are no-ops; the current index is kept.
    Clamp,
    /// Steps past either end land on the opposite end.
    Wrap,
}

/// Compute the index reached by moving `offset` steps from `current` within
/// a sequence of `len` items.
///
/// With `len == 0` there is no valid target and `current` is returned
/// unchanged. Otherwise the result is always within `[0, len)`:
///
/// - [`IndexWrap::Clamp`]: a candidate outside the range keeps `current`.
/// - [`IndexWrap::Wrap`]: below zero lands on `len - 1`, at or past `len`
///   lands on `0`.
pub fn next_index(current: i32, offset: i32, len: usize, wrap: IndexWrap) -> i32 {
    if len == 0 {
        return current;
    }
    let len = len as i32;
    let candidate = current + offset;

    match wrap {
        IndexWrap::Clamp => {
            if candidate < 0 || candidate >= len {
                current
            } else {
                candidate
            }
        }
        IndexWrap::Wrap => {
            if candidate < 0 {
                len - 1
            } else if candidate >= len {
                0
            } else {
                candidate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_keeps_current() {
        assert_eq!(next_index(NO_INDEX, 1, 0, IndexWrap::Clamp), NO_INDEX);
        assert_eq!(next_index(5, -1, 0, IndexWrap::Wrap), 5);
    }

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(next_index(0, 1, 3, IndexWrap::Clamp), 1);
        assert_eq!(next_index(2, -1, 3, IndexWrap::Clamp), 1);
        // First step down from "nothing active" lands on the first item.
        assert_eq!(next_index(NO_INDEX, 1, 3, IndexWrap::Clamp), 0);
    }

    #[test]
    fn test_clamp_at_edges_is_noop() {
        assert_eq!(next_index(2, 1, 3, IndexWrap::Clamp), 2);
        assert_eq!(next_index(0, -1, 3, IndexWrap::Clamp), 0);
        assert_eq!(next_index(NO_INDEX, -1, 3, IndexWrap::Clamp), NO_INDEX);
        assert_eq!(next_index(1, 10, 3, IndexWrap::Clamp), 1);
    }

    #[test]
    fn test_wrap_at_edges() {
        assert_eq!(next_index(2, 1, 3, IndexWrap::Wrap), 0);
        assert_eq!(next_index(0, -1, 3, IndexWrap::Wrap), 2);
        assert_eq!(next_index(1, 1, 3, IndexWrap::Wrap), 2);
        assert_eq!(next_index(1, -1, 3, IndexWrap::Wrap), 0);
    }

    #[test]
    fn test_result_always_in_range() {
        for len in 1..6usize {
            for current in -1..len as i32 {
                for offset in [-2, -1, 1, 2] {
                    for wrap in [IndexWrap::Clamp, IndexWrap::Wrap] {
                        let next = next_index(current, offset, len, wrap);
                        let in_range = next >= 0 && next < len as i32;
                        // Clamp may keep an out-of-range current (e.g. -1).
                        assert!(
                            in_range || next == current,
                            "current={current} offset={offset} len={len} wrap={wrap:?} -> {next}"
                        );
                    }
                }
            }
        }
    }
}
