//! Single-hunk diff between two display strings
//!
//! One host input event (keystroke, IME commit, paste) changes one contiguous
//! region, so a common-prefix/common-suffix scan is enough. Multi-hunk edits
//! collapse into one oversized hunk spanning all of them.

use std::ops::Range;

/// The one contiguous change between two strings, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hunk {
    /// First changed char (length of the common prefix).
    pub start: usize,

    /// End of the replaced region in the previous string.
    pub removed_end: usize,

    /// Text that replaces `start..removed_end`.
    pub inserted: String,
}

impl Hunk {
    /// Replaced region in previous-string coordinates.
    pub fn removed(&self) -> Range<usize> {
        self.start..self.removed_end
    }

    /// Inserted region in next-string coordinates.
    pub fn inserted_range(&self) -> Range<usize> {
        self.start..self.start + self.inserted.chars().count()
    }

    pub fn is_noop(&self) -> bool {
        self.start == self.removed_end && self.inserted.is_empty()
    }
}

/// Compute the single hunk turning `prev` into `next`.
///
/// The suffix is measured only over the parts left after the prefix, so
/// `prefix + suffix <= min(len(prev), len(next))` and the region is never
/// negative. Runs in O(len(prev) + len(next)).
///
/// # Example
///
/// ```rust
/// use mentionkit_core::edit::diff::single_hunk;
///
/// let hunk = single_hunk("hello world", "hello there world");
/// assert_eq!(hunk.start, 6);
/// assert_eq!(hunk.removed(), 6..6);
/// assert_eq!(hunk.inserted, "there ");
/// ```
pub fn single_hunk(prev: &str, next: &str) -> Hunk {
    let prev: Vec<char> = prev.chars().collect();
    let next: Vec<char> = next.chars().collect();

    let prefix = prev
        .iter()
        .zip(&next)
        .take_while(|(a, b)| a == b)
        .count();

    let suffix = prev[prefix..]
        .iter()
        .rev()
        .zip(next[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    Hunk {
        start: prefix,
        removed_end: prev.len() - suffix,
        inserted: next[prefix..next.len() - suffix].iter().collect(),
    }
}

/// Compute the single hunk, placing a pure insertion or pure deletion where
/// the host caret says it happened.
///
/// A greedy prefix scan is ambiguous around repeated chars: typing `@` in
/// front of `@Ana` looks like an insertion after the first `@`. When the
/// change is a pure insertion ending at `caret`, or a pure deletion starting
/// at `caret`, and that placement also explains `prev -> next`, it is used
/// instead. Otherwise this is [`single_hunk`].
///
/// # Example
///
/// ```rust
/// use mentionkit_core::edit::diff::{single_hunk, single_hunk_at_caret};
///
/// assert_eq!(single_hunk("x@Ana", "x@@Ana").start, 2);
/// assert_eq!(single_hunk_at_caret("x@Ana", "x@@Ana", 2).start, 1);
/// ```
pub fn single_hunk_at_caret(prev: &str, next: &str, caret: usize) -> Hunk {
    let hunk = single_hunk(prev, next);
    let inserted = hunk.inserted.chars().count();
    let removed = hunk.removed_end - hunk.start;

    let start = match (removed, inserted) {
        (0, 0) => return hunk,
        (0, inserted) if caret >= inserted => caret - inserted,
        (_, 0) => caret,
        _ => return hunk,
    };
    if start >= hunk.start {
        return hunk;
    }

    let prev_chars: Vec<char> = prev.chars().collect();
    let next_chars: Vec<char> = next.chars().collect();
    let (prev_tail, next_tail) = (start + removed, start + inserted);
    if prev_tail > prev_chars.len() || next_tail > next_chars.len() {
        return hunk;
    }

    let fits = prev_chars[..start] == next_chars[..start]
        && prev_chars[prev_tail..] == next_chars[next_tail..];
    if !fits {
        return hunk;
    }

    Hunk {
        start,
        removed_end: prev_tail,
        inserted: next_chars[start..next_tail].iter().collect(),
    }
}
