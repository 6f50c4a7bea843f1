//! Line-start index utilities.
//!
//! Every piece of the [`TextBuffer`](crate::buffer::TextBuffer) carries a
//! sorted list of *line starts*: byte offsets, relative to the piece, of the
//! first byte after each line break inside it. The helpers here are the only
//! place that decides which side of a cut a line start falls on, so all the
//! "inclusive vs exclusive" reasoning lives in one file:
//!
//! - A line start equal to the cut point belongs to the **left** half. The
//!   break that produced it ends exactly at the cut, so it is fully contained
//!   in the left fragment.
//! - Line starts strictly past the cut belong to the **right** half and are
//!   re-based so they stay relative to the right fragment's first byte.
//!
//! Line breaks are `\n`, `\r\n` and a lone `\r`. A `\r\n` pair is one break.

use crate::position::Position;

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Byte offsets of the first byte after every line break in `text`.
///
/// ```text
/// "ab\ncd\r\nef\r"  →  [3, 7, 10]
/// ```
#[must_use]
pub fn line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => starts.push(i + 1),
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                starts.push(i + 1);
            }
            _ => {}
        }
        i += 1;
    }

    starts
}

/// Width in bytes of the line break that ends right before `line_start`.
///
/// `text` is the slice the line start is relative to; `line_start` must be a
/// value produced by [`line_starts`] for that slice, so it is at least 1.
#[must_use]
pub fn terminator_len(text: &str, line_start: usize) -> usize {
    let bytes = text.as_bytes();
    if line_start >= 2 && bytes[line_start - 1] == b'\n' && bytes[line_start - 2] == b'\r' {
        2
    } else {
        1
    }
}

/// The `(line, column)` just past the end of `text` read as a standalone
/// document.
///
/// ```text
/// ""          →  (1, 1)
/// "hello"     →  (1, 6)
/// "hi\nthere" →  (2, 6)
/// "hi\n"      →  (2, 1)
/// ```
#[must_use]
pub fn last_position(text: &str) -> Position {
    let starts = line_starts(text);
    let tail = starts.last().map_or(text, |&last| &text[last..]);
    Position::new(starts.len() + 1, tail.chars().count() + 1)
}

// ---------------------------------------------------------------------------
// Searching and splitting
// ---------------------------------------------------------------------------

/// Index of the first element of `starts` that is strictly greater than
/// `target`.
///
/// Returns 0 for an empty slice or when `target` is below every element, and
/// `starts.len()` when `target` is at or above every element. `starts` must be
/// strictly increasing.
#[inline]
#[must_use]
pub fn locate(starts: &[usize], target: usize) -> usize {
    starts.partition_point(|&start| start <= target)
}

/// The line starts that stay with a left fragment of length `cut`.
#[inline]
#[must_use]
pub fn prefix_up_to(starts: &[usize], cut: usize) -> &[usize] {
    &starts[..locate(starts, cut)]
}

/// The line starts that move to a right fragment beginning at `cut`,
/// re-based to that fragment.
#[must_use]
pub fn suffix_from(starts: &[usize], cut: usize) -> Vec<usize> {
    starts[locate(starts, cut)..]
        .iter()
        .map(|&start| start - cut)
        .collect()
}

/// Partition `starts` around `cut` into the left fragment's list and the
/// re-based right fragment's list.
#[must_use]
pub fn split_at(starts: &[usize], cut: usize) -> (Vec<usize>, Vec<usize>) {
    (prefix_up_to(starts, cut).to_vec(), suffix_from(starts, cut))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- line_starts --------------------------------------------------------

    #[test]
    fn line_starts_empty() {
        assert!(line_starts("").is_empty());
    }

    #[test]
    fn line_starts_no_breaks() {
        assert!(line_starts("hello").is_empty());
    }

    #[test]
    fn line_starts_lf() {
        assert_eq!(line_starts("a\nb\n"), vec![2, 4]);
    }

    #[test]
    fn line_starts_crlf_is_one_break() {
        assert_eq!(line_starts("a\r\nb"), vec![3]);
    }

    #[test]
    fn line_starts_lone_cr() {
        assert_eq!(line_starts("a\rb"), vec![2]);
    }

    #[test]
    fn line_starts_mixed() {
        assert_eq!(line_starts("ab\ncd\r\nef\r"), vec![3, 7, 10]);
    }

    #[test]
    fn line_starts_consecutive_breaks() {
        assert_eq!(line_starts("\n\r\n\r"), vec![1, 3, 4]);
    }

    #[test]
    fn line_starts_are_byte_offsets() {
        // 'é' is two bytes.
        assert_eq!(line_starts("é\nx"), vec![3]);
    }

    // -- terminator_len -----------------------------------------------------

    #[test]
    fn terminator_len_widths() {
        let text = "a\nb\r\nc\rd";
        let starts = line_starts(text);
        let widths: Vec<usize> = starts.iter().map(|&s| terminator_len(text, s)).collect();
        assert_eq!(widths, vec![1, 2, 1]);
    }

    #[test]
    fn terminator_len_at_slice_start() {
        assert_eq!(terminator_len("\nabc", 1), 1);
    }

    // -- last_position ------------------------------------------------------

    #[test]
    fn last_position_empty() {
        assert_eq!(last_position(""), Position::new(1, 1));
    }

    #[test]
    fn last_position_single_line() {
        assert_eq!(last_position("hello"), Position::new(1, 6));
    }

    #[test]
    fn last_position_multi_line() {
        assert_eq!(last_position("hi\nthere"), Position::new(2, 6));
    }

    #[test]
    fn last_position_trailing_break() {
        assert_eq!(last_position("hi\n"), Position::new(2, 1));
        assert_eq!(last_position("hi\r\n"), Position::new(2, 1));
    }

    #[test]
    fn last_position_counts_chars() {
        assert_eq!(last_position("x\ncafé"), Position::new(2, 5));
    }

    // -- locate -------------------------------------------------------------

    #[test]
    fn locate_empty() {
        assert_eq!(locate(&[], 5), 0);
    }

    #[test]
    fn locate_below_all() {
        assert_eq!(locate(&[3, 6, 9], 0), 0);
    }

    #[test]
    fn locate_above_all() {
        assert_eq!(locate(&[3, 6, 9], 20), 3);
    }

    #[test]
    fn locate_exact_match_goes_past() {
        assert_eq!(locate(&[3, 6, 9], 6), 2);
    }

    #[test]
    fn locate_between() {
        assert_eq!(locate(&[3, 6, 9], 7), 2);
        assert_eq!(locate(&[3, 6, 9], 4), 1);
    }

    #[test]
    fn locate_single() {
        assert_eq!(locate(&[4], 3), 0);
        assert_eq!(locate(&[4], 4), 1);
    }

    // -- split ----------------------------------------------------------------

    #[test]
    fn split_at_middle() {
        assert_eq!(split_at(&[2, 5, 8], 4), (vec![2], vec![1, 4]));
    }

    #[test]
    fn split_at_line_start_stays_left() {
        assert_eq!(split_at(&[2, 5, 8], 5), (vec![2, 5], vec![3]));
    }

    #[test]
    fn split_at_zero() {
        assert_eq!(split_at(&[2, 5], 0), (vec![], vec![2, 5]));
    }

    #[test]
    fn split_at_end() {
        assert_eq!(split_at(&[2, 5], 5), (vec![2, 5], vec![]));
    }

    #[test]
    fn prefix_and_suffix_agree_with_split() {
        let starts = [1, 4, 7, 10];
        for cut in 0..=11 {
            let (left, right) = split_at(&starts, cut);
            assert_eq!(left, prefix_up_to(&starts, cut));
            assert_eq!(right, suffix_from(&starts, cut));
            assert_eq!(left.len() + right.len(), starts.len());
        }
    }
}
