// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option matching: which options a query selects, and where it matched.
//!
//! ## Rules
//!
//! - A blank query (empty or whitespace only) matches every option, in order.
//! - A query containing whitespace matches options whose text starts with the
//!   query.
//! - A single-token query matches options where any *word* of the text starts
//!   with the query. Words are separated by any character that is not an ASCII
//!   letter, an ASCII digit, or `.`. A query may also start right after a `.`
//!   inside a word, so `1.Two` is found by both `1.t` and `two`.
//!
//! Comparison folds ASCII case only. Non-ASCII bytes must match exactly.
//!
//! ```
//! use understory_combobox::ComboOption;
//! use understory_combobox::matcher::{filter_options, first_match};
//!
//! let options = [
//!     ComboOption::new("1", "Bravo-1.Two"),
//!     ComboOption::new("2", "Charlie"),
//! ];
//!
//! assert_eq!(filter_options(&options, "two").len(), 1);
//! assert!(filter_options(&options, "avo").is_empty());
//! assert_eq!(first_match(&options, "CHAR").map(|o| o.key.as_str()), Some("2"));
//! ```

use alloc::vec::Vec;
use core::ops::Range;

use crate::ComboOption;

/// Returns `true` if `s` is empty or consists only of whitespace.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// ASCII case-insensitive prefix test.
#[must_use]
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Returns `true` if any word of `text` starts with `query`.
///
/// An empty query never matches here; blank queries are handled by [`matches`].
#[must_use]
pub fn any_word_starts_with(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    text.split(|c: char| !is_word_char(c)).any(|word| {
        starts_with_ignore_case(word, query)
            || word
                .match_indices('.')
                .any(|(i, _)| starts_with_ignore_case(&word[i + 1..], query))
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.'
}

/// Returns `true` if an option with `text` is selected by `query`.
#[must_use]
pub fn matches(text: &str, query: &str) -> bool {
    if is_blank(query) {
        return true;
    }
    if query.chars().any(char::is_whitespace) {
        starts_with_ignore_case(text, query)
    } else {
        any_word_starts_with(text, query)
    }
}

/// Filter `options` by `query`, preserving order.
///
/// A blank query returns every option.
#[must_use]
pub fn filter_options<'a>(options: &'a [ComboOption], query: &str) -> Vec<&'a ComboOption> {
    options.iter().filter(|o| matches(&o.text, query)).collect()
}

/// The first option selected by `query`, if any.
#[must_use]
pub fn first_match<'a>(options: &'a [ComboOption], query: &str) -> Option<&'a ComboOption> {
    options.iter().find(|o| matches(&o.text, query))
}

/// Byte range of the first ASCII case-insensitive occurrence of `needle` in `text`.
///
/// Returns `None` for an empty needle or when there is no occurrence.
#[must_use]
pub fn find_ignore_case(text: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() || needle.len() > text.len() {
        return None;
    }
    let hay = text.as_bytes();
    let pat = needle.as_bytes();
    (0..=hay.len() - pat.len())
        .filter(|&i| text.is_char_boundary(i) && text.is_char_boundary(i + pat.len()))
        .find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
        .map(|i| i..i + pat.len())
}

/// Number of characters in the first `bytes` bytes of `text`.
///
/// Falls back to `0` when `bytes` does not land on a character boundary.
#[must_use]
pub fn char_offset(text: &str, bytes: usize) -> usize {
    text.get(..bytes).map_or(0, |head| head.chars().count())
}
