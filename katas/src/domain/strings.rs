//! Arrays and strings exercises.
//!
//! Character-level checks work on `char`s; the in-place URL encoder works on
//! raw bytes because it has to reuse the slack at the end of its buffer.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Replacement for a single space when URL-encoding.
pub const SPACE_CODE: &str = "%20";

/// Returns true if no character occurs twice. Uses a hash set.
#[instrument(level = "debug")]
pub fn is_unique(s: &str) -> bool {
    let mut seen = HashSet::with_capacity(s.len());
    s.chars().all(|c| seen.insert(c))
}

/// Same answer as [`is_unique`] without allocating.
///
/// ASCII input is checked against a 128-bit set. Anything else falls back to
/// comparing every pair, O(n^2) but still allocation free.
#[instrument(level = "debug")]
pub fn is_unique_without_storage(s: &str) -> bool {
    if s.is_ascii() {
        let mut seen: u128 = 0;
        for b in s.bytes() {
            let bit = 1u128 << b;
            if seen & bit != 0 {
                return false;
            }
            seen |= bit;
        }
        return true;
    }

    for (i, a) in s.char_indices() {
        let rest = &s[i + a.len_utf8()..];
        if rest.chars().any(|b| b == a) {
            return false;
        }
    }
    true
}

/// Two strings are permutations of each other when their character frequency
/// tables are identical.
#[instrument(level = "debug")]
pub fn check_permutation(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut counts: HashMap<char, isize> = HashMap::new();
    for c in a.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    for c in b.chars() {
        let entry = counts.entry(c).or_insert(0);
        *entry -= 1;
        if *entry < 0 {
            return false;
        }
    }
    counts.values().all(|&n| n == 0)
}

/// Replaces every space with `%20`.
#[instrument(level = "debug")]
pub fn urlify(s: &str) -> String {
    let spaces = s.bytes().filter(|&b| b == b' ').count();
    let mut out = String::with_capacity(s.len() + spaces * (SPACE_CODE.len() - 1));
    for c in s.chars() {
        if c == ' ' {
            out.push_str(SPACE_CODE);
        } else {
            out.push(c);
        }
    }
    out
}

/// In-place URL encoding of the first `true_len` bytes of `buf`.
///
/// The buffer must carry enough slack after `true_len` to hold the expanded
/// text. The result is written from the back so nothing is overwritten before
/// it has been moved. Returns the encoded length.
#[instrument(level = "debug", skip(buf))]
pub fn urlify_in_place(buf: &mut [u8], true_len: usize) -> DomainResult<usize> {
    if true_len > buf.len() {
        return Err(DomainError::InvalidLength {
            true_len,
            buffer_len: buf.len(),
        });
    }

    let spaces = buf[..true_len].iter().filter(|&&b| b == b' ').count();
    let needed = true_len + spaces * (SPACE_CODE.len() - 1);
    if needed > buf.len() {
        return Err(DomainError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }

    let code = SPACE_CODE.as_bytes();
    let mut write = needed;
    for read in (0..true_len).rev() {
        if buf[read] == b' ' {
            write -= code.len();
            buf[write..write + code.len()].copy_from_slice(code);
        } else {
            write -= 1;
            buf[write] = buf[read];
        }
    }
    trace!(true_len, needed, "urlified in place");
    Ok(needed)
}

/// Returns true if some permutation of `s` reads the same both ways.
///
/// Whitespace is ignored and letters compare case-insensitively. Fewer than
/// two significant characters never counts as a palindrome.
#[instrument(level = "debug")]
pub fn is_permutation_of_palindrome(s: &str) -> bool {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars().filter(|c| !c.is_whitespace()) {
        for lower in c.to_lowercase() {
            *counts.entry(lower).or_insert(0) += 1;
            total += 1;
        }
    }

    if total < 2 {
        return false;
    }

    counts.values().filter(|&&n| n % 2 == 1).count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("abcdefg", true)]
    #[case("abcdafg", false)]
    #[case("aaaaaaa", false)]
    #[case("héllo", false)]
    #[case("hélo", true)]
    fn given_string_when_checking_uniqueness_then_both_variants_agree(
        #[case] input: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_unique(input), expected);
        assert_eq!(is_unique_without_storage(input), expected);
    }

    #[test]
    fn given_accents_sharing_lead_byte_when_checking_without_storage_then_unique() {
        // 'é' and 'è' both start with 0xC3 in UTF-8
        assert!(is_unique_without_storage("éè"));
    }

    #[test]
    fn given_buffer_with_slack_when_urlify_in_place_then_encodes_from_back() {
        let mut buf = b"Mr John Smith    ".to_vec();
        let len = urlify_in_place(&mut buf, 13).unwrap();
        assert_eq!(&buf[..len], b"Mr%20John%20Smith");
    }

    #[test]
    fn given_no_slack_when_urlify_in_place_then_buffer_too_small() {
        let mut buf = b"a b".to_vec();
        let err = urlify_in_place(&mut buf, 3).unwrap_err();
        assert_eq!(
            err,
            DomainError::BufferTooSmall {
                needed: 5,
                available: 3
            }
        );
    }
}
