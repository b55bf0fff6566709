//! Locale-style string collation.
//!
//! Comparison happens in three passes, in the spirit of a default root
//! collation:
//!
//! 1. **Primary**: case-folded characters, with whitespace < punctuation and
//!    symbols < digits < letters.
//! 2. **Tertiary**: at the first position that differs only by case, the
//!    lowercase form sorts first.
//! 3. **Code point**: a final tiebreak so the order is total.
//!
//! So `["Bob", "alice", "Carl"]` sorts as `["alice", "Bob", "Carl"]`, and
//! `"bob"` sorts before `"Bob"`. Accented letters are not reduced to their
//! base letter; they order by code point after case folding.

use core::cmp::Ordering;

/// Compares two strings using the collation described at module level.
pub fn compare(a: &str, b: &str) -> Ordering {
    primary(a, b)
        .then_with(|| tertiary(a, b))
        .then_with(|| a.cmp(b))
}

fn primary(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return ascii_keys(a).cmp(ascii_keys(b));
    }
    unicode_keys(a).cmp(unicode_keys(b))
}

fn ascii_keys(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.bytes()
        .map(|c| char::from(c.to_ascii_lowercase()))
        .map(|c| (class(c), u32::from(c)))
}

fn unicode_keys(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| (class(c), u32::from(c)))
}

fn tertiary(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map_or(Ordering::Equal, |(x, y)| case_rank(x).cmp(&case_rank(y)))
}

const fn case_rank(c: char) -> u8 {
    if c.is_uppercase() { 1 } else { 0 }
}

fn class(c: char) -> u8 {
    if c.is_alphabetic() {
        3
    } else if c.is_numeric() {
        2
    } else if c.is_whitespace() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut words: Vec<&str>) -> Vec<&str> {
        words.sort_by(|a, b| compare(a, b));
        words
    }

    #[test]
    fn case_insensitive_primary_order() {
        assert_eq!(
            sorted(vec!["Bob", "alice", "Carl"]),
            vec!["alice", "Bob", "Carl"]
        );
    }

    #[test]
    fn lowercase_first_on_case_ties() {
        assert_eq!(compare("bob", "Bob"), Ordering::Less);
        assert_eq!(compare("Bob", "bob"), Ordering::Greater);
        assert_eq!(compare("Bob", "Bob"), Ordering::Equal);
    }

    #[test]
    fn punctuation_before_digits_before_letters() {
        assert_eq!(
            sorted(vec!["b", "1", "_x", "A"]),
            vec!["_x", "1", "A", "b"]
        );
    }

    #[test]
    fn prefixes_sort_first() {
        assert_eq!(compare("Al", "alice"), Ordering::Less);
        assert_eq!(compare("", "a"), Ordering::Less);
    }

    #[test]
    fn non_ascii_folds_case() {
        assert_eq!(compare("Émile", "émile"), Ordering::Greater);
        assert_eq!(compare("Zoë", "zoe"), Ordering::Greater);
        assert_eq!(compare("ärger", "Ärger"), Ordering::Less);
    }
}
