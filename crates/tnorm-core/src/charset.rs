// Finite character sets with union and difference.

use std::collections::BTreeSet;

/// A finite, ordered set of characters.
///
/// Character classes ("digits", "punctuation", "any character except
/// whitespace") are built from these and turned into one-arc-per-character
/// acceptors by the transducer engine. Iteration order is ascending code
/// point, so acceptors built from equal sets are identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from the characters of a string.
    pub fn from_chars(s: &str) -> Self {
        s.chars().collect()
    }

    /// Create a set holding every character in an inclusive range.
    pub fn from_range(first: char, last: char) -> Self {
        (first..=last).collect()
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(c);
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Iterate the characters in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Set union.
    pub fn union(&self, other: &CharSet) -> CharSet {
        CharSet {
            chars: self.chars.union(&other.chars).copied().collect(),
        }
    }

    /// Set difference: characters of `self` not in `other`.
    pub fn difference(&self, other: &CharSet) -> CharSet {
        CharSet {
            chars: self.chars.difference(&other.chars).copied().collect(),
        }
    }

    /// Keep only the characters matching `pred`.
    pub fn filter(&self, pred: impl Fn(char) -> bool) -> CharSet {
        self.iter().filter(|&c| pred(c)).collect()
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        CharSet {
            chars: iter.into_iter().collect(),
        }
    }
}

impl Extend<char> for CharSet {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        self.chars.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_difference() {
        let digits = CharSet::from_range('0', '9');
        let odd = CharSet::from_chars("13579");
        let even = digits.difference(&odd);
        assert_eq!(even.len(), 5);
        assert!(even.contains('4'));
        assert!(!even.contains('5'));
        assert_eq!(even.union(&odd), digits);
    }

    #[test]
    fn iteration_is_ordered() {
        let set = CharSet::from_chars("cab");
        let collected: String = set.iter().collect();
        assert_eq!(collected, "abc");
    }

    #[test]
    fn filter_keeps_matching_characters() {
        let set = CharSet::from_chars("a1b2");
        assert_eq!(set.filter(|c| c.is_ascii_digit()), CharSet::from_chars("12"));
    }
}
