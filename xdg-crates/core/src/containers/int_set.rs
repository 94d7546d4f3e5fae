use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

const WORD_BITS: u32 = u64::BITS;

/// A finite set of non-negative integers stored as a bitset.
///
/// The representation is kept normalised (no trailing zero words), so structural equality is set
/// equality and the set can be used as a hash key.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IntSet {
    words: Vec<u64>,
}

impl IntSet {
    pub fn new() -> IntSet {
        IntSet::default()
    }

    pub fn singleton(value: u32) -> IntSet {
        let mut set = IntSet::new();
        let _ = set.insert(value);
        set
    }

    /// The half-open interval `[start, end)`.
    pub fn range(start: u32, end: u32) -> IntSet {
        let mut set = IntSet::new();
        if start >= end {
            return set;
        }

        let last_word = ((end - 1) / WORD_BITS) as usize;
        set.words = vec![0; last_word + 1];
        for (index, word) in set.words.iter_mut().enumerate() {
            let word_start = index as u32 * WORD_BITS;
            let low = start.saturating_sub(word_start).min(WORD_BITS);
            let high = (end - word_start.min(end)).min(WORD_BITS);
            if low < high {
                *word = mask_below(high) & !mask_below(low);
            }
        }
        set.normalise();
        set
    }

    pub fn insert(&mut self, value: u32) -> bool {
        let (word, bit) = position(value);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let was_present = self.words[word] & bit != 0;
        self.words[word] |= bit;
        !was_present
    }

    pub fn remove(&mut self, value: u32) -> bool {
        let (word, bit) = position(value);
        if word >= self.words.len() || self.words[word] & bit == 0 {
            return false;
        }
        self.words[word] &= !bit;
        self.normalise();
        true
    }

    pub fn contains(&self, value: u32) -> bool {
        let (word, bit) = position(value);
        self.words.get(word).is_some_and(|w| w & bit != 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn min(&self) -> Option<u32> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(index, word)| index as u32 * WORD_BITS + word.trailing_zeros())
    }

    pub fn max(&self) -> Option<u32> {
        // Normalised, so the last word is non-zero.
        self.words.last().map(|word| {
            (self.words.len() as u32 - 1) * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros())
        })
    }

    /// The only element of a singleton set.
    pub fn single(&self) -> Option<u32> {
        if self.len() == 1 {
            self.min()
        } else {
            None
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    pub fn is_subset(&self, other: &IntSet) -> bool {
        self.words.len() <= other.words.len()
            && self
                .words
                .iter()
                .zip(&other.words)
                .all(|(a, b)| a & !b == 0)
    }

    pub fn is_disjoint(&self, other: &IntSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & b == 0)
    }

    pub fn intersects(&self, other: &IntSet) -> bool {
        !self.is_disjoint(other)
    }

    pub fn union(&self, other: &IntSet) -> IntSet {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    pub fn intersection(&self, other: &IntSet) -> IntSet {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    pub fn difference(&self, other: &IntSet) -> IntSet {
        let mut result = self.clone();
        result.difference_with(other);
        result
    }

    pub fn union_with(&mut self, other: &IntSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    pub fn intersect_with(&mut self, other: &IntSet) {
        self.words.truncate(other.words.len());
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
        self.normalise();
    }

    pub fn difference_with(&mut self, other: &IntSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
        self.normalise();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(u32) -> bool) {
        let removed: Vec<u32> = self.iter().filter(|&value| !keep(value)).collect();
        for value in removed {
            let (word, bit) = position(value);
            self.words[word] &= !bit;
        }
        self.normalise();
    }

    /// Whether the elements form a contiguous interval. The empty set is convex.
    pub fn is_convex(&self) -> bool {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => (max - min + 1) as usize == self.len(),
            _ => true,
        }
    }

    fn normalise(&mut self) {
        while self.words.last() == Some(&0) {
            let _ = self.words.pop();
        }
    }
}

fn position(value: u32) -> (usize, u64) {
    ((value / WORD_BITS) as usize, 1 << (value % WORD_BITS))
}

fn mask_below(bits: u32) -> u64 {
    if bits >= WORD_BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Ascending iterator over an [`IntSet`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.current == 0 {
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
        let bit = self.current.trailing_zeros();
        self.current &= self.current - 1;
        Some(self.index as u32 * WORD_BITS + bit)
    }
}

impl<'a> IntoIterator for &'a IntSet {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<u32> for IntSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut set = IntSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<u32> for IntSet {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

impl<const N: usize> From<[u32; N]> for IntSet {
    fn from(values: [u32; N]) -> Self {
        values.into_iter().collect()
    }
}

impl Debug for IntSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for IntSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::IntSet;

    #[test]
    fn range_spans_word_boundaries() {
        let set = IntSet::range(60, 130);
        assert_eq!(set.len(), 70);
        assert_eq!(set.min(), Some(60));
        assert_eq!(set.max(), Some(129));
        assert!(set.is_convex());
    }

    #[test]
    fn empty_range_is_empty() {
        assert!(IntSet::range(5, 5).is_empty());
        assert!(IntSet::range(7, 3).is_empty());
    }

    #[test]
    fn removal_keeps_representation_normalised() {
        let mut set = IntSet::from([3, 200]);
        assert!(set.remove(200));
        assert_eq!(set, IntSet::singleton(3));
        assert!(!set.remove(200));
    }

    #[test]
    fn gaps_are_not_convex() {
        assert!(!IntSet::from([1, 2, 4]).is_convex());
        assert!(IntSet::new().is_convex());
    }

    #[test]
    fn display_lists_elements_in_order() {
        assert_eq!(IntSet::from([5, 1, 3]).to_string(), "{1,3,5}");
    }

    proptest! {
        #[test]
        fn set_algebra_matches_btreeset(
            a in proptest::collection::btree_set(0u32..300, 0..40),
            b in proptest::collection::btree_set(0u32..300, 0..40),
        ) {
            let x: IntSet = a.iter().copied().collect();
            let y: IntSet = b.iter().copied().collect();

            let union: Vec<u32> = a.union(&b).copied().collect();
            let intersection: Vec<u32> = a.intersection(&b).copied().collect();
            let difference: Vec<u32> = a.difference(&b).copied().collect();

            prop_assert_eq!(x.union(&y).iter().collect::<Vec<_>>(), union);
            prop_assert_eq!(x.intersection(&y).iter().collect::<Vec<_>>(), intersection);
            prop_assert_eq!(x.difference(&y).iter().collect::<Vec<_>>(), difference);
            prop_assert_eq!(x.is_subset(&y), a.is_subset(&b));
            prop_assert_eq!(x.is_disjoint(&y), a.is_disjoint(&b));
            prop_assert_eq!(x.len(), a.len());
            prop_assert_eq!(x.min(), a.first().copied());
            prop_assert_eq!(x.max(), a.last().copied());
        }
    }
}
