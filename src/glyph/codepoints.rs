//! An ordered, duplicate-free set of code points.

use indexmap::IndexSet;

/// The Unicode code points of a glyph.
///
/// Order is preserved and the first entry is the primary value; inserting
/// a code point that is already present keeps it in its original place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Codepoints(IndexSet<char>);

impl Codepoints {
    /// Construct a new set of codepoints.
    ///
    /// ```
    /// # use ufokit::Codepoints;
    /// let codepoints = Codepoints::new(['A', 'B', 'A']);
    /// assert_eq!(codepoints.len(), 2);
    /// ```
    pub fn new(src: impl IntoIterator<Item = char>) -> Self {
        Self(src.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The primary code point.
    pub fn primary(&self) -> Option<char> {
        self.0.first().copied()
    }

    pub fn contains(&self, codepoint: char) -> bool {
        self.0.contains(&codepoint)
    }

    /// Returns `true` if the code point was not already present.
    pub fn insert(&mut self, codepoint: char) -> bool {
        self.0.insert(codepoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<char> for Codepoints {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Codepoints(iter.into_iter().collect())
    }
}

impl IntoIterator for Codepoints {
    type Item = char;
    type IntoIter = indexmap::set::IntoIter<char>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_position() {
        let mut cps = Codepoints::new(['b', 'a']);
        assert!(!cps.insert('b'));
        assert!(cps.insert('c'));
        assert_eq!(cps.iter().collect::<String>(), "bac");
        assert_eq!(cps.primary(), Some('b'));
    }
}
