use super::letter::{LetterId, LetterToken};

/// Ordered collection of letters currently on screen, oldest first.
///
/// Every change consumes the store and returns the next one; there is no
/// positional mutation, so overlapping timer callbacks always see a whole
/// state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LetterStore {
    letters: Vec<LetterToken>,
}

impl LetterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LetterToken> {
        self.letters.iter()
    }

    pub fn get(&self, id: LetterId) -> Option<&LetterToken> {
        self.letters.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LetterId) -> bool {
        self.get(id).is_some()
    }

    pub fn appended(self, token: LetterToken) -> Self {
        debug_assert!(!self.contains(token.id), "duplicate letter id {}", token.id);
        let mut letters = self.letters;
        letters.push(token);
        Self { letters }
    }

    /// Marks `id` popped at `now`. Absent ids leave the store unchanged.
    pub fn popped(self, id: LetterId, now: f64) -> Self {
        let letters = self
            .letters
            .into_iter()
            .map(|l| if l.id == id { l.into_popped(now) } else { l })
            .collect();
        Self { letters }
    }

    /// Drops `id`. Absent ids leave the store unchanged.
    pub fn without(self, id: LetterId) -> Self {
        let mut letters = self.letters;
        letters.retain(|l| l.id != id);
        Self { letters }
    }
}

impl<'a> IntoIterator for &'a LetterStore {
    type Item = &'a LetterToken;
    type IntoIter = std::slice::Iter<'a, LetterToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.iter()
    }
}
