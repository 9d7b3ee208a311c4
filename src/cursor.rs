/// Opaque read position handed out by [`TokenStream::mark`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Number of tokens popped before this checkpoint was taken.
    pub fn position(self) -> usize {
        self.0
    }
}

/// A single-pass token source with peek/pop and mark-and-rewind.
///
/// Everything in [`crate::combinator`] is written against this trait only.
pub trait TokenStream {
    type Item: Clone;

    fn has_next(&self) -> bool;

    /// The next token without consuming it, or `None` once exhausted.
    fn peek(&self) -> Option<&Self::Item>;

    /// Consumes and returns the next token, or `None` once exhausted.
    fn pop(&mut self) -> Option<Self::Item>;

    fn mark(&self) -> Checkpoint;

    /// Restores the read position to `checkpoint`.
    ///
    /// Returns `false`, leaving the position untouched, if the checkpoint
    /// lies ahead of the current position.
    fn rewind_to(&mut self, checkpoint: Checkpoint) -> bool;
}

/// A [`TokenStream`] over a borrowed slice of tokens.
///
/// Marks are plain indices into the slice, so rewinding can go back any
/// distance.
#[derive(Clone, Debug)]
pub struct Cursor<'a, T> {
    tokens: &'a [T],
    position: usize,
    furthest: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(tokens: &'a [T]) -> Self {
        Self {
            tokens,
            position: 0,
            furthest: 0,
        }
    }

    /// The highest position reached so far, kept across rewinds. Used to
    /// point parse errors at the token where the input stopped making sense.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn token_at(&self, position: usize) -> Option<&'a T> {
        self.tokens.get(position)
    }
}

impl<'a, T: Clone> TokenStream for Cursor<'a, T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    fn peek(&self) -> Option<&T> {
        self.tokens.get(self.position)
    }

    fn pop(&mut self) -> Option<T> {
        let token = self.tokens.get(self.position)?.clone();
        self.position += 1;
        self.furthest = self.furthest.max(self.position);
        Some(token)
    }

    fn mark(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    fn rewind_to(&mut self, checkpoint: Checkpoint) -> bool {
        if checkpoint.0 > self.position {
            return false;
        }
        self.position = checkpoint.0;
        true
    }
}
