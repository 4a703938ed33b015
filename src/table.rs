#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Classification {
    #[default]
    Pending,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CharacterState {
    pub classification: Classification,
    pub is_cursor: bool,
}

/// Per-character typing state, index-aligned with the reference buffer.
///
/// Only [`crate::cursor::CursorController`] mutates a table; everything else
/// reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterTable {
    states: Vec<CharacterState>,
}

impl CharacterTable {
    /// All cells Pending, cursor on the first cell when there is one.
    pub fn new(len: usize) -> Self {
        let mut states = vec![CharacterState::default(); len];
        if let Some(first) = states.first_mut() {
            first.is_cursor = true;
        }
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CharacterState> {
        self.states.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CharacterState> {
        self.states.iter()
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.states
            .iter()
            .filter(|s| s.classification == classification)
            .count()
    }

    pub fn cursor_position(&self) -> Option<usize> {
        self.states.iter().position(|s| s.is_cursor)
    }

    pub(crate) fn classify(&mut self, idx: usize, classification: Classification) {
        self.states[idx].classification = classification;
    }

    pub(crate) fn set_cursor(&mut self, idx: usize, is_cursor: bool) {
        self.states[idx].is_cursor = is_cursor;
    }
}
