use crate::error::InvalidState;
use crate::reference::ReferenceBuffer;
use crate::table::{CharacterTable, Classification};

/// What a forward keystroke did to the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// The cursor walked off the end of the text.
    Completed,
}

/// Moves the cursor through a [`CharacterTable`] one cell per event.
///
/// Invariant kept after every call: cells before `index` are Correct or
/// Incorrect, cells from `index` on are Pending, and the only cell flagged
/// as cursor is `index` (none once `index == len`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorController {
    index: usize,
}

impl CursorController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn on_character(
        &mut self,
        reference: &ReferenceBuffer,
        table: &mut CharacterTable,
        input: char,
    ) -> Result<Advance, InvalidState> {
        let expected = reference
            .get(self.index)
            .ok_or(InvalidState::SessionComplete)?;

        let classification = if expected.matches(input) {
            Classification::Correct
        } else {
            Classification::Incorrect
        };

        table.classify(self.index, classification);
        table.set_cursor(self.index, false);
        self.index += 1;

        if self.index < table.len() {
            table.set_cursor(self.index, true);
            Ok(Advance::Moved)
        } else {
            Ok(Advance::Completed)
        }
    }

    pub fn on_backspace(&mut self, table: &mut CharacterTable) -> Result<(), InvalidState> {
        if self.index == 0 {
            return Err(InvalidState::AtStart);
        }

        if self.index < table.len() {
            table.set_cursor(self.index, false);
        }
        self.index -= 1;
        table.classify(self.index, Classification::Pending);
        table.set_cursor(self.index, true);
        Ok(())
    }
}
