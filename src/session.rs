use tracing::{debug, trace};

use crate::clock::SessionClock;
use crate::cursor::{Advance, CursorController};
use crate::error::InvalidState;
use crate::reference::ReferenceBuffer;
use crate::render::{project, StyledSpan};
use crate::stats::{accuracy, consistency, get_stats, Stats, WpmSample};
use crate::table::CharacterTable;

/// Input the session understands, already decoded from the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Character(char),
    Backspace,
    /// Types a `'\n'`.
    Enter,
    /// Abandons the session.
    Escape,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Finished,
    TimeUp,
    Aborted,
}

/// Live figures shown while typing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentStats {
    pub remaining_seconds: u64,
    pub wpm: f64,
    pub errors: usize,
    pub correct: usize,
}

/// Figures shown once the session is over.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub completion: Option<Completion>,
    pub elapsed_seconds: u64,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: usize,
    pub correct: usize,
    pub consistency: f64,
}

/// One typing attempt over one reference text.
///
/// The session is the single owner of the typing state. Keystrokes and
/// clock ticks both go through `&mut self`, so a caller that owns the
/// session on one thread gets serialized updates for free.
#[derive(Debug, Clone)]
pub struct Session {
    reference: ReferenceBuffer,
    table: CharacterTable,
    cursor: CursorController,
    clock: SessionClock,
    history: Vec<WpmSample>,
    completion: Option<Completion>,
}

impl Session {
    pub fn new(reference: ReferenceBuffer, duration_seconds: u64) -> Self {
        let table = CharacterTable::new(reference.len());
        let clock = SessionClock::new(duration_seconds);
        let completion = if reference.is_empty() {
            Some(Completion::Finished)
        } else if clock.is_expired() {
            Some(Completion::TimeUp)
        } else {
            None
        };
        Self {
            reference,
            table,
            cursor: CursorController::new(),
            clock,
            history: Vec::new(),
            completion,
        }
    }

    pub fn from_text(text: &str, duration_seconds: u64) -> Self {
        Self::new(ReferenceBuffer::from_text(text), duration_seconds)
    }

    /// Apply one keystroke.
    ///
    /// Returns `Ok(Some(_))` exactly once, on the keystroke that ends the
    /// session. Keystrokes the current state cannot take come back as
    /// [`InvalidState`] and leave everything untouched.
    pub fn on_key(&mut self, key: Keystroke) -> Result<Option<Completion>, InvalidState> {
        if self.completion.is_some() {
            trace!(?key, "keystroke after completion ignored");
            return Err(InvalidState::SessionComplete);
        }

        match key {
            Keystroke::Escape => Ok(Some(self.complete(Completion::Aborted))),
            Keystroke::Backspace => {
                self.cursor.on_backspace(&mut self.table).inspect_err(|err| {
                    trace!(%err, "backspace ignored");
                })?;
                Ok(None)
            }
            Keystroke::Enter => self.type_char('\n'),
            Keystroke::Character(c) => self.type_char(c),
        }
    }

    /// Count one second off the clock.
    ///
    /// Ticks before the first keystroke do nothing. Returns
    /// `Ok(Some(Completion::TimeUp))` on the tick that runs the clock out.
    pub fn tick(&mut self) -> Result<Option<Completion>, InvalidState> {
        if self.completion.is_some() {
            return Err(InvalidState::SessionComplete);
        }
        if !self.clock.is_running() {
            return Ok(None);
        }

        let expired = self.clock.tick();
        let stats = self.stats();
        self.history.push(WpmSample {
            second: stats.elapsed_seconds,
            wpm: stats.wpm,
        });

        if expired {
            return Ok(Some(self.complete(Completion::TimeUp)));
        }
        Ok(None)
    }

    fn type_char(&mut self, c: char) -> Result<Option<Completion>, InvalidState> {
        if !self.clock.is_running() {
            self.clock.start();
            debug!(len = self.reference.len(), "session started");
        }

        match self
            .cursor
            .on_character(&self.reference, &mut self.table, c)?
        {
            Advance::Moved => Ok(None),
            Advance::Completed => Ok(Some(self.complete(Completion::Finished))),
        }
    }

    fn complete(&mut self, completion: Completion) -> Completion {
        self.clock.stop();
        self.completion = Some(completion);
        debug!(
            ?completion,
            elapsed = self.clock.elapsed_seconds(),
            cursor = self.cursor.index(),
            "session complete"
        );
        completion
    }

    pub fn current_spans(&self) -> Vec<StyledSpan> {
        project(&self.reference, &self.table)
    }

    pub fn current_stats(&self) -> CurrentStats {
        let stats = self.stats();
        CurrentStats {
            remaining_seconds: self.clock.remaining_seconds(),
            wpm: stats.wpm,
            errors: stats.errors,
            correct: stats.correct,
        }
    }

    pub fn results(&self) -> SessionResults {
        let stats = self.stats();
        SessionResults {
            completion: self.completion,
            elapsed_seconds: stats.elapsed_seconds,
            wpm: stats.wpm.round(),
            accuracy: accuracy(&self.table),
            errors: stats.errors,
            correct: stats.correct,
            consistency: consistency(&self.history),
        }
    }

    fn stats(&self) -> Stats {
        get_stats(self.clock.elapsed_seconds(), &self.reference, &self.table)
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn has_started(&self) -> bool {
        self.clock.is_running() || self.clock.elapsed_seconds() > 0 || self.cursor.index() > 0
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn reference(&self) -> &ReferenceBuffer {
        &self.reference
    }

    pub fn table(&self) -> &CharacterTable {
        &self.table
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn history(&self) -> &[WpmSample] {
        &self.history
    }
}
