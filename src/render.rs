use itertools::Itertools;

use crate::reference::ReferenceBuffer;
use crate::table::{CharacterState, CharacterTable, Classification};

/// Visual role of a run of reference text. Terminal colours are chosen by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanStyle {
    Default,
    Correct,
    Incorrect,
    Cursor,
}

impl From<&CharacterState> for SpanStyle {
    fn from(state: &CharacterState) -> Self {
        match state.classification {
            Classification::Correct => SpanStyle::Correct,
            Classification::Incorrect => SpanStyle::Incorrect,
            Classification::Pending if state.is_cursor => SpanStyle::Cursor,
            Classification::Pending => SpanStyle::Default,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: SpanStyle,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Project the table onto styled spans, merging neighbours that share a style.
///
/// Concatenating the span texts always gives back the reference text.
pub fn project(reference: &ReferenceBuffer, table: &CharacterTable) -> Vec<StyledSpan> {
    let runs = reference
        .iter()
        .zip(table.iter())
        .map(|(ch, state)| (SpanStyle::from(state), ch.text.as_str()))
        .chunk_by(|(style, _)| *style);

    runs.into_iter()
        .map(|(style, cells)| StyledSpan {
            text: cells.map(|(_, text)| text).collect(),
            style,
        })
        .collect()
}
