use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::error::ConfigError;
use crate::language::Language;
use crate::reference::ReferenceBuffer;

/// Where the text to type comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    File(PathBuf),
    Prompt(String),
    Words { list: String, count: usize },
}

impl ReferenceSource {
    /// Label for the typing panel.
    pub fn title(&self) -> String {
        match self {
            ReferenceSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ReferenceSource::Prompt(_) => "prompt".to_string(),
            ReferenceSource::Words { list, .. } => list.clone(),
        }
    }

    /// Whether loading again can produce a different text.
    pub fn is_generated(&self) -> bool {
        matches!(self, ReferenceSource::Words { .. })
    }
}

/// Read or generate the reference text for one session.
pub fn load_reference_text<R: Rng + ?Sized>(
    source: &ReferenceSource,
    rng: &mut R,
) -> Result<String, ConfigError> {
    let text = match source {
        ReferenceSource::File(path) => read_file(path)?,
        ReferenceSource::Prompt(prompt) => normalize_line_endings(prompt),
        ReferenceSource::Words { list, count } => {
            Language::load(list)?.random_words(*count, rng).join(" ")
        }
    };

    if text.is_empty() {
        return Err(ConfigError::EmptyReference);
    }
    Ok(text)
}

pub fn load_reference<R: Rng + ?Sized>(
    source: &ReferenceSource,
    rng: &mut R,
) -> Result<ReferenceBuffer, ConfigError> {
    load_reference_text(source, rng).map(|text| ReferenceBuffer::from_text(&text))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(file = %path.display(), bytes = raw.len(), "reference file read");
    Ok(normalize_line_endings(&raw))
}

/// CRLF becomes LF (Enter types a bare newline) and trailing line breaks go,
/// so a session never ends on an invisible character.
fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
