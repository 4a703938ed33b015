use unicode_segmentation::UnicodeSegmentation;

/// One grapheme of the text being reproduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCharacter {
    pub text: String,
    pub position: usize,
}

impl ReferenceCharacter {
    /// True when a single typed char reproduces this grapheme.
    pub fn matches(&self, input: char) -> bool {
        let mut buf = [0u8; 4];
        self.text == *input.encode_utf8(&mut buf)
    }

    pub fn is_space(&self) -> bool {
        self.text == " "
    }

    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

/// Immutable target text, split into extended grapheme clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBuffer {
    chars: Vec<ReferenceCharacter>,
}

impl ReferenceBuffer {
    pub fn from_text(text: &str) -> Self {
        let chars = text
            .graphemes(true)
            .enumerate()
            .map(|(position, g)| ReferenceCharacter {
                text: g.to_string(),
                position,
            })
            .collect();
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ReferenceCharacter> {
        self.chars.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceCharacter> {
        self.chars.iter()
    }

    /// The full text, reassembled.
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.text.as_str()).collect()
    }
}
