use serde::{Deserialize, Serialize};

/// A single recognized token with an associated confidence score (0.0–1.0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    pub value: String,
    /// Confidence in this recognition (0.0 = guessed, 1.0 = certain).
    pub confidence: f32,
}

impl Word {
    pub fn new(value: impl Into<String>, confidence: f32) -> Self {
        Self { value: value.into(), confidence: confidence.clamp(0.0, 1.0) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

/// The hierarchical result of one recognition run: pages → blocks → lines →
/// words, all in reading order. Produced once per image and read-only after.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Flatten the hierarchy into one text blob: words joined by single
    /// spaces, one line of output per recognized line, in document order.
    pub fn linearize(&self) -> String {
        let mut text = String::new();
        for page in &self.pages {
            for block in &page.blocks {
                for line in &block.lines {
                    let joined: Vec<&str> =
                        line.words.iter().map(|w| w.value.as_str()).collect();
                    text.push_str(&joined.join(" "));
                    text.push('\n');
                }
            }
        }
        text
    }

    /// Build a one-page, one-block document from flat newline-separated text.
    /// Backends that produce plain text (Tesseract, the mock) funnel through
    /// this so the rest of the pipeline only ever sees the hierarchy.
    pub fn from_plain_text(text: &str) -> Self {
        let lines: Vec<Line> = text
            .lines()
            .map(|l| Line {
                words: l.split_whitespace().map(|w| Word::new(w, 1.0)).collect(),
            })
            .filter(|l| !l.words.is_empty())
            .collect();

        if lines.is_empty() {
            return Document::default();
        }
        Document { pages: vec![Page { blocks: vec![Block { lines }] }] }
    }
}
