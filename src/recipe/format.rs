use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlockKind {
    Header,
    Step,
    Blank,
    Paragraph,
}

/// One line of a recipe with its display role. `text` is the untrimmed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBlock {
    pub kind: BlockKind,
    pub text: String,
}

pub fn classify_line(line: &str) -> BlockKind {
    let trimmed = line.trim();
    if trimmed.ends_with(':') || (!trimmed.is_empty() && trimmed == trimmed.to_uppercase()) {
        BlockKind::Header
    } else if is_numbered_step(trimmed) {
        BlockKind::Step
    } else if trimmed.is_empty() {
        BlockKind::Blank
    } else {
        BlockKind::Paragraph
    }
}

/// Leading ASCII digits immediately followed by `.`.
fn is_numbered_step(trimmed: &str) -> bool {
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && trimmed.as_bytes().get(digits) == Some(&b'.')
}

/// Split on `\n` and classify each line, keeping order and original text.
pub fn format_recipe(text: &str) -> Vec<DisplayBlock> {
    text.split('\n')
        .map(|line| DisplayBlock {
            kind: classify_line(line),
            text: line.to_string(),
        })
        .collect()
}
