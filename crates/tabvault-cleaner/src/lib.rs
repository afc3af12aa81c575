//! Extraction of tablature and chord content from pasted or uploaded text.
//!
//! Every line is classified on its own, with a single piece of state carried
//! from one line to the next: whether the cursor is inside a tab block. A
//! block is opened by a section header (`[Intro]`) or a tab line
//! (`e|--0--|`) and closed by the first blank line that follows.

mod patterns;

#[cfg(test)]
mod tests;

pub use patterns::{is_chord_line, is_noise, is_section_header, is_tab_line};

use rayon::prelude::*;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Emails, dates, and blank lines outside of a block. Never kept.
    Noise,
    /// A bracketed label such as `[Chorus]`. Opens a block.
    SectionHeader,
    /// One string of tablature. Opens a block.
    TabLine,
    /// Two or more chord names. Kept regardless of block state.
    ChordLine,
    /// Free text inside a block, usually lyrics or playing notes.
    PlainInBlock,
    /// A blank line inside a block. Closes the block.
    BlankBoundary,
    /// Free text outside any block.
    Discard,
}

impl LineKind {
    pub fn is_retained(self) -> bool {
        matches!(
            self,
            LineKind::SectionHeader
                | LineKind::TabLine
                | LineKind::ChordLine
                | LineKind::PlainInBlock
                | LineKind::BlankBoundary
        )
    }

    pub fn opens_block(self) -> bool {
        matches!(self, LineKind::SectionHeader | LineKind::TabLine)
    }

    /// Block state after a line of this kind was seen with `in_block` before it.
    pub fn next_block_state(self, in_block: bool) -> bool {
        match self {
            kind if kind.opens_block() => true,
            LineKind::BlankBoundary => false,
            _ => in_block,
        }
    }
}

/// Classifies a single line. The first matching rule wins:
///
/// 1. blank lines end an open block, otherwise they are noise
/// 2. noise (`@`, "email", dates)
/// 3. section headers and tab lines
/// 4. chord lines
/// 5. anything else is kept only inside a block
pub fn classify_line(line: &str, in_block: bool) -> LineKind {
    if line.trim().is_empty() {
        return if in_block {
            LineKind::BlankBoundary
        } else {
            LineKind::Noise
        };
    }

    if is_noise(line) {
        LineKind::Noise
    } else if is_section_header(line) {
        LineKind::SectionHeader
    } else if is_tab_line(line) {
        LineKind::TabLine
    } else if is_chord_line(line) {
        LineKind::ChordLine
    } else if in_block {
        LineKind::PlainInBlock
    } else {
        LineKind::Discard
    }
}

/// Runs the classifier over `raw` and returns the retained lines in order.
///
/// Block boundaries are kept as empty strings here; they only exist to reset
/// the block state and are dropped by [`clean_tab_text`].
pub fn retained_lines(raw: &str) -> Vec<&str> {
    let mut in_block = false;
    let mut kept = Vec::new();

    for line in raw.lines() {
        let kind = classify_line(line, in_block);
        trace!(?kind, in_block, line, "line classified");

        match kind {
            LineKind::BlankBoundary => kept.push(""),
            kind if kind.is_retained() => kept.push(line),
            _ => {}
        }

        in_block = kind.next_block_state(in_block);
    }

    kept
}

/// Cleans one document. Total over every input: an empty or all-noise input
/// yields an empty string.
pub fn clean_tab_text(raw: &str) -> String {
    let kept = retained_lines(raw);

    // Second pass: every line that is blank after trimming goes, block
    // separators included.
    let cleaned = kept
        .into_iter()
        .filter(|line| !line.trim_end().is_empty())
        .collect::<Vec<_>>();

    debug!(
        lines_in = raw.lines().count(),
        lines_out = cleaned.len(),
        "tab text cleaned"
    );

    cleaned.join("\n")
}

/// Cleans every record independently. Output order and identifiers match the
/// input; no block state is shared between records.
pub fn clean_all<I: Send>(records: Vec<(I, String)>) -> Vec<(I, String)> {
    records
        .into_par_iter()
        .map(|(id, content)| {
            let cleaned = clean_tab_text(&content);
            (id, cleaned)
        })
        .collect()
}
