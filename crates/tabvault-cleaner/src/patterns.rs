use regex::Regex;
use std::sync::LazyLock;

/// Metadata noise: anything with an `@`, the word "email", short dates at the
/// start of a line (`3/14`), dashed dates (`3-14-2021`) and bare addresses.
#[allow(clippy::expect_used)]
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(@|email|^\d{1,2}/\d{1,2}|\d{1,2}-\d{1,2}-\d{2,4}|\w+@\w+\.\w+)")
        .expect("valid regex: NOISE")
});

#[allow(clippy::expect_used)]
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*\]$").expect("valid regex: SECTION_HEADER"));

/// One string of tablature: the string letter, a pipe, then only tab glyphs.
#[allow(clippy::expect_used)]
static TAB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[EADGBeadgb]\|[0-9\-|hpsb/\\()~\s]*$").expect("valid regex: TAB_LINE")
});

/// Two or more chord names (`Am`, `F#m7`, `Bb`) split by whitespace or `/`.
#[allow(clippy::expect_used)]
static CHORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-G][#b]?m?\d*(?:[\s/]+[A-G][#b]?m?\d*)+$").expect("valid regex: CHORD_LINE")
});

/// Returns true for lines that carry no tab content at all. Whitespace-only
/// lines are treated separately by the classifier because their meaning
/// depends on the block state.
pub fn is_noise(line: &str) -> bool {
    NOISE.is_match(line)
}

pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER.is_match(line.trim())
}

/// The string letter must be the first character; trailing whitespace is
/// part of the glyph set.
pub fn is_tab_line(line: &str) -> bool {
    TAB_LINE.is_match(line)
}

pub fn is_chord_line(line: &str) -> bool {
    CHORD_LINE.is_match(line.trim())
}
