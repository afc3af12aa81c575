use rusqlite::Row;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_KIND: &str = "Tab";
pub const DEFAULT_DIFFICULTY: &str = "Beginner";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TabSummary {
    pub id: i64,
    pub title: String,
    pub artist: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tuning: String,
    pub capo: String,
    pub difficulty: String,
}

impl TabSummary {
    /// Maps `id, title, artist, type, tuning, capo, difficulty`.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            kind: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            tuning: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            capo: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            difficulty: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        })
    }
}

impl Display for TabSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} - {} [{}", self.id, self.title, self.artist, self.kind)?;
        if !self.tuning.is_empty() {
            write!(f, " | {}", self.tuning)?;
        }
        if !self.capo.is_empty() {
            write!(f, " | Capo: {}", self.capo)?;
        }
        write!(f, " | Difficulty: {}]", self.difficulty)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Tab {
    #[serde(flatten)]
    pub summary: TabSummary,
    pub content: String,
}

impl Tab {
    /// Maps the summary columns followed by `content`.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            summary: TabSummary::from_row(row)?,
            content: row.get(7)?,
        })
    }
}

/// An uploaded tab before it is cleaned and stored. Metadata is kept verbatim;
/// only `title`, `artist` and `content` have to be present.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct NewTab {
    #[serde(default, deserialize_with = "default_if_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub artist: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub tuning: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub capo: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub content: String,
}

impl Default for NewTab {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            kind: default_kind(),
            tuning: String::new(),
            capo: String::new(),
            difficulty: default_difficulty(),
            content: String::new(),
        }
    }
}

impl NewTab {
    /// Names of the required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("artist", &self.artist),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Applies a multipart/form field by name. Unknown fields are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "artist" => self.artist = value,
            "type" if !value.trim().is_empty() => self.kind = value,
            "tuning" => self.tuning = value,
            "capo" => self.capo = value,
            "difficulty" if !value.trim().is_empty() => self.difficulty = value,
            "tabfile" | "content" => self.content = value,
            _ => {}
        }
    }
}

fn default_kind() -> String {
    DEFAULT_KIND.to_owned()
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_owned()
}

// https://serde.rs/field-attrs.html#deserialize_with
fn default_if_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SongSummary {
    pub id: i64,
    pub title: String,
    pub artist: String,
}

impl Display for SongSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} - {}", self.id, self.title, self.artist)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub chords: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NewSong {
    #[serde(default, deserialize_with = "default_if_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "default_if_empty")]
    pub chords: String,
}

impl NewSong {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("artist", &self.artist),
            ("chords", &self.chords),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
