//! # Record Reader
//!
//! Parses `.ito` content files. The first non-blank line is a bracketed
//! section tag (`[mystery]`, `[event]`, `[enemy]`) selecting the record
//! kind; the remaining lines are `key=value` pairs with values optionally
//! wrapped in double quotes.
//!
//! Blank lines and lines without `=` produce no [`Entry`], but every line is
//! kept in [`Record::lines`] so diagnostics can report 1-based line numbers
//! that match what an author sees in an editor.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::source::ContentSource;

/// The closed set of content record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Top-level mystery definition. Forces events through `_frc` keys.
    Mystery,
    /// Event definition. May trigger further events or enemies as prizes.
    Event,
    /// Enemy definition. A leaf of the content graph.
    Enemy,
}

impl RecordKind {
    /// All kinds, in graph order.
    pub const ALL: [RecordKind; 3] = [RecordKind::Mystery, RecordKind::Event, RecordKind::Enemy];

    /// The snake_case identifier of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mystery => "mystery",
            Self::Event => "event",
            Self::Enemy => "enemy",
        }
    }

    /// The header line that introduces a record of this kind.
    pub fn section_tag(&self) -> &'static str {
        match self {
            Self::Mystery => "[mystery]",
            Self::Event => "[event]",
            Self::Enemy => "[enemy]",
        }
    }

    /// Recognize a section tag. Surrounding whitespace is ignored.
    pub fn from_section(tag: &str) -> Option<Self> {
        match tag.trim() {
            "[mystery]" => Some(Self::Mystery),
            "[event]" => Some(Self::Event),
            "[enemy]" => Some(Self::Enemy),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mystery" => Ok(Self::Mystery),
            "event" => Ok(Self::Event),
            "enemy" => Ok(Self::Enemy),
            other => Err(format!("unknown record kind: {other:?}")),
        }
    }
}

/// One physical line of a record, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLine {
    /// 1-based line number.
    pub number: usize,
    /// The line without its terminator.
    pub raw: String,
}

impl RecordLine {
    /// The line with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.raw.trim()
    }

    /// True if the trimmed line is a bracketed `[section]` tag.
    pub fn is_section(&self) -> bool {
        let t = self.trimmed();
        t.starts_with('[') && t.ends_with(']')
    }
}

/// A parsed `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 1-based line number the entry was read from.
    pub line: usize,
    /// Trimmed key.
    pub key: String,
    /// Trimmed value with surrounding double quotes removed.
    pub value: String,
}

impl Entry {
    /// True if the value is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// An immutable, parsed content file.
#[derive(Debug, Clone)]
pub struct Record {
    identity: PathBuf,
    section: Option<String>,
    lines: Vec<RecordLine>,
    entries: Vec<Entry>,
}

impl Record {
    /// Parse record text. `identity` is the path used for visited-set
    /// bookkeeping and diagnostics; it is not read.
    pub fn parse(identity: impl Into<PathBuf>, text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = Vec::new();
        let mut entries = Vec::new();
        let mut section = None;
        let mut header_seen = false;

        for (idx, raw) in text.lines().enumerate() {
            let number = idx + 1;
            let line = RecordLine {
                number,
                raw: raw.to_string(),
            };
            let trimmed = line.trimmed();

            if !header_seen && !trimmed.is_empty() {
                header_seen = true;
                if line.is_section() {
                    section = Some(trimmed.to_string());
                }
            }

            if let Some((key, value)) = trimmed.split_once('=') {
                entries.push(Entry {
                    line: number,
                    key: key.trim().to_string(),
                    value: unquote(value).to_string(),
                });
            }

            lines.push(line);
        }

        Self {
            identity: identity.into(),
            section,
            lines,
            entries,
        }
    }

    /// Read and parse the record at `identity` through `source`.
    ///
    /// The underlying handle is released before this returns, whether or
    /// not the content turns out to be well formed.
    pub fn load<S: ContentSource + ?Sized>(source: &S, identity: &Path) -> io::Result<Self> {
        let text = source.read_to_string(identity)?;
        Ok(Self::parse(identity, &text))
    }

    /// The identity path of this record.
    pub fn identity(&self) -> &Path {
        &self.identity
    }

    /// The file name of the identity path, for human-facing messages.
    pub fn display_name(&self) -> String {
        self.identity
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.identity.display().to_string())
    }

    /// The leading `[section]` tag, if the first non-blank line is one.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// The record kind named by the leading section tag.
    pub fn kind(&self) -> Option<RecordKind> {
        self.section.as_deref().and_then(RecordKind::from_section)
    }

    /// Every physical line, including blank and non-entry lines.
    pub fn lines(&self) -> &[RecordLine] {
        &self.lines
    }

    /// All `key=value` entries in file order, duplicates preserved.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Value of the first entry with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

/// Trim a raw value and strip the double quotes wrapping it.
fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}
