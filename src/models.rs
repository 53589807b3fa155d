//! Data models for animation definitions.
//!
//! Two layers live here: the serde wire types (`AnimationDoc`, `FrameDoc`)
//! matching the on-disk definition format, and the runtime types
//! (`Animation`, `Frame`, `Position`) the editor and player operate on.
//! [`AnimationDoc::resolve`] converts wire to runtime, dropping invalid
//! color entries with warnings instead of failing the whole document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::palette::{color_index, PALETTE_SIZE};

/// A warning produced by lenient loading or validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub message: String,
    /// Where the problem was found: a file path or a frame label.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Warning { message: message.into(), source: None }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<String>) -> Self {
        Warning { message: message.into(), source: Some(source.into()) }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", source, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Error type for malformed `"row,col"` position keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid position key '{0}', expected 'row,col'")]
pub struct ParsePositionError(pub String);

/// A single character cell address: (row, column), both zero-based.
///
/// The textual form `"row,col"` is the on-disk mapping key; in memory the
/// struct itself is the hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| ParsePositionError(s.to_string()))?;
        let row = row
            .trim()
            .parse::<usize>()
            .map_err(|_| ParsePositionError(s.to_string()))?;
        let col = col
            .trim()
            .parse::<usize>()
            .map_err(|_| ParsePositionError(s.to_string()))?;
        Ok(Position { row, col })
    }
}

/// Animation identity shared by the wire and runtime layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationMetadata {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// Frame content on the wire: a single string with embedded newlines, or
/// an array of line strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContentDoc {
    Text(String),
    Lines(Vec<String>),
}

impl ContentDoc {
    /// The content as one newline-joined string.
    pub fn text(&self) -> String {
        match self {
            ContentDoc::Text(s) => s.clone(),
            ContentDoc::Lines(lines) => lines.join("\n"),
        }
    }
}

/// A color entry value on the wire: a palette index or a name token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorValue {
    Index(u8),
    Name(String),
}

impl ColorValue {
    /// Resolves to a palette index, rejecting out-of-range indices and
    /// unknown names.
    pub fn to_index(&self) -> Result<u8, String> {
        match self {
            ColorValue::Index(i) if (*i as usize) < PALETTE_SIZE => Ok(*i),
            ColorValue::Index(i) => Err(format!("color index {} out of range, expected 0-15", i)),
            ColorValue::Name(name) => color_index(name)
                .map(|i| i as u8)
                .map_err(|e| e.to_string()),
        }
    }
}

/// A frame as stored in a definition file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameDoc {
    pub title: String,
    pub content: ContentDoc,
    #[serde(default = "default_frame_duration")]
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub colors: Option<HashMap<String, ColorValue>>,
}

fn default_frame_duration() -> u32 {
    Frame::DEFAULT_DURATION_MS
}

/// An animation definition file: metadata plus an ordered frame list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationDoc {
    pub metadata: AnimationMetadata,
    pub frames: Vec<FrameDoc>,
}

impl AnimationDoc {
    /// Converts the wire document into runtime types.
    ///
    /// Color entries with malformed keys, out-of-range indices, or unknown
    /// names are dropped and reported as warnings; the rest of the document
    /// still loads.
    pub fn resolve(&self) -> (Animation, Vec<Warning>) {
        let mut warnings = Vec::new();
        let frames = self
            .frames
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                let mut colors = HashMap::new();
                if let Some(map) = &doc.colors {
                    // Sorted so warnings come out in a stable order.
                    let mut entries: Vec<_> = map.iter().collect();
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                    for (key, value) in entries {
                        let position = match key.parse::<Position>() {
                            Ok(p) => p,
                            Err(e) => {
                                warnings.push(Warning::with_source(
                                    e.to_string(),
                                    format!("frame {}", index),
                                ));
                                continue;
                            }
                        };
                        match value.to_index() {
                            Ok(color) => {
                                colors.insert(position, color);
                            }
                            Err(message) => {
                                warnings.push(Warning::with_source(
                                    format!("'{}': {}", key, message),
                                    format!("frame {}", index),
                                ));
                            }
                        }
                    }
                }
                Frame {
                    title: doc.title.clone(),
                    content: doc.content.text(),
                    duration: doc.duration,
                    colors,
                }
            })
            .collect();
        (Animation { metadata: self.metadata.clone(), frames }, warnings)
    }
}

/// One still frame: text content, display duration, sparse color overlay.
///
/// `content` is authored externally and never edited in place; editing
/// touches `colors` only. A color entry is meaningful only where `content`
/// has a non-blank character, but entries are not purged when content
/// changes underneath them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub title: String,
    pub content: String,
    pub duration: u32,
    pub colors: HashMap<Position, u8>,
}

impl Frame {
    /// Fallback duration when a frame index is out of range.
    pub const DEFAULT_DURATION_MS: u32 = 100;

    pub fn new(title: impl Into<String>, content: impl Into<String>, duration: u32) -> Self {
        Frame {
            title: title.into(),
            content: content.into(),
            duration,
            colors: HashMap::new(),
        }
    }

    /// Char-grid view over this frame's content.
    pub fn grid(&self) -> ContentGrid {
        ContentGrid::new(&self.content)
    }
}

/// A complete animation: identity plus owned frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub metadata: AnimationMetadata,
    pub frames: Vec<Frame>,
}

/// Character-cell view over frame content, split into lines.
///
/// Columns index chars, not bytes, so box-drawing characters address
/// correctly.
#[derive(Debug, Clone)]
pub struct ContentGrid {
    lines: Vec<Vec<char>>,
}

impl ContentGrid {
    pub fn new(content: &str) -> Self {
        ContentGrid {
            lines: content.lines().map(|line| line.chars().collect()).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.len())
    }

    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        self.lines.get(row).and_then(|l| l.get(col)).copied()
    }

    /// True when the cell exists and holds a non-blank character. Blank
    /// cells are never valid color targets.
    pub fn is_paintable(&self, row: usize, col: usize) -> bool {
        self.char_at(row, col).is_some_and(|c| !c.is_whitespace())
    }
}
