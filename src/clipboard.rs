//! Color clipboard: copy a frame's color layer, paste it onto another frame.

use std::collections::HashMap;

use crate::models::{Frame, Position};

/// Holds a copied color layer between frames.
///
/// The snapshot is stored unfiltered; filtering happens at paste time via
/// [`ColorClipboard::entries_for`], against the destination frame's content.
/// Pasting itself goes through the edit engine so it lands as one undoable
/// batch.
#[derive(Debug, Default)]
pub struct ColorClipboard {
    colors: Option<HashMap<Position, u8>>,
}

impl ColorClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the frame's color layer, replacing any previous copy.
    pub fn copy_colors(&mut self, frame: &Frame) {
        self.colors = Some(frame.colors.clone());
    }

    /// True once something has been copied, even an empty layer.
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn len(&self) -> usize {
        self.colors.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.colors = None;
    }

    /// Entries that may be pasted onto `target`. Anything aimed at a blank
    /// cell of the destination is dropped silently; the rest come back
    /// sorted row-major so paste batches replay stably.
    pub fn entries_for(&self, target: &Frame) -> Vec<(Position, u8)> {
        let Some(colors) = &self.colors else {
            return Vec::new();
        };
        let grid = target.grid();
        let mut entries: Vec<(Position, u8)> = colors
            .iter()
            .filter(|(pos, _)| grid.is_paintable(pos.row, pos.col))
            .map(|(pos, color)| (*pos, *color))
            .collect();
        entries.sort_by_key(|(pos, _)| *pos);
        entries
    }

    /// The frame's raw text, for copy-as-text flows.
    pub fn copy_text(frame: &Frame) -> String {
        frame.content.clone()
    }
}
