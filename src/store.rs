//! Frame store: the canonical owner of an editing session's frames.
//!
//! Holds one animation's frame sequence and answers content/duration
//! queries for the player and viewport. Mutation of color data goes
//! through the edit engine, which borrows the live sequence via
//! [`FrameStore::frames_mut`] per call.

use serde::Serialize;

use crate::models::Frame;

/// Viewport sizing info: the widest line and tallest frame in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaxDimensions {
    pub width: usize,
    pub height: usize,
}

/// Ordered frame sequence with duration and content accessors.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    pub fn new(frames: Vec<Frame>) -> Self {
        FrameStore { frames }
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The live mutable sequence - the lease handed to the edit engine
    /// for the duration of one call.
    pub fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    /// Raw content text of a frame, or `""` when out of range.
    pub fn frame_text(&self, index: usize) -> &str {
        self.frames.get(index).map_or("", |f| f.content.as_str())
    }

    pub fn frame_titles(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.title.as_str()).collect()
    }

    /// Sets a frame's duration; out-of-range indices are ignored.
    pub fn set_frame_duration(&mut self, index: usize, duration_ms: u32) {
        if let Some(frame) = self.frames.get_mut(index) {
            frame.duration = duration_ms;
        }
    }

    /// A frame's duration, falling back to the default when out of range.
    pub fn frame_duration(&self, index: usize) -> u32 {
        self.frames
            .get(index)
            .map_or(Frame::DEFAULT_DURATION_MS, |f| f.duration)
    }

    /// Maximum line length (in chars) and line count across all frames.
    pub fn max_dimensions(&self) -> MaxDimensions {
        let mut width = 0;
        let mut height = 0;
        for frame in &self.frames {
            let lines: Vec<&str> = frame.content.lines().collect();
            height = height.max(lines.len());
            for line in lines {
                width = width.max(line.chars().count());
            }
        }
        MaxDimensions { width, height }
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn remove_frame(&mut self, index: usize) -> Option<Frame> {
        if index < self.frames.len() {
            Some(self.frames.remove(index))
        } else {
            None
        }
    }

    /// Replaces a frame wholesale; returns false when out of range.
    pub fn update_frame(&mut self, index: usize, frame: Frame) -> bool {
        match self.frames.get_mut(index) {
            Some(slot) => {
                *slot = frame;
                true
            }
            None => false,
        }
    }

    /// Content fingerprint: all frame texts joined. Colors are excluded on
    /// purpose so color edits never register as "a different animation".
    pub fn fingerprint(&self) -> String {
        self.frames
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}
