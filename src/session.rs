//! Editing session: one frame store, one edit engine, one player.
//!
//! `EditorSession` is the single owner of the mutable editing state. Tools
//! never hold frames directly; every mutation flows through `&mut self`,
//! which is what keeps concurrent writers out and lets undo history stay
//! consistent with the frames it describes.
//!
//! Frame replacement (loading another animation, changing the version)
//! resets the world: pending timers are re-synced and the undo history is
//! cleared, so no stale batch can replay against frames it never saw.

use crate::clipboard::ColorClipboard;
use crate::edit::EditEngine;
use crate::models::Position;
use crate::palette::Palette;
use crate::player::{Clock, Player, SystemClock};
use crate::registry::AnimationRegistry;
use crate::store::FrameStore;
use crate::template;

pub struct EditorSession<C: Clock = SystemClock> {
    store: FrameStore,
    engine: EditEngine,
    player: Player<C>,
    clipboard: ColorClipboard,
    palette: Palette,
    animation_id: String,
    version: String,
}

impl EditorSession<SystemClock> {
    /// An empty session on the system clock. Load an animation before use.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for EditorSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EditorSession<C> {
    pub fn with_clock(clock: C) -> Self {
        EditorSession {
            store: FrameStore::new(Vec::new()),
            engine: EditEngine::new(),
            player: Player::new(clock),
            clipboard: ColorClipboard::new(),
            palette: Palette::new(),
            animation_id: String::new(),
            version: template::DEFAULT_VERSION.to_string(),
        }
    }

    // ----- frame replacement -------------------------------------------

    /// Replaces the working frames with the named animation at the current
    /// version. Definition colors come along as-is, stale entries included.
    /// Returns false (and changes nothing) for an unknown id.
    pub fn load_animation(&mut self, registry: &AnimationRegistry, id: &str) -> bool {
        let Some(frames) = registry.create_frames_with_version(id, &self.version) else {
            return false;
        };
        self.animation_id = id.to_string();
        self.store = FrameStore::new(frames);
        self.player.sync(&self.store);
        self.engine.clear_history();
        true
    }

    /// Loads the registry's default animation.
    pub fn load_default(&mut self, registry: &AnimationRegistry) -> bool {
        let id = registry.default_animation_id().to_string();
        self.load_animation(registry, &id)
    }

    /// Rebuilds the current animation at another version, carrying the
    /// working color layer over. Unlike a plain load, the carried entries
    /// are filtered: anything that would land on a blank cell of the
    /// regenerated content is dropped.
    pub fn set_version(&mut self, registry: &AnimationRegistry, version: &str) -> bool {
        let Some(mut frames) = registry.create_frames_with_version(&self.animation_id, version)
        else {
            return false;
        };
        for (index, frame) in frames.iter_mut().enumerate() {
            if let Some(current) = self.store.frame(index) {
                let grid = frame.grid();
                frame.colors = current
                    .colors
                    .iter()
                    .filter(|(pos, _)| grid.is_paintable(pos.row, pos.col))
                    .map(|(pos, color)| (*pos, *color))
                    .collect();
            }
        }
        self.version = version.to_string();
        self.store = FrameStore::new(frames);
        self.player.sync(&self.store);
        self.engine.clear_history();
        true
    }

    // ----- painting gestures -------------------------------------------

    /// Opens a stroke gesture. Paints and erases until [`end_stroke`]
    /// accumulate into one undoable batch.
    ///
    /// [`end_stroke`]: EditorSession::end_stroke
    pub fn begin_stroke(&mut self) {
        self.engine.start_batch();
    }

    pub fn end_stroke(&mut self) {
        self.engine.commit_batch();
    }

    pub fn paint_at(&mut self, frame_index: usize, row: usize, col: usize, color_index: u8) {
        self.engine
            .paint_character(self.store.frames_mut(), frame_index, row, col, color_index);
    }

    pub fn erase_at(&mut self, frame_index: usize, row: usize, col: usize) {
        self.engine
            .erase_character(self.store.frames_mut(), frame_index, row, col);
    }

    pub fn line_to(
        &mut self,
        frame_index: usize,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        color_index: u8,
    ) {
        self.engine.paint_line(
            self.store.frames_mut(),
            frame_index,
            start_row,
            start_col,
            end_row,
            end_col,
            color_index,
        );
    }

    /// Flood fill as a self-contained gesture: one click, one batch.
    pub fn fill_at(&mut self, frame_index: usize, row: usize, col: usize, color_index: u8) {
        self.engine.start_batch();
        self.engine
            .flood_fill(self.store.frames_mut(), frame_index, row, col, color_index);
        self.engine.commit_batch();
    }

    /// Eyedropper: the color currently on a cell, if any.
    pub fn color_at(&self, frame_index: usize, row: usize, col: usize) -> Option<u8> {
        self.store
            .frame(frame_index)?
            .colors
            .get(&Position::new(row, col))
            .copied()
    }

    // ----- clipboard ---------------------------------------------------

    /// Copies a frame's color layer to the clipboard.
    pub fn copy_colors(&mut self, frame_index: usize) -> bool {
        let Some(frame) = self.store.frame(frame_index) else {
            return false;
        };
        self.clipboard.copy_colors(frame);
        true
    }

    /// Pastes the clipboard onto a frame as one undoable batch. Entries
    /// aimed at blank cells are dropped; returns how many were applied.
    pub fn paste_colors(&mut self, frame_index: usize) -> usize {
        let Some(frame) = self.store.frame(frame_index) else {
            return 0;
        };
        let entries = self.clipboard.entries_for(frame);
        if entries.is_empty() {
            return 0;
        }
        self.engine.start_batch();
        for (position, color) in &entries {
            self.engine.paint_character(
                self.store.frames_mut(),
                frame_index,
                position.row,
                position.col,
                *color,
            );
        }
        self.engine.commit_batch();
        entries.len()
    }

    pub fn has_clipboard_colors(&self) -> bool {
        self.clipboard.has_colors()
    }

    // ----- history -----------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.engine.undo(self.store.frames_mut())
    }

    pub fn redo(&mut self) -> bool {
        self.engine.redo(self.store.frames_mut())
    }

    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    // ----- playback ----------------------------------------------------

    pub fn toggle_playback(&mut self) {
        self.player.toggle(&self.store);
    }

    /// Drives the player forward against the session's frames. Returns
    /// true when the visible frame changed.
    pub fn poll(&mut self) -> bool {
        self.player.poll(&self.store)
    }

    pub fn next_frame(&mut self) {
        self.player.next_frame(&self.store);
    }

    pub fn previous_frame(&mut self) {
        self.player.previous_frame(&self.store);
    }

    pub fn go_to_start(&mut self) {
        self.player.go_to_start();
    }

    pub fn go_to_end(&mut self) {
        self.player.go_to_end(&self.store);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.player.set_looping(looping);
    }

    // ----- accessors ---------------------------------------------------

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn set_frame_duration(&mut self, frame_index: usize, duration_ms: u32) {
        self.store.set_frame_duration(frame_index, duration_ms);
    }

    pub fn player(&self) -> &Player<C> {
        &self.player
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn animation_id(&self) -> &str {
        &self.animation_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
