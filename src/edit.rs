//! Color-edit engine: reversible paint/erase operations over frame colors.
//!
//! Every primitive operation records-and-applies atomically into an open
//! batch; a batch is the unit of undo/redo and corresponds to one user
//! gesture (a click, a drag, a flood fill, a paste). History is bounded:
//! once more than [`MAX_UNDO_STEPS`] batches are committed, the oldest
//! falls off. Committing a new batch clears the redo stack - standard
//! linear-history semantics.
//!
//! Failure policy: every operation is total. Out-of-range frame indices,
//! absent color entries, and same-color repaints are silent no-ops, since
//! painting is driven by high-frequency pointer events where redundant
//! calls are routine. Only [`crate::palette`] fails loudly.

use std::collections::VecDeque;

use crate::models::{Frame, Position};
use crate::raster;

/// Maximum number of committed batches kept for undo.
pub const MAX_UNDO_STEPS: usize = 10;

/// Whether an action set a color or removed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Paint,
    Erase,
}

/// A single reversible unit of color change.
///
/// `previous_color` is `None` when the position had no color before the
/// action, meaning undo must delete the entry rather than set one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditAction {
    pub kind: EditKind,
    pub position: Position,
    pub previous_color: Option<u8>,
    pub new_color: Option<u8>,
    pub frame_index: usize,
}

/// One undoable unit: the ordered actions of a single gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBatch {
    actions: Vec<EditAction>,
}

impl EditBatch {
    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }
}

/// The edit state machine: open batch plus undo/redo stacks.
///
/// The engine never owns frames; callers pass the store's live sequence
/// (`&mut [Frame]`) into each call, which keeps exactly one writer at a
/// time by construction.
#[derive(Debug, Default)]
pub struct EditEngine {
    undo_stack: VecDeque<EditBatch>,
    redo_stack: Vec<EditBatch>,
    current_batch: Vec<EditAction>,
}

impl EditEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new gesture, discarding any uncommitted batch.
    pub fn start_batch(&mut self) {
        self.current_batch.clear();
    }

    /// Appends an already-applied action to the open batch.
    pub fn add_action(&mut self, action: EditAction) {
        self.current_batch.push(action);
    }

    /// Commits the open batch to the undo stack. Empty batches are
    /// dropped; a committed batch evicts the oldest entry beyond the
    /// history bound and clears the redo stack.
    pub fn commit_batch(&mut self) {
        if self.current_batch.is_empty() {
            return;
        }
        let actions = std::mem::take(&mut self.current_batch);
        self.undo_stack.push_back(EditBatch { actions });
        if self.undo_stack.len() > MAX_UNDO_STEPS {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Paints one cell. Repainting with the color already present records
    /// nothing and changes nothing.
    pub fn paint_character(
        &mut self,
        frames: &mut [Frame],
        frame_index: usize,
        row: usize,
        col: usize,
        color_index: u8,
    ) {
        let Some(frame) = frames.get_mut(frame_index) else {
            return;
        };
        let position = Position::new(row, col);
        let previous_color = frame.colors.get(&position).copied();
        if previous_color == Some(color_index) {
            return;
        }
        self.add_action(EditAction {
            kind: EditKind::Paint,
            position,
            previous_color,
            new_color: Some(color_index),
            frame_index,
        });
        frame.colors.insert(position, color_index);
    }

    /// Removes one cell's color. A cell with no color is a no-op.
    pub fn erase_character(
        &mut self,
        frames: &mut [Frame],
        frame_index: usize,
        row: usize,
        col: usize,
    ) {
        let Some(frame) = frames.get_mut(frame_index) else {
            return;
        };
        let position = Position::new(row, col);
        let Some(previous) = frame.colors.get(&position).copied() else {
            return;
        };
        self.add_action(EditAction {
            kind: EditKind::Erase,
            position,
            previous_color: Some(previous),
            new_color: None,
            frame_index,
        });
        frame.colors.remove(&position);
    }

    /// Paints every cell on the straight line between the endpoints,
    /// start to end inclusive, one action per cell.
    pub fn paint_line(
        &mut self,
        frames: &mut [Frame],
        frame_index: usize,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        color_index: u8,
    ) {
        for cell in raster::line_cells(start_row, start_col, end_row, end_col) {
            self.paint_character(frames, frame_index, cell.row, cell.col, color_index);
        }
    }

    /// Flood-fills the 4-connected region around the seed.
    ///
    /// The target is the seed's current color, "no color" included. When
    /// the new color already equals the target this is a no-op. Each
    /// discovered cell is painted individually so the whole fill undoes
    /// as one batch of per-cell actions.
    pub fn flood_fill(
        &mut self,
        frames: &mut [Frame],
        frame_index: usize,
        row: usize,
        col: usize,
        new_color: u8,
    ) {
        let seed = Position::new(row, col);
        let region = match frames.get(frame_index) {
            Some(frame) => {
                if frame.colors.get(&seed).copied() == Some(new_color) {
                    return;
                }
                raster::fill_region(&frame.grid(), &frame.colors, seed)
            }
            None => return,
        };
        for cell in region {
            self.paint_character(frames, frame_index, cell.row, cell.col, new_color);
        }
    }

    /// Reverts the most recent batch, replaying its actions in reverse
    /// order. Returns false when there is nothing to undo.
    pub fn undo(&mut self, frames: &mut [Frame]) -> bool {
        let Some(batch) = self.undo_stack.pop_back() else {
            return false;
        };
        for action in batch.actions.iter().rev() {
            let Some(frame) = frames.get_mut(action.frame_index) else {
                continue;
            };
            match action.previous_color {
                Some(color) => {
                    frame.colors.insert(action.position, color);
                }
                None => {
                    frame.colors.remove(&action.position);
                }
            }
        }
        self.redo_stack.push(batch);
        true
    }

    /// Re-applies the most recently undone batch in forward order.
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, frames: &mut [Frame]) -> bool {
        let Some(batch) = self.redo_stack.pop() else {
            return false;
        };
        for action in &batch.actions {
            apply_action(frames, action);
        }
        self.undo_stack.push_back(batch);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed batches currently undoable.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of actions accumulated in the open batch.
    pub fn open_action_count(&self) -> usize {
        self.current_batch.len()
    }

    /// Drops both stacks and the open batch. Required whenever the frame
    /// sequence is replaced wholesale - stale actions must not replay
    /// against unrelated frames.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch.clear();
    }
}

fn apply_action(frames: &mut [Frame], action: &EditAction) {
    let Some(frame) = frames.get_mut(action.frame_index) else {
        return;
    };
    match action.kind {
        EditKind::Paint => {
            if let Some(color) = action.new_color {
                frame.colors.insert(action.position, color);
            }
        }
        EditKind::Erase => {
            frame.colors.remove(&action.position);
        }
    }
}
