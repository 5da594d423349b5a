use crate::canvas::{Canvas, Snapshot};

/// Manages the undo/redo history as two stacks of whole-canvas snapshots.
///
/// Capturing the full raster instead of per-operation deltas trades memory
/// for uniform correctness: strokes, shapes, fills and filters are all
/// rolled back the same way. The stacks are unbounded.
#[derive(Default)]
pub struct History {
    /// Prior canvas states, older to newer; top is the most recent.
    undo_stack: Vec<Snapshot>,
    /// States undone, most recently undone on top.
    redo_stack: Vec<Snapshot>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the current canvas raster onto the undo stack. Any pending redo
    /// states are invalidated by the new timeline and dropped.
    pub fn capture(&mut self, canvas: &Canvas) {
        self.undo_stack.push(canvas.snapshot());
        self.redo_stack.clear();
    }

    /// Roll the canvas back to the most recent prior state. The current
    /// raster moves onto the redo stack. Returns `false` (and changes
    /// nothing) when there is nothing to undo.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(prior) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(canvas.snapshot());
        canvas.restore(&prior);
        true
    }

    /// Reapply the most recently undone state. Symmetric to [`Self::undo`]:
    /// the current raster moves onto the undo stack. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(canvas.snapshot());
        canvas.restore(&next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history. Used by "new file" and "open".
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
