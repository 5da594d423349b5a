use crate::canvas::{self, Canvas};
use crate::error::EditorError;
use crate::file_io;
use crate::filters::{self, Filter};
use crate::history::History;
use crate::layer::LayerRegistry;
use crate::state::EditorState;
use crate::tools::ToolType;
use image::Rgba;
use std::path::{Path, PathBuf};

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// An in-progress drag on the canvas.
struct Gesture {
    tool: ToolType,
    start: (i32, i32),
    current: (i32, i32),
}

/// A shape drag the shell should preview as a vector overlay until it is
/// committed to the raster on release.
#[derive(Debug, Clone, Copy)]
pub struct ShapePreview {
    pub tool: ToolType,
    pub start: (i32, i32),
    pub current: (i32, i32),
}

/// The single-document editor session.
///
/// Owns the canvas, the undo history, the layer registry and the editor
/// settings; the shell routes input events here and renders whatever this
/// holds. Everything is synchronous on the UI thread.
pub struct Editor {
    canvas: Option<Canvas>,
    history: History,
    layers: LayerRegistry,
    pub state: EditorState,
    save_path: Option<PathBuf>,
    gesture: Option<Gesture>,
}

impl Editor {
    pub fn new(state: EditorState) -> Self {
        Self {
            canvas: None,
            history: History::new(),
            layers: LayerRegistry::new(),
            state,
            save_path: None,
            gesture: None,
        }
    }

    /// Create the framebuffer if it does not exist yet. Called by the shell
    /// once the canvas panel is laid out; until then capture is
    /// unavailable.
    pub fn realize_canvas(&mut self, width: u32, height: u32) {
        if self.canvas.is_none() {
            log::info!("realizing canvas at {width}x{height}");
            self.canvas = Some(Canvas::new(width, height));
        }
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerRegistry {
        &mut self.layers
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    /// Push the current canvas raster onto the undo stack (clearing redo).
    pub fn capture_state(&mut self) -> Result<(), EditorError> {
        let canvas = self.canvas.as_ref().ok_or(EditorError::CaptureUnavailable)?;
        self.history.capture(canvas);
        Ok(())
    }

    /// Roll back to the most recent captured state. No-op when the history
    /// is empty or the canvas is not realized.
    pub fn undo(&mut self) -> bool {
        match self.canvas.as_mut() {
            Some(canvas) => self.history.undo(canvas),
            None => false,
        }
    }

    /// Reapply the most recently undone state. No-op when nothing was
    /// undone.
    pub fn redo(&mut self) -> bool {
        match self.canvas.as_mut() {
            Some(canvas) => self.history.redo(canvas),
            None => false,
        }
    }

    fn active_color(&self) -> Rgba<u8> {
        if self.state.eraser_mode || self.state.tool == ToolType::Eraser {
            canvas::WHITE
        } else {
            self.state.color()
        }
    }

    /// Capture for a drawing action, downgrading an unrealized canvas to a
    /// logged no-op.
    fn capture_for_drawing(&mut self) -> bool {
        match self.capture_state() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("capture skipped: {err}");
                false
            }
        }
    }

    pub fn pointer_pressed(&mut self, x: i32, y: i32) {
        let radius = self.state.brush_radius();
        let color = self.active_color();
        match self.state.tool {
            ToolType::Fill => {
                if !self.capture_for_drawing() {
                    return;
                }
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.flood_fill(x, y, color);
                }
            }
            ToolType::Brush | ToolType::Eraser => {
                if !self.capture_for_drawing() {
                    return;
                }
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.stamp_brush(x, y, radius, color);
                }
                self.gesture = Some(Gesture {
                    tool: self.state.tool,
                    start: (x, y),
                    current: (x, y),
                });
            }
            shape => {
                if self.canvas.is_none() {
                    return;
                }
                self.gesture = Some(Gesture {
                    tool: shape,
                    start: (x, y),
                    current: (x, y),
                });
            }
        }
    }

    pub fn pointer_dragged(&mut self, x: i32, y: i32) {
        let radius = self.state.brush_radius();
        let color = self.active_color();
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        match gesture.tool {
            ToolType::Brush | ToolType::Eraser => {
                let from = gesture.current;
                gesture.current = (x, y);
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.brush_segment(from, (x, y), radius, color);
                }
            }
            // shapes only track the drag; the shell draws the preview
            _ => gesture.current = (x, y),
        }
    }

    pub fn pointer_released(&mut self, x: i32, y: i32) {
        let radius = self.state.brush_radius();
        let color = self.active_color();
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if !gesture.tool.is_shape() {
            return;
        }
        // shape commit: snapshot the pre-shape canvas, then rasterize
        if !self.capture_for_drawing() {
            return;
        }
        if let Some(canvas) = self.canvas.as_mut() {
            match gesture.tool {
                ToolType::Line => canvas.draw_line(gesture.start, (x, y), radius, color),
                ToolType::Rectangle => canvas.draw_rect(gesture.start, (x, y), radius, color),
                ToolType::Oval => canvas.draw_oval(gesture.start, (x, y), radius, color),
                _ => {}
            }
        }
    }

    /// The shape drag in flight, if any, for the shell's overlay preview.
    pub fn shape_preview(&self) -> Option<ShapePreview> {
        self.gesture
            .as_ref()
            .filter(|g| g.tool.is_shape())
            .map(|g| ShapePreview {
                tool: g.tool,
                start: g.start,
                current: g.current,
            })
    }

    /// Wipe the canvas to white, capturing the prior state first.
    pub fn clear_canvas(&mut self) -> Result<(), EditorError> {
        self.capture_state()?;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.clear(canvas::WHITE);
        }
        Ok(())
    }

    /// Apply a whole-canvas filter, capturing the prior state first.
    pub fn apply_filter(&mut self, filter: Filter) -> Result<(), EditorError> {
        self.capture_state()?;
        let canvas = self.canvas.as_mut().ok_or(EditorError::CaptureUnavailable)?;
        log::info!("applying {} filter", filter.name());
        let filtered = filters::apply(canvas.pixels(), filter);
        canvas.replace_pixels(filtered);
        Ok(())
    }

    /// Start over: white canvas, a single Background layer, no history, no
    /// remembered save path.
    pub fn new_document(&mut self) {
        match self.canvas.as_mut() {
            Some(canvas) => canvas.clear(canvas::WHITE),
            None => self.realize_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
        }
        self.layers = LayerRegistry::new();
        self.history.clear();
        self.save_path = None;
        self.gesture = None;
        log::info!("started a new document");
    }

    /// Load an image file into the canvas. With a realized canvas the prior
    /// content is captured and the image is painted into the fixed
    /// viewport, cropped as needed; otherwise the image's own dimensions
    /// become the viewport.
    pub fn open_file(&mut self, path: &Path) -> Result<(), EditorError> {
        let pixels = file_io::load(path)?;
        match self.canvas.as_mut() {
            Some(canvas) => {
                self.history.capture(canvas);
                canvas.blit_top_left(&pixels);
            }
            None => self.canvas = Some(Canvas::from_image(pixels)),
        }
        self.save_path = Some(path.to_owned());
        Ok(())
    }

    /// Save to the remembered path. `Ok(false)` means no path is remembered
    /// yet and the caller should ask for one.
    pub fn save_file(&mut self) -> Result<bool, EditorError> {
        match self.save_path.clone() {
            Some(path) => {
                self.save_file_as(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save to `path` and remember it for subsequent saves.
    pub fn save_file_as(&mut self, path: &Path) -> Result<(), EditorError> {
        let canvas = self.canvas.as_ref().ok_or(EditorError::CaptureUnavailable)?;
        file_io::save(path, canvas.pixels())?;
        self.save_path = Some(path.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_without_a_remembered_path_asks_the_caller() {
        let mut editor = Editor::new(EditorState::default());
        editor.realize_canvas(8, 8);
        assert!(matches!(editor.save_file(), Ok(false)));
    }

    #[test]
    fn saving_an_unrealized_canvas_is_capture_unavailable() {
        let mut editor = Editor::new(EditorState::default());
        let path = std::env::temp_dir().join("pixelpad_unrealized.png");
        assert!(matches!(
            editor.save_file_as(&path),
            Err(EditorError::CaptureUnavailable)
        ));
    }

    #[test]
    fn realize_canvas_is_idempotent() {
        let mut editor = Editor::new(EditorState::default());
        editor.realize_canvas(8, 8);
        editor.realize_canvas(100, 100);
        let canvas = editor.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (8, 8));
    }
}
