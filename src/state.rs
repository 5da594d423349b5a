use crate::tools::ToolType;
use image::Rgba;
use serde::{Deserialize, Serialize};

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 50.0;

/// Mutable editor settings: active tool, brush size and color, eraser flag.
///
/// Owned by the single [`crate::editor::Editor`] session rather than living
/// in process-wide globals. Persisted between runs via eframe storage; the
/// color is stored as plain bytes so the struct stays serde-friendly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorState {
    pub tool: ToolType,
    pub brush_size: f32,
    pub brush_color: [u8; 4],
    pub eraser_mode: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            tool: ToolType::Brush,
            brush_size: 5.0,
            brush_color: [0, 0, 0, 255],
            eraser_mode: false,
        }
    }
}

impl EditorState {
    /// Select a tool. Picking the eraser raises the eraser flag; picking
    /// anything else lowers it.
    pub fn set_tool(&mut self, tool: ToolType) {
        self.tool = tool;
        self.eraser_mode = tool == ToolType::Eraser;
    }

    /// Flip the eraser flag, switching between eraser and brush.
    pub fn toggle_eraser(&mut self) {
        self.eraser_mode = !self.eraser_mode;
        self.tool = if self.eraser_mode {
            ToolType::Eraser
        } else {
            ToolType::Brush
        };
    }

    /// Brush stamp radius in pixels derived from the brush size slider.
    pub fn brush_radius(&self) -> i32 {
        (self.brush_size / 2.0).round() as i32
    }

    pub fn color(&self) -> Rgba<u8> {
        Rgba(self.brush_color)
    }
}
