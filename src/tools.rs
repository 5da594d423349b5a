use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of drawing tools.
///
/// Brush and eraser paint while the pointer is dragged; line, rectangle and
/// oval are previewed during the drag and committed to the raster on
/// release; fill acts on press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Oval,
    Fill,
}

impl ToolType {
    /// All tools, in toolbar order.
    pub const ALL: [ToolType; 6] = [
        ToolType::Brush,
        ToolType::Eraser,
        ToolType::Line,
        ToolType::Rectangle,
        ToolType::Oval,
        ToolType::Fill,
    ];

    /// Display name shown in the toolbar, menus and status bar.
    pub fn name(self) -> &'static str {
        match self {
            ToolType::Brush => "Brush",
            ToolType::Eraser => "Eraser",
            ToolType::Line => "Line",
            ToolType::Rectangle => "Rectangle",
            ToolType::Oval => "Oval",
            ToolType::Fill => "Fill",
        }
    }

    /// True for tools that are previewed during the drag and rasterized
    /// only when the pointer is released.
    pub fn is_shape(self) -> bool {
        matches!(self, ToolType::Line | ToolType::Rectangle | ToolType::Oval)
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
