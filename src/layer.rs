use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a layer
///
/// Identities are assigned monotonically starting at 1 and are never
/// reused, even when deletions leave gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(u64);

impl LayerId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Opacity in [0, 1]
    pub opacity: f32,
}

/// The ordered sequence of layer records behind the layers panel.
///
/// Order defines the intended compositing order and the display-list order.
/// `visible` and `opacity` are recorded and editable but not consumed by
/// any compositing pass. The registry always holds at least one layer while
/// a document is open.
pub struct LayerRegistry {
    layers: Vec<Layer>,
    next_id: u64,
    revision: u64,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerRegistry {
    /// A fresh registry holding the initial "Background" layer.
    pub fn new() -> Self {
        let mut registry = Self {
            layers: Vec::new(),
            next_id: 1,
            revision: 0,
        };
        registry.add_layer("Background");
        registry
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Bumped on every successful mutation; the display list watches this.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Append a new layer record, visible and fully opaque.
    pub fn add_layer(&mut self, name: &str) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            name: name.to_string(),
            visible: true,
            opacity: 1.0,
        });
        self.touch();
        id
    }

    /// Remove the record at `index`. Refused when it is the last remaining
    /// layer or `index` is out of bounds.
    pub fn delete_layer(&mut self, index: usize) -> Result<Layer, EditorError> {
        if self.layers.len() <= 1 {
            return Err(EditorError::InvalidOperation(
                "cannot delete the last remaining layer",
            ));
        }
        if index >= self.layers.len() {
            return Err(EditorError::InvalidOperation("layer index out of range"));
        }
        let removed = self.layers.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Swap the record at `index` with its neighbor toward the front.
    /// No-op (not an error) at the boundary or out of bounds.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.layers.len() {
            return false;
        }
        self.layers.swap(index, index - 1);
        self.touch();
        true
    }

    /// Swap the record at `index` with its neighbor toward the back.
    /// No-op (not an error) at the boundary or out of bounds.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.layers.len() {
            return false;
        }
        self.layers.swap(index, index + 1);
        self.touch();
        true
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.visible = visible;
            self.touch();
        }
    }

    pub fn set_opacity(&mut self, index: usize, opacity: f32) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.opacity = opacity.clamp(0.0, 1.0);
            self.touch();
        }
    }

    pub fn rename(&mut self, index: usize, name: String) {
        if let Some(layer) = self.layers.get_mut(index) {
            layer.name = name;
            self.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_is_clamped_to_unit_range() {
        let mut registry = LayerRegistry::new();
        registry.set_opacity(0, 2.5);
        assert_eq!(registry.layers()[0].opacity, 1.0);
        registry.set_opacity(0, -0.5);
        assert_eq!(registry.layers()[0].opacity, 0.0);
    }

    #[test]
    fn metadata_edits_bump_the_revision() {
        let mut registry = LayerRegistry::new();
        let before = registry.revision();
        registry.set_visible(0, false);
        assert!(registry.revision() > before);
        assert!(!registry.layers()[0].visible);
    }

    #[test]
    fn out_of_range_metadata_edits_are_ignored() {
        let mut registry = LayerRegistry::new();
        let before = registry.revision();
        registry.set_visible(9, false);
        registry.rename(9, "ghost".into());
        assert_eq!(registry.revision(), before);
    }
}
