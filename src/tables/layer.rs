//! Layer table entry

use super::TableEntry;
use bitflags::bitflags;

bitflags! {
    /// Standard flags (group code 70) of a LAYER record
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 1;
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        const LOCKED = 4;
        const XREF_DEPENDENT = 16;
        const XREF_RESOLVED = 32;
    }
}

/// A layer table entry
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Layer flags
    pub flags: LayerFlags,
    /// ACI color; negative when the layer is switched off
    pub color_index: i16,
    /// Line type name
    pub line_type: String,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            flags: LayerFlags::empty(),
            color_index: 7,
            line_type: "Continuous".to_string(),
        }
    }

    /// Layer is switched off (negative color)
    pub fn is_off(&self) -> bool {
        self.color_index < 0
    }

    /// Layer is frozen
    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }
}

impl TableEntry for Layer {
    fn name(&self) -> &str {
        &self.name
    }
}
