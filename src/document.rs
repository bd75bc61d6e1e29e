//! In-memory drawing produced by the DXF reader

use crate::entities::{Block, EntityType};
use crate::tables::{Layer, Table};
use crate::types::DxfVersion;
use ahash::AHashMap;

/// The handful of HEADER variables the converter cares about
#[derive(Debug, Clone, Default)]
pub struct HeaderVariables {
    /// `$DWGCODEPAGE`, e.g. `ANSI_1252`
    pub code_page: Option<String>,
    /// `$INSUNITS` (0 = unitless, 1 = inches, 4 = millimeters, 6 = meters, ...)
    pub insertion_units: i16,
}

/// A parsed drawing: layer table, block definitions and model/paper space entities
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    pub version: DxfVersion,
    pub header: HeaderVariables,
    pub layers: Table<Layer>,
    /// Block definitions keyed by upper-cased name
    blocks: AHashMap<String, Block>,
    entities: Vec<EntityType>,
}

impl Drawing {
    /// Create an empty drawing
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity from the ENTITIES section
    pub fn add_entity(&mut self, entity: EntityType) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[EntityType] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Register a block definition; a later definition with the same name wins
    pub fn add_block(&mut self, block: Block) {
        self.blocks.insert(block.name.to_uppercase(), block);
    }

    /// Look up a block definition (names are case-insensitive)
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(&name.to_uppercase())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_lookup_is_case_insensitive() {
        let mut drawing = Drawing::new();
        drawing.add_block(Block::new("Door"));
        assert!(drawing.block("DOOR").is_some());
        assert!(drawing.block("door").is_some());
        assert_eq!(drawing.block_count(), 1);
    }
}
