//! Block definitions and the entities that place them

use super::{EntityCommon, EntityType, Text};
use crate::types::{Transform, Vector3};

/// A block definition from the BLOCKS section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub name: String,
    /// Base point subtracted from every entity when the block is placed
    pub base_point: Vector3,
    pub flags: i16,
    pub entities: Vec<EntityType>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Block reference (`INSERT`), possibly an array (`MINSERT`)
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    pub block_name: String,
    /// Insertion point (OCS)
    pub insertion: Vector3,
    pub scale: Vector3,
    /// Degrees
    pub rotation: f64,
    pub columns: u16,
    pub rows: u16,
    pub column_spacing: f64,
    pub row_spacing: f64,
    /// ATTRIB entities following the insert
    pub attributes: Vec<Text>,
}

impl Insert {
    pub fn new(block_name: impl Into<String>) -> Self {
        Insert {
            common: EntityCommon::new(),
            block_name: block_name.into(),
            insertion: Vector3::ZERO,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: 0.0,
            columns: 1,
            rows: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
            attributes: Vec::new(),
        }
    }

    /// Number of array cells; `None` if it does not fit in `usize`
    pub fn cell_count(&self) -> Option<usize> {
        usize::from(self.columns.max(1)).checked_mul(usize::from(self.rows.max(1)))
    }

    /// Block-to-world transform of every array cell, row by row
    pub fn placements(&self, base_point: Vector3) -> impl Iterator<Item = Transform> + '_ {
        let ocs = Transform::from_extrusion(self.common.extrusion);
        let rotation = Transform::from_rotation_z(self.rotation.to_radians());
        let columns = self.columns.max(1);
        let rows = self.rows.max(1);

        (0..rows)
            .flat_map(move |row| (0..columns).map(move |column| (row, column)))
            .map(move |(row, column)| {
                let offset = Vector3::new(
                    column as f64 * self.column_spacing,
                    row as f64 * self.row_spacing,
                    0.0,
                );
                Transform::from_translation(-base_point)
                    .then(&Transform::from_scaling(self.scale))
                    .then(&Transform::from_translation(offset))
                    .then(&rotation)
                    .then(&Transform::from_translation(self.insertion))
                    .then(&ocs)
            })
    }
}

/// Dimension; its graphics live in an anonymous block (`*D<n>`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dimension {
    pub common: EntityCommon,
    pub block_name: Option<String>,
}

impl Dimension {
    pub fn new() -> Self {
        Self::default()
    }
}
