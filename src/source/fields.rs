//! Attribute schema shared by every source layer

use crate::geometry::PlacedEntity;
use std::fmt;

/// Storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

/// Name and type of one attribute field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefn {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldDefn {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        FieldDefn { name, field_type }
    }
}

/// Fields of every drawing layer, in order
pub const SCHEMA: [FieldDefn; 6] = [
    FieldDefn::new("Layer", FieldType::String),
    FieldDefn::new("PaperSpace", FieldType::Integer),
    FieldDefn::new("SubClasses", FieldType::String),
    FieldDefn::new("Linetype", FieldType::String),
    FieldDefn::new("EntityHandle", FieldType::String),
    FieldDefn::new("Text", FieldType::String),
];

/// Position of `name` in [`SCHEMA`], ignoring ASCII case
pub fn field_index(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|f| f.name.eq_ignore_ascii_case(name))
}

/// Value of one field; unset fields are [`FieldValue::Null`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Integer(i64),
    String(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::String)
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Integer(i) => (*i).into(),
            FieldValue::String(s) => s.clone().into(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

/// Field values for a placed entity, in [`SCHEMA`] order
pub(crate) fn field_values(placed: &PlacedEntity<'_>) -> Vec<FieldValue> {
    let common = placed.common;
    let subclasses = (!common.subclasses.is_empty()).then(|| common.subclasses.join(":"));

    vec![
        FieldValue::String(placed.layer.clone()),
        if common.paper_space {
            FieldValue::Integer(1)
        } else {
            FieldValue::Null
        },
        subclasses.into(),
        common.line_type.clone().into(),
        placed.handle.clone().into(),
        placed.text.clone().into(),
    ]
}
