//! Core geometric and version types

pub mod bounds;
pub mod transform;
pub mod vector;

pub use bounds::BoundingBox2D;
pub use transform::Transform;
pub use vector::{Vector2, Vector3};

/// AutoCAD release a drawing was saved with, from `$ACADVER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    Unknown,
    /// R12
    AC1009,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// 2000
    AC1015,
    /// 2004
    AC1018,
    /// 2007
    AC1021,
    /// 2010
    AC1024,
    /// 2013
    AC1027,
    /// 2018
    AC1032,
}

impl DxfVersion {
    /// Parse the `$ACADVER` value
    pub fn from_version_string(value: &str) -> Self {
        match value.trim() {
            "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// Drawings from AutoCAD 2007 on are always UTF-8
    pub fn is_unicode(&self) -> bool {
        *self >= DxfVersion::AC1021
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::Unknown
    }
}
