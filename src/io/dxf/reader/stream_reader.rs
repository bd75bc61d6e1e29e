//! DXF stream reader trait and common types

use crate::error::Result;
use crate::io::dxf::GroupCodeValueType;
use crate::types::Vector3;
use encoding_rs::Encoding;

/// A DXF code/value pair
#[derive(Debug, Clone)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,

    /// String representation of the value
    pub value_string: String,

    /// Integer value (if applicable)
    pub value_int: Option<i64>,

    /// Floating-point value (if applicable)
    pub value_double: Option<f64>,
}

impl DxfCodePair {
    /// Create a pair from the textual value, parsing it by the code's type
    pub fn new(code: i32, value_string: String) -> Self {
        let (value_int, value_double) = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::Int16
            | GroupCodeValueType::Int32
            | GroupCodeValueType::Int64
            | GroupCodeValueType::Bool => (value_string.trim().parse::<i64>().ok(), None),
            GroupCodeValueType::Double => (None, value_string.trim().parse::<f64>().ok()),
            _ => (None, None),
        };

        Self {
            code,
            value_string,
            value_int,
            value_double,
        }
    }

    /// Create a pair from an already-decoded integer (binary DXF)
    pub fn from_int(code: i32, value: i64) -> Self {
        Self {
            code,
            value_string: value.to_string(),
            value_int: Some(value),
            value_double: None,
        }
    }

    /// Create a pair from an already-decoded float (binary DXF)
    pub fn from_double(code: i32, value: f64) -> Self {
        Self {
            code,
            value_string: value.to_string(),
            value_int: None,
            value_double: Some(value),
        }
    }

    /// True for a structural marker such as `0/SECTION`
    pub fn is(&self, code: i32, value: &str) -> bool {
        self.code == code && self.value_string == value
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Option<i16> {
        self.value_int.and_then(|v| i16::try_from(v).ok())
    }

    /// Get value as i32
    pub fn as_i32(&self) -> Option<i32> {
        self.value_int.and_then(|v| i32::try_from(v).ok())
    }

    /// Get value as double
    pub fn as_double(&self) -> Option<f64> {
        self.value_double
    }
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Push a pair back; pushed pairs are returned last-in first-out
    fn push_back(&mut self, pair: DxfCodePair);

    /// Reset the reader to the beginning
    fn reset(&mut self) -> Result<()>;

    /// Fallback encoding for non-UTF-8 text
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Helper for reading 3D points from consecutive code pairs
#[derive(Debug, Default)]
pub struct PointReader {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

impl PointReader {
    /// Create a new point reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate value; returns false if the pair is not a coordinate
    pub fn add_coordinate(&mut self, pair: &DxfCodePair) -> bool {
        let (Some(axis), Some(value)) = (
            GroupCodeValueType::coordinate_axis(pair.code),
            pair.as_double(),
        ) else {
            return false;
        };
        match axis {
            0 => self.x = Some(value),
            1 => self.y = Some(value),
            _ => self.z = Some(value),
        }
        true
    }

    /// Get the point (returns Vector3 with z=0 if z not provided)
    pub fn get_point(&self) -> Option<Vector3> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Vector3::new(x, y, self.z.unwrap_or(0.0))),
            _ => None,
        }
    }

    /// Get the point, taking missing components from `default`
    ///
    /// Returns `None` only when no coordinate was read at all.
    pub fn get_point_or(&self, default: Vector3) -> Option<Vector3> {
        if self.x.is_none() && self.y.is_none() && self.z.is_none() {
            return None;
        }
        Some(Vector3::new(
            self.x.unwrap_or(default.x),
            self.y.unwrap_or(default.y),
            self.z.unwrap_or(default.z),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parsing() {
        let pair = DxfCodePair::new(70, " 42".to_string());
        assert_eq!(pair.as_i16(), Some(42));
        assert_eq!(pair.as_double(), None);

        let pair = DxfCodePair::new(10, "1.5".to_string());
        assert_eq!(pair.as_double(), Some(1.5));

        let pair = DxfCodePair::new(8, "WALLS".to_string());
        assert_eq!(pair.value_int, None);
        assert!(pair.is(8, "WALLS"));
    }

    #[test]
    fn test_point_reader() {
        let mut reader = PointReader::new();
        assert!(reader.add_coordinate(&DxfCodePair::new(10, "1.0".into())));
        assert!(reader.get_point().is_none());
        assert!(reader.add_coordinate(&DxfCodePair::new(20, "2.0".into())));
        assert!(!reader.add_coordinate(&DxfCodePair::new(40, "9.0".into())));
        assert_eq!(reader.get_point(), Some(Vector3::new(1.0, 2.0, 0.0)));
        reader.add_coordinate(&DxfCodePair::new(30, "3.0".into()));
        assert_eq!(reader.get_point(), Some(Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_partial_extrusion() {
        let mut reader = PointReader::new();
        assert_eq!(reader.get_point_or(Vector3::ZERO), None);
        reader.add_coordinate(&DxfCodePair::new(230, "-1.0".into()));
        assert_eq!(
            reader.get_point_or(Vector3::ZERO),
            Some(Vector3::new(0.0, 0.0, -1.0))
        );
    }
}
