//! DXF group codes
//!
//! Group codes define the type of data that follows in a DXF file.
//! Each code range indicates what kind of value to expect (string, integer,
//! float, etc.). Binary DXF relies on this to know how many bytes to read.

/// Value type carried by a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCodeValueType {
    /// Null-terminated string
    String,
    /// 64-bit float
    Double,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// Single byte boolean
    Bool,
    /// Hex-encoded handle
    Handle,
    /// Binary chunk
    Chunk,
    /// Comment (999)
    Comment,
}

impl GroupCodeValueType {
    /// Classify a group code by its range
    pub fn from_code(code: i32) -> Self {
        use GroupCodeValueType::*;
        match code {
            0..=4 | 6..=9 => String,
            5 | 105 => Handle,
            10..=59 => Double,
            60..=79 => Int16,
            90..=99 => Int32,
            100..=102 => String,
            110..=149 => Double,
            160..=169 => Int64,
            170..=179 => Int16,
            210..=239 => Double,
            270..=289 => Int16,
            290..=299 => Bool,
            300..=309 => String,
            310..=319 => Chunk,
            320..=369 | 390..=399 | 480..=481 => Handle,
            370..=389 | 400..=409 => Int16,
            410..=419 | 430..=439 | 470..=479 => String,
            420..=429 | 440..=459 => Int32,
            460..=469 => Double,
            999 => Comment,
            1000..=1003 | 1005..=1009 => String,
            1004 => Chunk,
            1010..=1059 => Double,
            1060..=1070 => Int16,
            1071 => Int32,
            _ => String,
        }
    }

    /// Axis (0 = X, 1 = Y, 2 = Z) of a coordinate group code, if it is one
    pub fn coordinate_axis(code: i32) -> Option<usize> {
        match code {
            10..=18 | 110..=112 | 210 | 1010..=1013 => Some(0),
            20..=28 | 120..=122 | 220 | 1020..=1023 => Some(1),
            30..=37 | 130..=132 | 230 | 1030..=1033 => Some(2),
            _ => None,
        }
    }

    /// Which point a coordinate group code belongs to (10/20/30 share group 0)
    pub fn coordinate_group(code: i32) -> Option<usize> {
        Self::coordinate_axis(code).map(|_| (code % 10) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(GroupCodeValueType::from_code(0), GroupCodeValueType::String);
        assert_eq!(GroupCodeValueType::from_code(5), GroupCodeValueType::Handle);
        assert_eq!(GroupCodeValueType::from_code(10), GroupCodeValueType::Double);
        assert_eq!(GroupCodeValueType::from_code(70), GroupCodeValueType::Int16);
        assert_eq!(GroupCodeValueType::from_code(90), GroupCodeValueType::Int32);
        assert_eq!(GroupCodeValueType::from_code(290), GroupCodeValueType::Bool);
        assert_eq!(GroupCodeValueType::from_code(330), GroupCodeValueType::Handle);
        assert_eq!(GroupCodeValueType::from_code(370), GroupCodeValueType::Int16);
        assert_eq!(GroupCodeValueType::from_code(1071), GroupCodeValueType::Int32);
    }

    #[test]
    fn test_coordinate_groups() {
        assert_eq!(GroupCodeValueType::coordinate_axis(10), Some(0));
        assert_eq!(GroupCodeValueType::coordinate_axis(21), Some(1));
        assert_eq!(GroupCodeValueType::coordinate_axis(31), Some(2));
        assert_eq!(GroupCodeValueType::coordinate_axis(40), None);
        assert_eq!(GroupCodeValueType::coordinate_group(11), Some(1));
        assert_eq!(GroupCodeValueType::coordinate_group(21), Some(1));
        assert_eq!(GroupCodeValueType::coordinate_group(30), Some(0));
    }
}
