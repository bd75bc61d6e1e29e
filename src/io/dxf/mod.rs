//! DXF (Drawing Exchange Format) reading

pub mod code_page;
mod dxf_code;
mod reader;

pub use dxf_code::GroupCodeValueType;
pub use reader::{
    DxfBinaryReader, DxfCodePair, DxfReader, DxfStreamReader, DxfTextReader, BINARY_SENTINEL,
};
