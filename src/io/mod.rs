//! Reading drawings from disk

pub mod driver;
pub mod dxf;

pub use driver::{Driver, DriverRegistry, DRIVERS};
pub use dxf::DxfReader;
