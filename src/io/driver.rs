//! Format drivers
//!
//! A driver recognises a file from its first bytes and opens it into a
//! [`Drawing`]. The process-wide [`DRIVERS`] registry tries each driver in
//! turn, so callers never pick a format themselves.

use crate::document::Drawing;
use crate::error::{DxfError, Result};
use crate::io::dxf::{DxfReader, BINARY_SENTINEL};
use once_cell::sync::Lazy;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes handed to [`Driver::probe`]
const PROBE_LEN: usize = 4096;

/// A file format the geometry source can open
pub trait Driver: Send + Sync {
    /// Short driver name, e.g. `DXF`
    fn name(&self) -> &'static str;

    /// True when the leading bytes look like this driver's format
    fn probe(&self, header: &[u8]) -> bool;

    /// Parse the file
    fn open(&self, path: &Path) -> Result<Drawing>;
}

/// ASCII DXF
#[derive(Debug, Default)]
pub struct DxfTextDriver;

impl Driver for DxfTextDriver {
    fn name(&self) -> &'static str {
        "DXF"
    }

    fn probe(&self, header: &[u8]) -> bool {
        let header = header.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(header);
        let text = String::from_utf8_lossy(header);

        // The first line is a group code: 0 for SECTION, 999 for a comment
        let first_code = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.parse::<i32>().ok());

        first_code.is_some() && text.contains("SECTION")
    }

    fn open(&self, path: &Path) -> Result<Drawing> {
        DxfReader::from_file(path)?.read()
    }
}

/// Binary DXF
#[derive(Debug, Default)]
pub struct DxfBinaryDriver;

impl Driver for DxfBinaryDriver {
    fn name(&self) -> &'static str {
        "DXF-Binary"
    }

    fn probe(&self, header: &[u8]) -> bool {
        header.starts_with(BINARY_SENTINEL)
    }

    fn open(&self, path: &Path) -> Result<Drawing> {
        DxfReader::from_file(path)?.read()
    }
}

/// Ordered set of drivers
pub struct DriverRegistry {
    drivers: Vec<Box<dyn Driver>>,
}

impl DriverRegistry {
    /// Registry with every built-in driver; binary first since its probe is exact
    pub fn with_defaults() -> Self {
        Self {
            drivers: vec![Box::new(DxfBinaryDriver), Box::new(DxfTextDriver)],
        }
    }

    /// Names of the registered drivers, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.drivers.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names
    }

    /// First driver whose probe accepts the header
    pub fn identify(&self, header: &[u8]) -> Option<&dyn Driver> {
        self.drivers
            .iter()
            .find(|d| d.probe(header))
            .map(|d| d.as_ref())
    }

    /// Identify and open a file, returning the driver name with the drawing
    pub fn open(&self, path: &Path) -> Result<(&'static str, Drawing)> {
        let mut header = Vec::with_capacity(PROBE_LEN);
        File::open(path)?
            .take(PROBE_LEN as u64)
            .read_to_end(&mut header)?;

        let driver = self.identify(&header).ok_or_else(|| {
            DxfError::InvalidFormat(format!("no driver recognises {}", path.display()))
        })?;
        tracing::debug!(driver = driver.name(), path = %path.display(), "opening drawing");

        Ok((driver.name(), driver.open(path)?))
    }
}

/// Process-wide driver registry
pub static DRIVERS: Lazy<DriverRegistry> = Lazy::new(DriverRegistry::with_defaults);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_names() {
        assert_eq!(DRIVERS.names(), vec!["DXF", "DXF-Binary"]);
    }

    #[test]
    fn test_identify() {
        let text = b"  0\nSECTION\n  2\nHEADER\n";
        assert_eq!(DRIVERS.identify(text).map(|d| d.name()), Some("DXF"));

        let mut binary = BINARY_SENTINEL.to_vec();
        binary.extend_from_slice(b"\0\0SECTION\0");
        assert_eq!(DRIVERS.identify(&binary).map(|d| d.name()), Some("DXF-Binary"));

        assert!(DRIVERS.identify(b"%PDF-1.7\n").is_none());
        assert!(DRIVERS.identify(b"").is_none());
    }

    #[test]
    fn test_open_unrecognised_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.dxf");
        std::fs::write(&path, b"hello world").unwrap();
        assert!(matches!(DRIVERS.open(&path), Err(DxfError::InvalidFormat(_))));
    }
}
