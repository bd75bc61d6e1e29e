//! Shared helpers for the integration tests: a small DXF writer and
//! sample drawings built with it.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dxf_geojson::io::dxf::BINARY_SENTINEL;
use std::fmt::Display;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds ASCII DXF text one group code at a time
#[derive(Debug, Default)]
pub struct DxfBuilder {
    out: String,
    pairs: Vec<(i32, String)>,
}

impl DxfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(mut self, code: i32, value: impl Display) -> Self {
        let value = value.to_string();
        self.out.push_str(&format!("{:>3}\n{}\n", code, value));
        self.pairs.push((code, value));
        self
    }

    pub fn header(self, version: &str) -> Self {
        self.pair(0, "SECTION")
            .pair(2, "HEADER")
            .pair(9, "$ACADVER")
            .pair(1, version)
            .pair(0, "ENDSEC")
    }

    pub fn layers(mut self, names: &[&str]) -> Self {
        self = self.pair(0, "SECTION").pair(2, "TABLES").pair(0, "TABLE").pair(2, "LAYER");
        for name in names {
            self = self.pair(0, "LAYER").pair(2, name).pair(70, 0).pair(62, 7);
        }
        self.pair(0, "ENDTAB").pair(0, "ENDSEC")
    }

    pub fn begin_blocks(self) -> Self {
        self.pair(0, "SECTION").pair(2, "BLOCKS")
    }

    pub fn begin_block(self, name: &str, base: (f64, f64)) -> Self {
        self.pair(0, "BLOCK")
            .pair(8, "0")
            .pair(2, name)
            .pair(70, 0)
            .pair(10, base.0)
            .pair(20, base.1)
            .pair(30, 0.0)
    }

    pub fn end_block(self) -> Self {
        self.pair(0, "ENDBLK").pair(8, "0")
    }

    pub fn begin_entities(self) -> Self {
        self.pair(0, "SECTION").pair(2, "ENTITIES")
    }

    pub fn end_section(self) -> Self {
        self.pair(0, "ENDSEC")
    }

    pub fn point(self, layer: &str, x: f64, y: f64) -> Self {
        self.pair(0, "POINT").pair(8, layer).pair(10, x).pair(20, y).pair(30, 0.0)
    }

    pub fn line(self, layer: &str, from: (f64, f64), to: (f64, f64)) -> Self {
        self.pair(0, "LINE")
            .pair(8, layer)
            .pair(10, from.0)
            .pair(20, from.1)
            .pair(30, 0.0)
            .pair(11, to.0)
            .pair(21, to.1)
            .pair(31, 0.0)
    }

    pub fn circle(self, layer: &str, center: (f64, f64), radius: f64) -> Self {
        self.pair(0, "CIRCLE")
            .pair(8, layer)
            .pair(10, center.0)
            .pair(20, center.1)
            .pair(30, 0.0)
            .pair(40, radius)
    }

    pub fn lwpolyline(mut self, layer: &str, points: &[(f64, f64)], closed: bool) -> Self {
        self = self
            .pair(0, "LWPOLYLINE")
            .pair(8, layer)
            .pair(90, points.len())
            .pair(70, if closed { 1 } else { 0 });
        for (x, y) in points {
            self = self.pair(10, x).pair(20, y);
        }
        self
    }

    pub fn text(self, layer: &str, at: (f64, f64), value: &str) -> Self {
        self.pair(0, "TEXT")
            .pair(8, layer)
            .pair(10, at.0)
            .pair(20, at.1)
            .pair(30, 0.0)
            .pair(40, 2.5)
            .pair(1, value)
    }

    pub fn insert(self, layer: &str, block: &str, at: (f64, f64)) -> Self {
        self.pair(0, "INSERT")
            .pair(8, layer)
            .pair(2, block)
            .pair(10, at.0)
            .pair(20, at.1)
            .pair(30, 0.0)
    }

    /// ASCII DXF text, terminated with `EOF`
    pub fn finish(self) -> String {
        let mut out = self.out;
        out.push_str("  0\nEOF\n");
        out
    }

    /// The same pairs as a binary DXF (16-bit group codes)
    pub fn finish_binary(self) -> Vec<u8> {
        let mut out = BINARY_SENTINEL.to_vec();
        let eof = (0, "EOF".to_string());
        for (code, value) in self.pairs.iter().chain(std::iter::once(&eof)) {
            out.extend_from_slice(&(*code as i16).to_le_bytes());
            match code {
                10..=59 | 210..=239 => {
                    let v: f64 = value.parse().unwrap();
                    out.extend_from_slice(&v.to_le_bytes());
                }
                60..=79 => {
                    let v: i16 = value.parse().unwrap();
                    out.extend_from_slice(&v.to_le_bytes());
                }
                90..=99 => {
                    let v: i32 = value.parse().unwrap();
                    out.extend_from_slice(&v.to_le_bytes());
                }
                _ => {
                    out.extend_from_slice(value.as_bytes());
                    out.push(0);
                }
            }
        }
        out
    }
}

/// Two roads, a parcel, a label and a block reference
pub fn site_plan() -> String {
    DxfBuilder::new()
        .header("AC1015")
        .layers(&["0", "Roads", "Parcels"])
        .begin_blocks()
        .begin_block("TREE", (0.0, 0.0))
        .circle("0", (0.0, 0.0), 1.0)
        .end_block()
        .end_section()
        .begin_entities()
        .line("Roads", (0.0, 0.0), (100.0, 0.0))
        .line("Roads", (100.0, 0.0), (100.0, 50.0))
        .lwpolyline(
            "Parcels",
            &[(10.0, 10.0), (40.0, 10.0), (40.0, 30.0), (10.0, 30.0)],
            true,
        )
        .text("Labels", (20.0, 20.0), "Lot 7")
        .insert("Trees", "TREE", (60.0, 25.0))
        .end_section()
        .finish()
}

/// Write a drawing into a temporary directory
pub fn write_temp(content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drawing.dxf");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn encode(content: &[u8]) -> String {
    STANDARD.encode(content)
}
