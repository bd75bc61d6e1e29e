//! DXF file reader

mod binary_reader;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use binary_reader::{DxfBinaryReader, BINARY_SENTINEL};
pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::document::Drawing;
use crate::error::Result;
use crate::io::dxf::code_page::encoding_from_code_page;
use crate::types::DxfVersion;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// DXF file reader, for both the ASCII and the binary flavour
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    version: DxfVersion,
}

impl DxfReader {
    /// Create a new DXF reader from any reader
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);

        let reader: Box<dyn DxfStreamReader> = if Self::is_binary(&mut buf_reader)? {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader))
        };

        Ok(Self {
            reader,
            version: DxfVersion::Unknown,
        })
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Check if a stream starts with the binary DXF sentinel
    fn is_binary<R: Read + Seek>(reader: &mut R) -> Result<bool> {
        let mut buffer = [0u8; 22];
        let mut filled = 0;
        while filled < buffer.len() {
            let n = reader.read(&mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        // Always seek back to start after checking
        reader.seek(SeekFrom::Start(0))?;

        Ok(filled == buffer.len() && buffer == BINARY_SENTINEL)
    }

    /// Read the whole file into a [`Drawing`]
    pub fn read(mut self) -> Result<Drawing> {
        self.read_version()?;

        let mut drawing = Drawing::new();
        drawing.version = self.version;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "EOF") {
                break;
            }
            if !pair.is(0, "SECTION") {
                continue;
            }

            let Some(name) = self.reader.read_pair()? else {
                break;
            };
            if name.code != 2 {
                self.reader.push_back(name);
                continue;
            }

            match name.value_string.as_str() {
                "HEADER" => SectionReader::new(&mut self.reader).read_header(&mut drawing)?,
                "TABLES" => SectionReader::new(&mut self.reader).read_tables(&mut drawing)?,
                "BLOCKS" => SectionReader::new(&mut self.reader).read_blocks(&mut drawing)?,
                "ENTITIES" => SectionReader::new(&mut self.reader).read_entities(&mut drawing)?,
                other => {
                    tracing::trace!(section = other, "skipping section");
                    self.skip_section()?;
                }
            }
        }

        tracing::debug!(
            version = ?drawing.version,
            layers = drawing.layers.len(),
            blocks = drawing.block_count(),
            entities = drawing.entity_count(),
            "drawing read"
        );
        Ok(drawing)
    }

    /// Pre-scan the HEADER section for `$ACADVER` and `$DWGCODEPAGE`.
    ///
    /// Drawings older than AC1021 store text in the code page named by the
    /// header, so the stream's fallback encoding is switched before the
    /// full read starts again from the beginning.
    fn read_version(&mut self) -> Result<()> {
        let mut code_page: Option<String> = None;

        'scan: while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "SECTION") {
                match self.reader.read_pair()? {
                    Some(p) if p.is(2, "HEADER") => {}
                    // HEADER is always the first section when present
                    _ => break 'scan,
                }

                while let Some(pair) = self.reader.read_pair()? {
                    if pair.is(0, "ENDSEC") {
                        break 'scan;
                    }
                    if pair.is(9, "$ACADVER") {
                        if let Some(p) = self.reader.read_pair()? {
                            self.version = DxfVersion::from_version_string(&p.value_string);
                        }
                    } else if pair.is(9, "$DWGCODEPAGE") {
                        if let Some(p) = self.reader.read_pair()? {
                            code_page = Some(p.value_string);
                        }
                    }
                }
            }
        }

        if !self.version.is_unicode() {
            if let Some(encoding) = code_page.as_deref().and_then(encoding_from_code_page) {
                tracing::debug!(encoding = encoding.name(), "using drawing code page");
                self.reader.set_encoding(encoding);
            }
        }

        self.reader.reset()
    }

    /// Skip the current section
    fn skip_section(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityType;
    use std::io::Cursor;

    fn read_text(content: &str) -> Drawing {
        DxfReader::from_reader(Cursor::new(content.as_bytes().to_vec()))
            .unwrap()
            .read()
            .unwrap()
    }

    #[test]
    fn test_read_minimal_drawing() {
        let drawing = read_text(
            "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n9\n$INSUNITS\n70\n6\n0\nENDSEC\n\
             0\nSECTION\n2\nENTITIES\n0\nLINE\n8\nWalls\n10\n0\n20\n0\n11\n5\n21\n5\n0\nENDSEC\n0\nEOF\n",
        );
        assert_eq!(drawing.version, DxfVersion::AC1015);
        assert_eq!(drawing.header.insertion_units, 6);
        assert_eq!(drawing.entity_count(), 1);
        assert!(matches!(&drawing.entities()[0], EntityType::Line(l) if l.common.layer == "Walls"));
    }

    #[test]
    fn test_code_page_applies_to_old_drawings() {
        let mut content = b"0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n9\n$DWGCODEPAGE\n3\nANSI_1251\n0\nENDSEC\n\
0\nSECTION\n2\nENTITIES\n0\nTEXT\n8\n0\n1\n"
            .to_vec();
        // "Да" in windows-1251
        content.extend_from_slice(&[0xC4, 0xE0]);
        content.extend_from_slice(b"\n0\nENDSEC\n0\nEOF\n");

        let drawing = DxfReader::from_reader(Cursor::new(content))
            .unwrap()
            .read()
            .unwrap();
        assert_eq!(drawing.entities()[0].text().as_deref(), Some("Да"));
    }

    #[test]
    fn test_unknown_sections_are_skipped() {
        let drawing = read_text(
            "0\nSECTION\n2\nOBJECTS\n0\nDICTIONARY\n5\nC\n0\nENDSEC\n\
             0\nSECTION\n2\nENTITIES\n0\nPOINT\n10\n1\n20\n2\n0\nENDSEC\n0\nEOF\n",
        );
        assert_eq!(drawing.entity_count(), 1);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let reader = DxfReader::from_reader(Cursor::new(b"not a drawing\nat all\n".to_vec())).unwrap();
        assert!(reader.read().is_err());
    }
}
