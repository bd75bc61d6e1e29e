//! DXF binary reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};

/// Sentinel at the start of every binary DXF file
pub const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF\r\n\x1a\0";

/// DXF binary file reader
///
/// R12 files store group codes in one byte (255 escapes a 16-bit code),
/// later releases always use 16 bits. The width is detected from the first
/// pair, which is always `0/SECTION`.
pub struct DxfBinaryReader<R: Read + Seek> {
    reader: BufReader<R>,
    wide_codes: bool,
    pushed_back: Vec<DxfCodePair>,
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfBinaryReader<R> {
    /// Create a binary reader, validating the sentinel
    pub fn new(mut reader: BufReader<R>) -> Result<Self> {
        let mut sentinel = [0u8; 22];
        reader.read_exact(&mut sentinel)?;
        if sentinel != BINARY_SENTINEL {
            return Err(DxfError::InvalidFormat(
                "missing binary DXF sentinel".to_string(),
            ));
        }

        // 0x00 'S' → one-byte code followed by "SECTION"
        let wide_codes = {
            let head = reader.fill_buf()?;
            !(head.len() >= 2 && head[0] == 0 && head[1] == b'S')
        };

        Ok(Self {
            reader,
            wide_codes,
            pushed_back: Vec::new(),
            encoding: None,
        })
    }

    fn read_code(&mut self) -> Result<Option<i32>> {
        let first = match self.reader.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if self.wide_codes {
            let second = self.reader.read_u8()?;
            Ok(Some(i16::from_le_bytes([first, second]) as i32))
        } else if first == 255 {
            Ok(Some(self.reader.read_i16::<LittleEndian>()? as i32))
        } else {
            Ok(Some(first as i32))
        }
    }

    fn read_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        if bytes.last() == Some(&0) {
            bytes.pop();
        } else {
            return Err(DxfError::Parse("unterminated string in binary DXF".into()));
        }
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(err) => {
                let bytes = err.into_bytes();
                match self.encoding {
                    Some(enc) => enc.decode(&bytes).0.into_owned(),
                    None => bytes.iter().map(|&b| b as char).collect(),
                }
            }
        })
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let Some(code) = self.read_code()? else {
            return Ok(None);
        };

        let pair = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::Double => {
                DxfCodePair::from_double(code, self.reader.read_f64::<LittleEndian>()?)
            }
            GroupCodeValueType::Int16 => {
                DxfCodePair::from_int(code, self.reader.read_i16::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int32 => {
                DxfCodePair::from_int(code, self.reader.read_i32::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int64 => {
                DxfCodePair::from_int(code, self.reader.read_i64::<LittleEndian>()?)
            }
            GroupCodeValueType::Bool => {
                DxfCodePair::from_int(code, self.reader.read_u8()? as i64)
            }
            GroupCodeValueType::Chunk => {
                let len = self.reader.read_u8()? as usize;
                let mut chunk = vec![0u8; len];
                self.reader.read_exact(&mut chunk)?;
                let hex: String = chunk.iter().map(|b| format!("{:02X}", b)).collect();
                DxfCodePair::new(code, hex)
            }
            GroupCodeValueType::String
            | GroupCodeValueType::Handle
            | GroupCodeValueType::Comment => {
                let value = self.read_string()?;
                DxfCodePair::new(code, value)
            }
        };

        Ok(Some(pair))
    }
}

impl<R: Read + Seek> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.pushed_back.pop() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.pushed_back.push(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(BINARY_SENTINEL.len() as u64))?;
        self.pushed_back.clear();
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn binary(body: &[u8]) -> DxfBinaryReader<Cursor<Vec<u8>>> {
        let mut data = BINARY_SENTINEL.to_vec();
        data.extend_from_slice(body);
        DxfBinaryReader::new(BufReader::new(Cursor::new(data))).unwrap()
    }

    #[test]
    fn test_rejects_missing_sentinel() {
        let data = vec![0u8; 32];
        assert!(DxfBinaryReader::new(BufReader::new(Cursor::new(data))).is_err());
    }

    #[test]
    fn test_wide_codes() {
        let mut body = vec![0, 0];
        body.extend_from_slice(b"SECTION\0");
        body.extend_from_slice(&[10, 0]);
        body.extend_from_slice(&2.5f64.to_le_bytes());
        body.extend_from_slice(&[70, 0]);
        body.extend_from_slice(&7i16.to_le_bytes());

        let mut reader = binary(&body);
        assert!(reader.read_pair().unwrap().unwrap().is(0, "SECTION"));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_double(), Some(2.5));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_i16(), Some(7));
        assert!(reader.read_pair().unwrap().is_none());
    }

    #[test]
    fn test_narrow_codes() {
        let mut body = vec![0];
        body.extend_from_slice(b"SECTION\0");
        body.push(2);
        body.extend_from_slice(b"ENTITIES\0");

        let mut reader = binary(&body);
        assert!(reader.read_pair().unwrap().unwrap().is(0, "SECTION"));
        assert!(reader.read_pair().unwrap().unwrap().is(2, "ENTITIES"));
    }

    #[test]
    fn test_reset_returns_to_first_pair() {
        let mut body = vec![0, 0];
        body.extend_from_slice(b"SECTION\0");
        let mut reader = binary(&body);
        reader.read_pair().unwrap();
        reader.reset().unwrap();
        assert!(reader.read_pair().unwrap().unwrap().is(0, "SECTION"));
    }
}
