//! Stream headers of the metadata root (ECMA-335 II.24.2.2).

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// Longest stream name the format allows, including the terminator
const MAX_NAME_LEN: usize = 32;

/// Location and name of one metadata stream
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream, e.g. `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Parse a stream header at the start of `data`
    ///
    /// The name is not checked against the known stream names; unknown streams are the
    /// loader's decision to skip.
    ///
    /// # Errors
    /// Returns an error if `data` is truncated or the name is not terminated within 32 bytes
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name_area = &data[8..std::cmp::min(data.len(), 8 + MAX_NAME_LEN)];
        let Some(name_len) = name_area.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let name = std::str::from_utf8(&name_area[..name_len])
            .map_err(|_| malformed_error!("Stream header name is not valid UTF-8"))?;

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name: name.to_string(),
        })
    }

    /// Bytes this header occupies, including the 4-byte aligned name
    #[must_use]
    pub fn header_size(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,
        ];

        let parsed_header = StreamHeader::from(&header_bytes).unwrap();

        assert_eq!(parsed_header.offset, 0x6C);
        assert_eq!(parsed_header.size, 0x45A4);
        assert_eq!(parsed_header.name, "#~");
        assert_eq!(parsed_header.header_size(), 12);
    }

    #[test]
    fn strings_name() {
        #[rustfmt::skip]
        let header_bytes = [
            0x10, 0x02, 0x00, 0x00,
            0x1C, 0x00, 0x00, 0x00,
            b'#', b'S', b't', b'r', b'i', b'n', b'g', b's', 0x00, 0x00, 0x00, 0x00,
        ];

        let parsed_header = StreamHeader::from(&header_bytes).unwrap();

        assert_eq!(parsed_header.name, "#Strings");
        assert_eq!(parsed_header.header_size(), 20);
    }

    #[test]
    fn crafted_invalid() {
        #[rustfmt::skip]
        let unterminated = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E,
        ];

        assert!(StreamHeader::from(&unterminated).is_err());
        assert!(StreamHeader::from(&[0x00; 4]).is_err());
    }
}
