//! Metadata root (ECMA-335 II.24.2.1)
//!
//! The root sits at the start of the metadata blob the CLI header points to. It carries the
//! runtime version string and the directory of streams.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// Magic signature of the metadata root, 'BSJB'
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Most streams a well formed image carries: the five standard streams, `#-` and a few
/// compiler specific extras
const MAX_STREAMS: u16 = 8;

/// The metadata root header
pub struct Root {
    /// Magic signature, `0x424A5342`
    pub signature: u32,
    /// Major version, ignored on read
    pub major_version: u16,
    /// Minor version, ignored on read
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// Length of the padded version string field
    pub length: u32,
    /// Runtime version, e.g. `v4.0.30319`, without the padding
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// Number of streams
    pub stream_number: u16,
    /// The stream directory
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parse the metadata root at the start of `data`
    ///
    /// # Errors
    /// Returns an error if the signature is wrong, a field is out of range or any stream
    /// lies outside of `data`
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {:#x}",
                signature
            ));
        }

        let version_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_length
            ));
        };

        if version_end + 4 > data.len() {
            return Err(OutOfBounds);
        }

        let version_bytes = &data[16..version_end];
        let version_used = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_used]).into_owned();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || stream_count > MAX_STREAMS {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut streams = Vec::with_capacity(stream_count as usize);
        let mut stream_offset = version_end + 4;
        for _ in 0..stream_count {
            if stream_offset > data.len() {
                return Err(OutOfBounds);
            }

            let new_stream = StreamHeader::from(&data[stream_offset..])?;
            match u32::checked_add(new_stream.offset, new_stream.size) {
                Some(range) => {
                    if range as usize > data.len() {
                        return Err(OutOfBounds);
                    }
                }
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        new_stream.offset,
                        new_stream.size
                    ))
                }
            }

            if streams
                .iter()
                .any(|stream: &StreamHeader| stream.name == new_stream.name)
            {
                return Err(malformed_error!("Duplicate stream - {}", new_stream.name));
            }

            stream_offset += new_stream.header_size();
            streams.push(new_stream);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            reserved: read_le::<u32>(&data[8..])?,
            length: u32::try_from(version_length)
                .map_err(|_| malformed_error!("Version string length too large"))?,
            version,
            flags,
            stream_number: stream_count,
            stream_headers: streams,
        })
    }
}
