//! Method body headers (ECMA-335 II.25.4)
//!
//! Only the header is decoded: the inspector needs the local variable signature token, not
//! the IL stream or the exception sections.

use crate::{
    file::io::read_le,
    metadata::method::MethodBodyFlags,
    Error::OutOfBounds,
    Result,
};

/// The decoded header of a method body
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBody {
    /// Size of the IL code in bytes
    pub size_code: usize,
    /// Size of the header in bytes
    pub size_header: usize,
    /// `StandAloneSig` token of the locals signature, 0 if the method has no locals
    pub local_var_sig_token: u32,
    /// Maximum evaluation stack depth
    pub max_stack: usize,
    /// Fat header
    pub is_fat: bool,
    /// Locals are zero initialized
    pub is_init_local: bool,
    /// Exception sections follow the code
    pub has_more_sections: bool,
}

impl MethodBody {
    /// Decode the body header at the start of `data`
    ///
    /// `data` may extend past the body; the declared code size must fit.
    ///
    /// # Errors
    /// Returns an error if the header is neither tiny nor fat, or the code does not fit
    pub fn from(data: &[u8]) -> Result<MethodBody> {
        if data.is_empty() {
            return Err(malformed_error!("Provided data for body parsing is empty"));
        }

        let first_byte = read_le::<u8>(data)?;
        match MethodBodyFlags::from_bits_truncate(u16::from(first_byte & 0b_00000011_u8)) {
            MethodBodyFlags::TINY_FORMAT => {
                let size_code = (first_byte >> 2) as usize;
                if size_code + 1 > data.len() {
                    return Err(OutOfBounds);
                }

                Ok(MethodBody {
                    size_code,
                    size_header: 1,
                    local_var_sig_token: 0,
                    max_stack: 8,
                    is_fat: false,
                    is_init_local: false,
                    has_more_sections: false,
                })
            }
            MethodBodyFlags::FAT_FORMAT => {
                if data.len() < 12 {
                    return Err(OutOfBounds);
                }

                let first_duo = read_le::<u16>(data)?;
                let size_header = usize::from(first_duo >> 12) * 4;
                if size_header < 12 {
                    return Err(malformed_error!(
                        "Fat method header is too small - {}",
                        size_header
                    ));
                }

                let size_code = read_le::<u32>(&data[4..])? as usize;
                match size_code.checked_add(size_header) {
                    Some(total) if total <= data.len() => {}
                    _ => return Err(OutOfBounds),
                }

                let flags_header = MethodBodyFlags::from_bits_truncate(first_duo & 0x0FFF);

                Ok(MethodBody {
                    size_code,
                    size_header,
                    local_var_sig_token: read_le::<u32>(&data[8..])?,
                    max_stack: read_le::<u16>(&data[2..])? as usize,
                    is_fat: true,
                    is_init_local: flags_header.contains(MethodBodyFlags::INIT_LOCALS),
                    has_more_sections: flags_header.contains(MethodBodyFlags::MORE_SECTS),
                })
            }
            _ => Err(malformed_error!(
                "MethodHeader is neither FAT nor TINY - {}",
                first_byte
            )),
        }
    }

    /// Total size of header and code
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_code + self.size_header
    }
}
