//! The CLI header (`IMAGE_COR20_HEADER`).
//!
//! Located through PE data directory 14, the 72-byte CLI header is the entry point into .NET
//! metadata: it carries the runtime version the image was built for and, most importantly, the
//! RVA and size of the metadata root.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Upper bound for the metadata directory; anything larger is a corrupted header.
const MAX_METADATA_SIZE: u32 = 0x1000_0000;

/// The CLI header, as stored in the image
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Major runtime version required to run the image
    pub major_runtime_version: u16,
    /// Minor runtime version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*`
    pub flags: u32,
    /// Entry point `MethodDef`/`File` token, or native entry point RVA
    pub entry_point_token: u32,
    /// RVA of managed resources
    pub resource_rva: u32,
    /// Size of managed resources
    pub resource_size: u32,
    /// RVA of the strong name signature
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature
    pub strong_name_signature_size: u32,
    /// Reserved, always 0
    pub code_manager_table_rva: u32,
    /// Reserved, always 0
    pub code_manager_table_size: u32,
    /// RVA of the `VTableFixups` array
    pub vtable_fixups_rva: u32,
    /// Size of the `VTableFixups` array
    pub vtable_fixups_size: u32,
    /// Reserved, always 0
    pub export_address_table_jmp_rva: u32,
    /// Reserved, always 0
    pub export_address_table_jmp_size: u32,
    /// Reserved for precompiled images
    pub managed_native_header_rva: u32,
    /// Reserved for precompiled images
    pub managed_native_header_size: u32,
}

impl Cor20Header {
    /// Parse and validate a CLI header
    ///
    /// # Arguments
    /// * 'data' - The bytes of the header, at least 72
    ///
    /// # Errors
    /// Returns an error if `data` is too short, or a field holds a value no valid image carries
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        // ILONLY .. NATIVE_ENTRYPOINT, TRACKDEBUGDATA, 32BITPREFERRED
        const VALID_FLAGS: u32 = 0x0003_001F;

        if data.len() < 72 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > MAX_METADATA_SIZE {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = parser.read_le::<u32>()?;
        if flags & !VALID_FLAGS != 0 {
            return Err(malformed_error!(
                "Invalid CLR flags: 0x{:08X} contains undefined bits",
                flags
            ));
        }

        let entry_point_token = parser.read_le::<u32>()?;

        let resource_rva = parser.read_le::<u32>()?;
        let resource_size = parser.read_le::<u32>()?;
        if (resource_rva == 0) != (resource_size == 0) {
            return Err(malformed_error!("Resource values are invalid"));
        }

        let strong_name_signature_rva = parser.read_le::<u32>()?;
        let strong_name_signature_size = parser.read_le::<u32>()?;
        if (strong_name_signature_rva == 0) != (strong_name_signature_size == 0) {
            return Err(malformed_error!("Strong name values are invalid"));
        }

        let code_manager_table_rva = parser.read_le::<u32>()?;
        let code_manager_table_size = parser.read_le::<u32>()?;
        if code_manager_table_rva != 0 || code_manager_table_size != 0 {
            return Err(malformed_error!(
                "Code Manager Table fields must be zero (reserved)"
            ));
        }

        let vtable_fixups_rva = parser.read_le::<u32>()?;
        let vtable_fixups_size = parser.read_le::<u32>()?;
        if (vtable_fixups_rva == 0) != (vtable_fixups_size == 0) {
            return Err(malformed_error!("VTable fixups are invalid"));
        }

        let export_address_table_jmp_rva = parser.read_le::<u32>()?;
        let export_address_table_jmp_size = parser.read_le::<u32>()?;
        if export_address_table_jmp_rva != 0 || export_address_table_jmp_size != 0 {
            return Err(malformed_error!(
                "Export Address Table Jump fields must be zero (reserved)"
            ));
        }

        let managed_native_header_rva = parser.read_le::<u32>()?;
        let managed_native_header_size = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
            resource_rva,
            resource_size,
            strong_name_signature_rva,
            strong_name_signature_size,
            code_manager_table_rva,
            code_manager_table_size,
            vtable_fixups_rva,
            vtable_fixups_size,
            export_address_table_jmp_rva,
            export_address_table_jmp_size,
            managed_native_header_rva,
            managed_native_header_size,
        })
    }
}
