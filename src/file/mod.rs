//! PE file access for .NET assemblies.
//!
//! [`File`] pairs a data source with the goblin PE view parsed from it, and offers what the
//! metadata loader needs from the PE layer: the location of the CLI header, RVA to file offset
//! translation, and bounds-checked slices of the raw image.
//!
//! # Data Sources
//!
//! - [`physical::Physical`] - memory-mapped file on disk, used by [`File::from_file`]
//! - [`memory::Memory`] - owned buffer, used by [`File::from_mem`]
//!
//! Both supply bytes through the [`Backend`] trait, so the rest of the loader does not care
//! where the image came from.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotinspect::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("tests/samples/Library.dll"))?;
//! let (clr_rva, clr_size) = file.clr()?;
//! let clr_offset = file.rva_to_offset(clr_rva)?;
//! let clr_header = file.data_slice(clr_offset, clr_size)?;
//! println!("CLI header starts with: {:02x?}", &clr_header[0..8]);
//! # Ok::<(), dotinspect::Error>(())
//! ```
//!
//! # References
//!
//! - Microsoft PE/COFF Specification
//! - ECMA-335 6th Edition, Partition II, 25 - File format extensions to PE

/// Little-endian reads from byte slices
pub mod io;
/// Sequential parsing of metadata and signature blobs
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr, NotSupported, OutOfBounds},
    Result,
};
use goblin::pe::{section_table::SectionTable, PE};
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// A source of raw image bytes
pub trait Backend: Send + Sync {
    /// Returns a slice of `len` bytes starting at `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range leaves the data
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// The complete data
    fn data(&self) -> &[u8];

    /// Length of the data in bytes
    fn len(&self) -> usize;
}

/// A parsed PE image, together with the bytes it was parsed from
#[self_referencing]
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Map the file at `file` and parse it as a .NET PE image
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is empty, is not a PE image or has no CLI header
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parse `data` as a .NET PE image
    ///
    /// # Errors
    /// Returns an error if `data` is empty, is not a PE image or has no CLI header
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let data = data.as_ref();
            let pe = PE::parse(data.data()).map_err(GoblinErr)?;

            match pe.header.optional_header {
                Some(optional_header) => {
                    if optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .is_none()
                    {
                        // A native image; nothing for us to read
                        Err(NotSupported)
                    } else {
                        Ok(pe)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            }
        })
    }

    /// Size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// `true` if the image has no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The preferred load address of the image
    #[must_use]
    pub fn imagebase(&self) -> u64 {
        self.with_pe(|pe| pe.image_base)
    }

    /// RVA and size of the CLI header (data directory 14)
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the image carries no CLI header
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            let clr_dir = pe
                .header
                .optional_header
                .as_ref()
                .and_then(|optional_header| {
                    optional_header.data_directories.get_clr_runtime_header()
                })
                .ok_or(NotSupported)?;

            Ok((clr_dir.virtual_address as usize, clr_dir.size as usize))
        })
    }

    /// The section table
    pub fn sections(&self) -> impl Iterator<Item = &SectionTable> {
        self.with_pe(|pe| pe.sections.iter())
    }

    /// The raw image bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// A slice of `len` bytes starting at file offset `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range leaves the image
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Translate a relative virtual address into a file offset
    ///
    /// # Errors
    /// Returns an error if no section contains `rva`, or the section table is malformed
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && rva_u32 < section_max {
                    return Ok((rva_u32 - section.virtual_address) as usize
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(OutOfBounds)
        })
    }
}
