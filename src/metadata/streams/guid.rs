//! GUID Heap (`#GUID`) for .NET Metadata
//!
//! A sequence of 16-byte GUIDs, addressed by a 1-based index. The `Module` table references its
//! module version id (MVID) here.
//!
//! # Reference
//! - [ECMA-335 II.24.2.5](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{Error::OutOfBounds, Result};

const GUID_SIZE: usize = 16;

/// The `#GUID` heap
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Create a `Guid` object from a sequence of bytes
    ///
    /// # Errors
    /// Returns an error if the heap cannot hold a single GUID
    pub fn from(data: &'a [u8]) -> Result<Guid<'a>> {
        if data.len() < GUID_SIZE {
            return Err(malformed_error!("Data for #Guid heap is too small"));
        }

        Ok(Guid { data })
    }

    /// Get the GUID at the 1-based `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for index 0 or an index past the end of the heap
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index < 1 || index > self.data.len() / GUID_SIZE {
            return Err(OutOfBounds);
        }

        let offset_start = (index - 1) * GUID_SIZE;

        let mut buffer = [0u8; GUID_SIZE];
        buffer.copy_from_slice(&self.data[offset_start..offset_start + GUID_SIZE]);

        Ok(uguid::Guid::from_bytes(buffer))
    }
}
