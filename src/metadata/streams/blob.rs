//! Blob Heap (`#Blob`) for .NET Metadata
//!
//! Binary data referenced from the metadata tables: method signatures, local variable signatures,
//! type specifications. Each entry is prefixed by its compressed length.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The `#Blob` heap
///
/// # Examples
///
/// ```rust
/// use dotinspect::metadata::streams::Blob;
/// let data = &[0x00, 0x03, 0x20, 0x00, 0x01];
/// let blob = Blob::from(data).unwrap();
/// assert_eq!(blob.get(1).unwrap(), &[0x20, 0x00, 0x01]);
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` object from a sequence of bytes
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the mandatory empty blob
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob stored at `index`, without its length prefix
    ///
    /// # Errors
    /// Returns an error if the index or the encoded length points outside the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let skip = parser.pos();

        let Some(data_start) = index.checked_add(skip) else {
            return Err(OutOfBounds);
        };

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }
}
