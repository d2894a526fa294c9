//! # Metadata Table Types
//!
//! Generic infrastructure shared by all metadata tables: the row reading trait, a typed view
//! over the bytes of one table, and the size information needed to lay out rows.
//!
//! - [`MetadataTable`]: typed, lazily decoded view over one table
//! - [`RowReadable`]: how one row of a table is decoded
//! - [`TableInfo`]: row counts and index widths from the tables stream header
//! - [`CodedIndex`]: references into one of several tables

use std::marker::PhantomData;

use crate::{Error::OutOfBounds, Result};

mod codedindex;
mod tableid;
mod tableinfo;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tableid::{Column, TableId};
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

use crate::metadata::tables::{
    InterfaceImplRaw, MethodDefRaw, ModuleRaw, NestedClassRaw, StandAloneSigRaw, TypeDefRaw,
    TypeRefRaw, TypeSpecRaw,
};

/// Decoding of a single row of a metadata table
pub trait RowReadable: Sized + Send {
    /// Size in bytes of one row, given the index widths in `sizes`
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Read the row `rid` starting at `offset`, advancing `offset` past it
    ///
    /// # Errors
    /// Returns an error if the data is truncated or an index cannot be decoded
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// A typed view over the rows of one metadata table
///
/// Rows are decoded on access; the table itself only borrows the raw bytes.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a table view over `data` holding `row_count` rows
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `row_count` rows
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        if u64::from(row_count) * u64::from(row_size) > data.len() as u64 {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Size in bytes of the whole table
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size in bytes of one row
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode the row with the 1-based id `rid`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for row 0 or a row past the end, or the error of
    /// decoding the row
    pub fn read(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(OutOfBounds);
        }

        T::row_read(
            self.data,
            &mut ((rid as usize - 1) * self.row_size as usize),
            rid,
            &self.sizes,
        )
    }

    /// Decode the row with the 1-based id `rid`, if it exists and is well formed
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        self.read(rid).ok()
    }

    /// Decode every row, failing on the first malformed one
    ///
    /// # Errors
    /// Returns the error of the first row that cannot be decoded
    pub fn rows(&self) -> Result<Vec<T>> {
        (1..=self.row_count).map(|rid| self.read(rid)).collect()
    }

    /// Iterate over the rows; iteration stops at the first row that cannot be decoded
    #[must_use]
    pub fn iter(&'a self) -> TableIterator<'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
            current_offset: 0,
        }
    }
}

impl<'a, T: RowReadable> IntoIterator for &'a MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator over the rows of a [`MetadataTable`]
pub struct TableIterator<'a, T> {
    table: &'a MetadataTable<'a, T>,
    current_row: u32,
    current_offset: usize,
}

impl<T: RowReadable> Iterator for TableIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        match T::row_read(
            self.table.data,
            &mut self.current_offset,
            self.current_row + 1,
            &self.table.sizes,
        ) {
            Ok(row) => {
                self.current_row += 1;
                Some(row)
            }
            Err(_) => None,
        }
    }
}

/// The tables this crate decodes; the rows of every other table are skipped
pub enum TableData<'a> {
    /// `Module`
    Module(MetadataTable<'a, ModuleRaw>),
    /// `TypeRef`
    TypeRef(MetadataTable<'a, TypeRefRaw>),
    /// `TypeDef`
    TypeDef(MetadataTable<'a, TypeDefRaw>),
    /// `MethodDef`
    MethodDef(MetadataTable<'a, MethodDefRaw>),
    /// `InterfaceImpl`
    InterfaceImpl(MetadataTable<'a, InterfaceImplRaw>),
    /// `StandAloneSig`
    StandAloneSig(MetadataTable<'a, StandAloneSigRaw>),
    /// `TypeSpec`
    TypeSpec(MetadataTable<'a, TypeSpecRaw>),
    /// `NestedClass`
    NestedClass(MetadataTable<'a, NestedClassRaw>),
}

/// Typed access to one of the decoded tables of a tables stream
pub trait TableAccess<'a, T: RowReadable> {
    /// The table holding rows of `T`, if present
    fn table(&'a self) -> Option<&'a MetadataTable<'a, T>>;
}

/// Implement [`TableAccess`] for `TablesHeader` and one row type
#[macro_export]
macro_rules! impl_table_access {
    ($raw:ty, $id:expr, $variant:ident) => {
        impl<'a> TableAccess<'a, $raw> for TablesHeader<'a> {
            fn table(&'a self) -> Option<&'a MetadataTable<'a, $raw>> {
                match self.tables.get($id as usize)? {
                    Some(TableData::$variant(table)) => Some(table),
                    _ => None,
                }
            }
        }
    };
}
