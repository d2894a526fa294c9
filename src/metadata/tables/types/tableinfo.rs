use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::types::{CodedIndexType, Column, TableId},
    Error::OutOfBounds,
    Result,
};

/// Row count of a table, and what it implies for indexes into that table
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to store the largest row id
    pub bits: u8,
    /// `true` if indexes into this table are 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Derive the index width information for a table with `rows` rows
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts of all tables, together with heap and coded index widths
///
/// This is everything needed to compute the byte layout of any table row.
#[derive(Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared reference to [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read the row counts that follow the tables stream header
    ///
    /// One `u32` count is present for every bit set in `valid_bitvec`, including bits of tables
    /// this crate does not know; those counts are consumed but not kept.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row counts are truncated
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut table_info = vec![TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;

        for bit in 0..64_u8 {
            if (valid_bitvec & (1 << bit)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if let Some(table_id) = TableId::from_id(bit) {
                table_info[table_id as usize] = TableRowInfo::new(row_count);
            }
        }

        if data.len() < 7 {
            return Err(OutOfBounds);
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        let mut table_info = TableInfo {
            rows: table_info,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Build size information for crafted table data
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Split a raw coded index value into table and row
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the tag names no table of `coded_index_type`
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_index_type.tag_bits();
        let tag_mask = (1_u32 << tag_bits) - 1;

        let tag = value & tag_mask;
        let index = value >> tag_bits;

        match tables.get(tag as usize) {
            Some(table_id) => Ok((*table_id, index)),
            None => Err(OutOfBounds),
        }
    }

    /// Row information of `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// `true` if indexes into `id` are 4 bytes wide
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// `true` if `#Strings` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// `true` if `#GUID` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// `true` if `#Blob` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of an index into `table_id`
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of `coded_index_type`
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Width of one column
    #[must_use]
    pub fn column_bytes(&self, column: Column) -> u8 {
        match column {
            Column::Fixed(width) => width,
            Column::Str => self.str_bytes(),
            Column::Guid => self.guid_bytes(),
            Column::Blob => self.blob_bytes(),
            Column::Table(table_id) => self.table_index_bytes(table_id),
            Column::Coded(coded_index_type) => self.coded_index_bytes(coded_index_type),
        }
    }

    /// Width of one row of `table_id`
    #[must_use]
    pub fn row_size(&self, table_id: TableId) -> u32 {
        table_id
            .columns()
            .iter()
            .map(|column| u32::from(self.column_bytes(*column)))
            .sum()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index_type in CodedIndexType::iter() {
            let max_bits = coded_index_type
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index_type as usize] =
                max_bits + coded_index_type.tag_bits();
        }
    }
}
