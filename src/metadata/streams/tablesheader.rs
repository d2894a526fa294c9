//! Tables stream (`#~`) header and table directory.
//!
//! The stream starts with a 24 byte header, followed by one row count per present table and
//! then the tables themselves, back to back in table id order. Locating a table therefore
//! requires the row size of every table before it, including tables this crate never decodes.
//!
//! # Reference
//! - [ECMA-335 II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    impl_table_access,
    metadata::tables::{
        InterfaceImplRaw, MetadataTable, MethodDefRaw, ModuleRaw, NestedClassRaw, RowReadable,
        StandAloneSigRaw, TableAccess, TableData, TableId, TableInfo, TableInfoRef, TypeDefRaw,
        TypeRefRaw, TypeSpecRaw,
    },
    Error::{NotSupported, OutOfBounds},
    Result,
};

/// Tables that only appear in unoptimized metadata, which this crate does not handle
const INDIRECTION_TABLES: [TableId; 5] = [
    TableId::FieldPtr,
    TableId::MethodPtr,
    TableId::ParamPtr,
    TableId::EventPtr,
    TableId::PropertyPtr,
];

/// The `TablesHeader` structure represents the header in the '#~' stream, and gives typed
/// access to the tables that follow it.
///
/// ```rust,no_run
/// use dotinspect::metadata::{streams::TablesHeader, tables::TypeDefRaw};
///
/// # fn example(tables: &TablesHeader) -> dotinspect::Result<()> {
/// if let Some(typedefs) = tables.table::<TypeDefRaw>() {
///     for typedef in typedefs {
///         println!("{} - flags {:#x}", typedef.token, typedef.flags);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct TablesHeader<'a> {
    /// Major version of table schemata; shall be 2
    pub major_version: u8,
    /// Minor version of table schemata; shall be 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    tables_offset: usize,
    tables: Vec<Option<TableData<'a>>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the tables stream in `data`
    ///
    /// # Errors
    /// Returns an error if the stream is truncated, holds no tables, or uses indirection tables
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let heap_sizes = read_le::<u8>(&data[6..])?;
        let extra_data = if heap_sizes & 0x40 == 0x40 { 4 } else { 0 };

        let mut tables_header = TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info: Arc::new(TableInfo::new(data, valid_bitvec)?),
            tables_offset: 24 + valid_bitvec.count_ones() as usize * 4 + extra_data,
            tables: Vec::new(),
        };

        tables_header
            .tables
            .resize_with(TableId::GenericParamConstraint as usize + 1, || None);

        for table_id in INDIRECTION_TABLES {
            if tables_header.info.get(table_id).rows != 0 {
                return Err(NotSupported);
            }
        }

        let mut current_offset = tables_header.tables_offset;
        for table_id in TableId::iter() {
            if current_offset > data.len() {
                return Err(OutOfBounds);
            }

            tables_header.add_table(&data[current_offset..], table_id, &mut current_offset)?;
        }

        Ok(tables_header)
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// `true` if the stream holds at least one row of `table_id`
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.info.get(table_id).rows > 0
    }

    /// Row count of `table_id`, 0 if the table is absent
    #[must_use]
    pub fn table_row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Typed access to a decoded table
    #[must_use]
    pub fn table<T: RowReadable>(&'a self) -> Option<&'a MetadataTable<'a, T>>
    where
        Self: TableAccess<'a, T>,
    {
        <Self as TableAccess<'a, T>>::table(self)
    }

    fn add_table(
        &mut self,
        data: &'a [u8],
        table_id: TableId,
        current_offset: &mut usize,
    ) -> Result<()> {
        let rows = self.info.get(table_id).rows;
        if rows == 0 {
            return Ok(());
        }

        let info = self.info.clone();
        let table = match table_id {
            TableId::Module => TableData::Module(MetadataTable::new(data, rows, info)?),
            TableId::TypeRef => TableData::TypeRef(MetadataTable::new(data, rows, info)?),
            TableId::TypeDef => TableData::TypeDef(MetadataTable::new(data, rows, info)?),
            TableId::MethodDef => TableData::MethodDef(MetadataTable::new(data, rows, info)?),
            TableId::InterfaceImpl => {
                TableData::InterfaceImpl(MetadataTable::new(data, rows, info)?)
            }
            TableId::StandAloneSig => {
                TableData::StandAloneSig(MetadataTable::new(data, rows, info)?)
            }
            TableId::TypeSpec => TableData::TypeSpec(MetadataTable::new(data, rows, info)?),
            TableId::NestedClass => TableData::NestedClass(MetadataTable::new(data, rows, info)?),
            _ => {
                let size = u64::from(rows) * u64::from(self.info.row_size(table_id));
                if size > data.len() as u64 {
                    return Err(OutOfBounds);
                }

                #[allow(clippy::cast_possible_truncation)]
                {
                    *current_offset += size as usize;
                }
                return Ok(());
            }
        };

        #[allow(clippy::cast_possible_truncation)]
        {
            *current_offset += match &table {
                TableData::Module(t) => t.size(),
                TableData::TypeRef(t) => t.size(),
                TableData::TypeDef(t) => t.size(),
                TableData::MethodDef(t) => t.size(),
                TableData::InterfaceImpl(t) => t.size(),
                TableData::StandAloneSig(t) => t.size(),
                TableData::TypeSpec(t) => t.size(),
                TableData::NestedClass(t) => t.size(),
            } as usize;
        }

        self.tables[table_id as usize] = Some(table);
        Ok(())
    }
}

impl_table_access!(ModuleRaw, TableId::Module, Module);
impl_table_access!(TypeRefRaw, TableId::TypeRef, TypeRef);
impl_table_access!(TypeDefRaw, TableId::TypeDef, TypeDef);
impl_table_access!(MethodDefRaw, TableId::MethodDef, MethodDef);
impl_table_access!(InterfaceImplRaw, TableId::InterfaceImpl, InterfaceImpl);
impl_table_access!(StandAloneSigRaw, TableId::StandAloneSig, StandAloneSig);
impl_table_access!(TypeSpecRaw, TableId::TypeSpec, TypeSpec);
impl_table_access!(NestedClassRaw, TableId::NestedClass, NestedClass);

#[cfg(test)]
mod tests {
    use super::*;

    fn header(valid: u64, heap_sizes: u8, rows: &[u32]) -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x00, 0x00, 0x02, 0x00, heap_sizes, 0x01];
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0_u64.to_le_bytes());
        for row in rows {
            data.extend_from_slice(&row.to_le_bytes());
        }
        data
    }

    #[test]
    fn crafted() {
        // Module, TypeDef and Param; Param rows are skipped
        let mut data = header((1 << 0x00) | (1 << 0x02) | (1 << 0x08), 0, &[1, 2, 1]);
        #[rustfmt::skip]
        data.extend_from_slice(&[
            /* Module */    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
            /* TypeDef 1 */ 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
            /* TypeDef 2 */ 0x01, 0x00, 0x10, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x05, 0x00, 0x01, 0x00, 0x01, 0x00,
            /* Param */     0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        ]);

        let tables = TablesHeader::from(&data).unwrap();
        assert_eq!(tables.major_version, 2);
        assert_eq!(tables.table_count(), 3);
        assert!(tables.has_table(TableId::TypeDef));
        assert!(!tables.has_table(TableId::MethodDef));
        assert_eq!(tables.table_row_count(TableId::Param), 1);

        let module = tables.table::<ModuleRaw>().unwrap();
        assert_eq!(module.get(1).unwrap().name, 1);

        let typedefs = tables.table::<TypeDefRaw>().unwrap();
        assert_eq!(typedefs.row_count(), 2);
        let second = typedefs.get(2).unwrap();
        assert_eq!(second.flags, 0x0010_0001);
        assert_eq!(second.type_name, 0x0B);
        assert_eq!(second.extends.token.value(), 0x0100_0001);

        assert!(tables.table::<MethodDefRaw>().is_none());
    }

    #[test]
    fn extra_data() {
        let mut data = header(1 << 0x11, 0x40, &[1]);
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        data.extend_from_slice(&[0x07, 0x00]);

        let tables = TablesHeader::from(&data).unwrap();
        let sigs = tables.table::<StandAloneSigRaw>().unwrap();
        assert_eq!(sigs.get(1).unwrap().signature, 7);
    }

    #[test]
    fn invalid() {
        assert!(matches!(TablesHeader::from(&[0x00; 23]), Err(OutOfBounds)));
        assert!(TablesHeader::from(&header(0, 0, &[])).is_err());

        let mut truncated = header(1 << 0x02, 0, &[4]);
        truncated.extend_from_slice(&[0x00; 20]);
        assert!(matches!(TablesHeader::from(&truncated), Err(OutOfBounds)));

        let mut indirection = header(1 << 0x05, 0, &[1]);
        indirection.extend_from_slice(&[0x01, 0x00]);
        assert!(matches!(
            TablesHeader::from(&indirection),
            Err(NotSupported)
        ));
    }
}
