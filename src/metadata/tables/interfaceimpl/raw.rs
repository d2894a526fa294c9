use crate::metadata::{tables::CodedIndex, token::Token};

#[derive(Clone, Debug)]
/// The `InterfaceImpl` table records the interfaces a type implements explicitly. `TableId` = 0x09
pub struct InterfaceImplRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub class: u32,
    /// an index into the `TypeDef`, `TypeRef`, or `TypeSpec` table; more precisely, a `TypeDefOrRef` coded index
    pub interface: CodedIndex,
}
