use crate::metadata::{tables::CodedIndex, token::Token};

#[derive(Clone, Debug)]
/// The `TypeRef` table references types defined outside of this module. `TableId` = 0x01
pub struct TypeRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into a `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef` table, or null; more precisely, a `ResolutionScope` coded index
    pub resolution_scope: CodedIndex,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
}
