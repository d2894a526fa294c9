use crate::metadata::{tables::CodedIndex, token::Token};

#[derive(Clone, Debug)]
/// The `TypeDef` table defines the types of this module. `TableId` = 0x02
pub struct TypeDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15
    pub flags: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// an index into the `TypeDef`, `TypeRef`, or `TypeSpec` table; more precisely, a `TypeDefOrRef` coded index
    pub extends: CodedIndex,
    /// an index into the Field table; it marks the first of a contiguous run of Fields owned by this Type
    pub field_list: u32,
    /// an index into the `MethodDef` table; it marks the first of a contiguous run of Methods owned by this Type
    pub method_list: u32,
}
