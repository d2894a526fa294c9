use crate::metadata::token::Token;

#[derive(Clone, Debug)]
/// The `MethodDef` table defines the methods of this module. `TableId` = 0x06
pub struct MethodDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte constant; the RVA of the method body, 0 for abstract and extern methods
    pub rva: u32,
    /// a 2-byte bitmask of type `MethodImplAttributes`, §II.23.1.10
    pub impl_flags: u32,
    /// a 2-byte bitmask of type `MethodAttributes`, §II.23.1.10
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
    /// an index into the Param table; it marks the first of a contiguous run of Parameters owned by this method
    pub param_list: u32,
}
