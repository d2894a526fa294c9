use crate::metadata::token::Token;

#[derive(Clone, Debug)]
/// The `TypeSpec` table describes constructed types by signature. `TableId` = 0x1B
pub struct TypeSpecRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Blob heap
    pub signature: u32,
}
