use crate::metadata::token::Token;

#[derive(Clone, Debug)]
/// The `Module` table provides information about the current module. `TableId` = 0x00
pub struct ModuleRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte value, reserved, shall be zero
    pub generation: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Guid heap; simply a Guid used to distinguish between two versions of the same module
    pub mvid: u32,
    /// an index into the Guid heap; reserved, shall be zero
    pub encid: u32,
    /// an index into the Guid heap; reserved, shall be zero
    pub encbaseid: u32,
}
