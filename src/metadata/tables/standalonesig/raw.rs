use crate::metadata::token::Token;

#[derive(Clone, Debug)]
/// The `StandAloneSig` table holds signatures referenced directly from method bodies. `TableId` = 0x11
pub struct StandAloneSigRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Blob heap
    pub signature: u32,
}
