use crate::metadata::token::Token;

#[derive(Clone, Debug)]
/// The `NestedClass` table defines the relationship between nested types and their enclosing types. `TableId` = 0x29
pub struct NestedClassRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub nested_class: u32,
    /// an index into the `TypeDef` table
    pub enclosing_class: u32,
}

impl NestedClassRaw {
    /// Token of the nested type
    #[must_use]
    pub fn nested_token(&self) -> Token {
        Token::new(0x0200_0000 | self.nested_class)
    }

    /// Token of the enclosing type
    #[must_use]
    pub fn enclosing_token(&self) -> Token {
        Token::new(0x0200_0000 | self.enclosing_class)
    }
}
