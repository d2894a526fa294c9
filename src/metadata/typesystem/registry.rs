use std::collections::HashMap;

use crate::metadata::{token::Token, typesystem::CilType};

/// All types defined in a module, in `TypeDef` order, with lookup by token
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<CilType>,
    by_token: HashMap<Token, usize>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a type; a type with the same token replaces the earlier entry's lookup
    pub fn insert(&mut self, new_type: CilType) {
        self.by_token.insert(new_type.token, self.types.len());
        self.types.push(new_type);
    }

    /// Look up a type by its `TypeDef` token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<&CilType> {
        self.by_token.get(token).map(|index| &self.types[*index])
    }

    /// Mutable lookup, used while the model is being built
    pub(crate) fn get_mut(&mut self, token: &Token) -> Option<&mut CilType> {
        match self.by_token.get(token) {
            Some(index) => self.types.get_mut(*index),
            None => None,
        }
    }

    /// All types whose namespace-qualified name is `fullname`
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Vec<&CilType> {
        self.types
            .iter()
            .filter(|cil_type| cil_type.fullname() == fullname)
            .collect()
    }

    /// Iterate over the types in `TypeDef` order
    pub fn iter(&self) -> std::slice::Iter<'_, CilType> {
        self.types.iter()
    }

    /// Number of types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// `true` if there are no types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = &'a CilType;
    type IntoIter = std::slice::Iter<'a, CilType>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
