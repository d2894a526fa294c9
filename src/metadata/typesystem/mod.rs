//! The type model of a loaded module
//!
//! [`CilType`] is an owned snapshot of one `TypeDef` row, with its methods, nesting and
//! inheritance resolved into tokens and [`TypeReference`]s. [`TypeRegistry`] holds them in
//! declaration order.

mod base;
mod registry;

pub use base::{TypeReference, ELEMENT_TYPE};
pub use registry::TypeRegistry;

use crate::metadata::{method::Method, tables::TypeAttributes, token::Token};

/// A type defined in the module
#[derive(Debug, Clone)]
pub struct CilType {
    /// `TypeDef` token
    pub token: Token,
    /// Namespace, empty for nested types and the global namespace
    pub namespace: String,
    /// Type name
    pub name: String,
    /// Raw `TypeAttributes`
    pub flags: u32,
    /// Declared methods, in declaration order
    pub methods: Vec<Method>,
    /// Directly nested types, in declaration order
    pub nested_types: Vec<Token>,
    /// The enclosing type, for nested types
    pub enclosing_type: Option<Token>,
    /// The base type; `None` for interfaces and `System.Object`
    pub base: Option<TypeReference>,
    /// Directly implemented interfaces
    pub interfaces: Vec<TypeReference>,
}

impl CilType {
    /// Create a type without members or relations
    #[must_use]
    pub fn new(token: Token, namespace: &str, name: &str, flags: u32) -> Self {
        CilType {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            methods: Vec::new(),
            nested_types: Vec::new(),
            enclosing_type: None,
            base: None,
            interfaces: Vec::new(),
        }
    }

    /// Namespace-qualified name, e.g. `System.Collections.IEnumerable`
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// `true` for interface types
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags & TypeAttributes::CLASS_SEMANTICS_MASK == TypeAttributes::INTERFACE
    }

    /// `true` for types nested in another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing_type.is_some()
    }

    /// `true` for nested types declared `public`
    #[must_use]
    pub fn is_nested_public(&self) -> bool {
        self.flags & TypeAttributes::VISIBILITY_MASK == TypeAttributes::NESTED_PUBLIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_flags() {
        let enumerable = CilType::new(Token::new(0x0200_0002), "System.Collections", "IEnumerable", 0xA1);
        assert_eq!(enumerable.fullname(), "System.Collections.IEnumerable");
        assert!(enumerable.is_interface());
        assert!(!enumerable.is_nested());

        let mut nested = CilType::new(Token::new(0x0200_0003), "", "Año", 0x0010_0002);
        nested.enclosing_type = Some(Token::new(0x0200_0002));
        assert_eq!(nested.fullname(), "Año");
        assert!(nested.is_nested());
        assert!(nested.is_nested_public());
        assert!(!nested.is_interface());

        let private = CilType::new(Token::new(0x0200_0004), "", "Oculto", 0x0010_0003);
        assert!(!private.is_nested_public());
    }
}
