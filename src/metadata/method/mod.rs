//! Methods defined in a module
//!
//! A [`Method`] combines the `MethodDef` row with its decoded signature and, for methods with
//! a body, the body header and local variable types.

mod body;
mod types;

pub use body::*;
pub use types::*;

use crate::metadata::{
    signatures::{SignatureLocalVariable, SignatureMethod, TypeSignature},
    token::Token,
};

/// A method defined in the module
#[derive(Debug, Clone)]
pub struct Method {
    /// `MethodDef` token
    pub token: Token,
    /// Method name
    pub name: String,
    /// `TypeDef` token of the declaring type
    pub declaring_type: Token,
    /// Member access
    pub flags_access: MethodAccessFlags,
    /// Method modifiers
    pub flags_modifiers: MethodModifiers,
    /// RVA of the body, `None` for methods without one
    pub rva: Option<u32>,
    /// Decoded signature
    pub signature: SignatureMethod,
    /// Body header, `None` for methods without a body
    pub body: Option<MethodBody>,
    /// Local variables, in slot order
    pub local_vars: Vec<SignatureLocalVariable>,
}

impl Method {
    /// Member access is `public`
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags_access == MethodAccessFlags::PUBLIC
    }

    /// Defined on the type rather than per instance
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// Instance or type initializer (`.ctor` / `.cctor`)
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.flags_modifiers
            .contains(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME)
            && (self.name == ".ctor" || self.name == ".cctor")
    }

    /// Number of declared parameters, not counting `this`
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.signature.params.len() + self.signature.varargs.len()
    }

    /// `true` if some local slot holds a value of type `local_type`
    ///
    /// Slots holding a managed reference to such a value do not count.
    #[must_use]
    pub fn has_local_of(&self, local_type: &TypeSignature) -> bool {
        self.local_vars
            .iter()
            .any(|local| !local.is_byref && local.base == *local_type)
    }
}
