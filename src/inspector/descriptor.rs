use std::fmt;

use crate::metadata::{method::Method, token::Token, typesystem::CilType};

/// A method found by one of the inspector queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// `MethodDef` token
    pub token: Token,
    /// Method name
    pub name: String,
    /// Simple name of the declaring type, without namespace
    pub declaring_type: String,
    /// Number of declared parameters
    pub parameter_count: usize,
}

impl MethodDescriptor {
    pub(crate) fn new(method: &Method, declaring_type: &CilType) -> Self {
        MethodDescriptor {
            token: method.token,
            name: method.name.clone(),
            declaring_type: declaring_type.name.clone(),
            parameter_count: method.param_count(),
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// A type found by one of the inspector queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// `TypeDef` token
    pub token: Token,
    /// Namespace, empty for nested types
    pub namespace: String,
    /// Type name
    pub name: String,
    /// Simple name of the enclosing type, for nested types
    pub enclosing_type: Option<String>,
}

impl TypeDescriptor {
    pub(crate) fn new(cil_type: &CilType, enclosing_type: Option<&CilType>) -> Self {
        TypeDescriptor {
            token: cil_type.token,
            namespace: cil_type.namespace.clone(),
            name: cil_type.name.clone(),
            enclosing_type: enclosing_type.map(|enclosing| enclosing.name.clone()),
        }
    }

    /// Namespace-qualified name; nested types are written `Enclosing/Nested`
    #[must_use]
    pub fn fullname(&self) -> String {
        let name = match &self.enclosing_type {
            Some(enclosing) => format!("{enclosing}/{}", self.name),
            None => self.name.clone(),
        };

        if self.namespace.is_empty() {
            name
        } else {
            format!("{}.{name}", self.namespace)
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname())
    }
}
