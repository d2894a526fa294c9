//! # dotinspect Prelude
//!
//! The types needed to load a module and query it, for glob imports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotinspect operations
pub use crate::Error;

/// The result type used throughout dotinspect
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// A loaded .NET module
pub use crate::CilModule;

/// The queries, as path-level functions
pub use crate::inspector;

/// The queries over a loaded module, and their results
pub use crate::inspector::{Inspector, MethodDescriptor, TypeDescriptor};

// ================================================================================================
// Type Model
// ================================================================================================

/// Types of a module
pub use crate::metadata::typesystem::{CilType, TypeReference, TypeRegistry};

/// Methods and their flags
pub use crate::metadata::method::{Method, MethodAccessFlags, MethodBody, MethodModifiers};

/// Decoded signatures
pub use crate::metadata::signatures::{
    SignatureLocalVariable, SignatureMethod, SignatureParameter, TypeSignature,
};

/// Metadata tokens
pub use crate::metadata::token::Token;
