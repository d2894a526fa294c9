//! Signature blobs (ECMA-335 II.23.2)
//!
//! Method signatures give the parameter count used by the inspector, local variable signatures
//! describe the locals of a method body, and type specifications describe constructed types
//! such as generic instantiations.

mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a `MethodDefSig` blob
///
/// # Errors
/// Returns an error if the blob is malformed
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(data);
    parser.parse_method_signature()
}

/// Parse a `LocalVarSig` blob
///
/// # Errors
/// Returns an error if the blob is malformed
pub fn parse_local_var_signature(data: &[u8]) -> Result<SignatureLocalVariables> {
    let mut parser = SignatureParser::new(data);
    parser.parse_local_var_signature()
}

/// Parse a `TypeSpec` blob
///
/// # Errors
/// Returns an error if the blob is malformed
pub fn parse_type_spec_signature(data: &[u8]) -> Result<SignatureTypeSpec> {
    let mut parser = SignatureParser::new(data);
    parser.parse_type_spec_signature()
}
