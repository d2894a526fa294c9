//! `MethodDef` table (0x06)
//!
//! One row per method defined in the module. The row carries the RVA of the method body and
//! the `#Blob` index of the method signature; parameter counts and locals are derived from those.

mod raw;
mod reader;

pub use raw::*;
