//! `TypeRef` table (0x01)
//!
//! References to types defined in other modules or assemblies, such as `System.Object` or
//! `System.Collections.IEnumerable`.

mod raw;
mod reader;

pub use raw::*;
