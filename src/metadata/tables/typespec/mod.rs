//! `TypeSpec` table (0x1B)
//!
//! Types described by a signature rather than a name, most commonly generic instantiations
//! such as ``IEnumerable`1<int>``.

mod raw;
mod reader;

pub use raw::*;
