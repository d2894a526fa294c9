//! `NestedClass` table (0x29)
//!
//! Pairs each nested type with the type that encloses it.

mod raw;
mod reader;

pub use raw::*;
