//! `InterfaceImpl` table (0x09)
//!
//! Records the interfaces each type declares it implements.

mod raw;
mod reader;

pub use raw::*;
