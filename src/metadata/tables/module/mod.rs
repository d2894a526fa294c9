//! `Module` table (0x00)
//!
//! Exactly one row, naming the module and carrying its version id (MVID).
//!
//! # Reference
//! - [ECMA-335 II.22.30](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
