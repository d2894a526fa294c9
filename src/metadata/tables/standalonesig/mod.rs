//! `StandAloneSig` table (0x11)
//!
//! Signatures not attached to any member. Fat method bodies point here for the signature
//! of their local variables.

mod raw;
mod reader;

pub use raw::*;
