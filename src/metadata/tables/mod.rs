//! Metadata tables of the `#~` stream
//!
//! Each table lives in its own module with the raw row type and its [`RowReadable`] decoding.
//! Only the tables the inspector needs are decoded; the row layout of every other table is
//! still known through [`TableId::columns`] so those tables can be skipped.

mod interfaceimpl;
mod methoddef;
mod module;
mod nestedclass;
mod standalonesig;
mod typedef;
mod typeref;
mod types;
mod typespec;

pub use interfaceimpl::*;
pub use methoddef::*;
pub use module::*;
pub use nestedclass::*;
pub use standalonesig::*;
pub use typedef::*;
pub use typeref::*;
pub use types::*;
pub use typespec::*;
