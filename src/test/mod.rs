//! Fixtures shared by the unit tests
//!
//! [`ModuleBuilder`] emits complete .NET PE images, so loader and query tests run against real
//! metadata without sample binaries on disk.

mod builder;

pub use builder::ModuleBuilder;
