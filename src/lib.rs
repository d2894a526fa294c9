// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dotinspect
//!
//! Read-only metadata queries over compiled .NET PE assemblies, in pure Rust and without the
//! .NET runtime.
//!
//! `dotinspect` reads the CLI header, the metadata streams and the metadata tables of a module
//! and builds an owned type model from them: types with their methods, base types, implemented
//! interfaces and nesting, and methods with their signatures and local variable types. The
//! [`inspector`] runs four queries over that model:
//!
//! - the public instance method with the longest parameter list
//! - the first method with both an `int` and a `bool` local variable
//! - the first type assignable to `System.Collections.IEnumerable`
//! - the first public nested type whose name contains a Spanish letter (`á é í ó ú ñ`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotinspect::prelude::*;
//!
//! if let Some(method) = inspector::largest_parameter_list_method("tests/samples/Sample.dll")? {
//!     println!("{} takes {} parameters", method, method.parameter_count);
//! }
//! # Ok::<(), dotinspect::Error>(())
//! ```
//!
//! To run several queries over one module, load it once and use an [`Inspector`]:
//!
//! ```rust,no_run
//! use dotinspect::{CilModule, Inspector};
//! use std::path::Path;
//!
//! let module = CilModule::from_file(Path::new("tests/samples/Sample.dll"))?;
//! let inspector = Inspector::new(&module);
//!
//! if let Some(found) = inspector.find_enumerable_type() {
//!     println!("{} is enumerable", found);
//! }
//! if let Some(found) = inspector.find_type_with_spanish_nested_type() {
//!     println!("{:?} encloses {}", found.enclosing_type, found.name);
//! }
//! # Ok::<(), dotinspect::Error>(())
//! ```
//!
//! ## Logging
//!
//! The queries narrate through the [`log`](https://docs.rs/log) facade: `info` for what is
//! searched and found, `debug` for load progress, `warn` for skipped metadata streams. No logger
//! is installed by this crate.
//!
//! ## Architecture
//!
//! - [`inspector`] - The queries, over a loaded module or a path
//! - [`metadata`] - ECMA-335 headers, streams, tables, signatures and the type model
//! - [`prelude`] - Re-exports of the commonly used types
//! - [`Error`] and [`Result`] - Error handling; every load failure is an [`Error`]
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use dotinspect::prelude::*;
///
/// let module = CilModule::from_file("tests/samples/Sample.dll".as_ref())?;
/// println!("{} types", module.types().len());
/// # Ok::<(), dotinspect::Error>(())
/// ```
pub mod prelude;

/// Queries over the type model of a module
pub mod inspector;

/// .NET metadata parsing based on ECMA-335
///
/// Headers, streams and tables are read from the image and turned into the owned type model of
/// [`metadata::cilmodule::CilModule`].
pub mod metadata;

/// `dotinspect` Result type
///
/// A type alias for `std::result::Result<T, Error>`.
///
/// # Examples
///
/// ```rust,no_run
/// use dotinspect::{Result, CilModule};
///
/// fn load_module(path: &str) -> Result<CilModule> {
///     CilModule::from_file(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dotinspect` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use dotinspect::{Error, CilModule};
///
/// match CilModule::from_file(std::path::Path::new("tests/samples/Native.dll")) {
///     Ok(module) => println!("Loaded {}", module.name()),
///     Err(Error::NotSupported) => println!("Not a .NET module"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// A loaded .NET module; see [`metadata::cilmodule::CilModule`]
pub use metadata::cilmodule::CilModule;

/// The query runner and its results; see [`inspector`]
pub use inspector::{Inspector, MethodDescriptor, TypeDescriptor};

/// Metadata streams for direct access to ECMA-335 heaps.
///
/// - [`Blob`] - Binary blob heap for signatures
/// - [`Guid`] - GUID heap for the module version id
/// - [`Strings`] - String heap for names and identifiers
/// - [`TablesHeader`] - Metadata tables stream
/// - [`StreamHeader`] - Individual stream header information
pub use metadata::streams::{Blob, Guid, StreamHeader, Strings, TablesHeader};

/// Low-level file and byte parsing utilities.
///
/// ```rust
/// use dotinspect::Parser;
///
/// let mut parser = Parser::new(&[0x81, 0x00]);
/// assert_eq!(parser.read_compressed_uint()?, 0x100);
/// # Ok::<(), dotinspect::Error>(())
/// ```
pub use file::{parser::Parser, File};
