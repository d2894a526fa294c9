//! Metadata parsing and representation for .NET assemblies.
//!
//! This module reads the CLI header, the metadata root and its streams according to ECMA-335,
//! and builds an owned type model from the metadata tables.
//!
//! # Key Components
//!
//! - [`cilmodule`] - A loaded module with its types and methods
//! - [`method`] - Methods, their flags and method body headers
//! - [`token`] - Metadata table row references used throughout .NET
//! - [`typesystem`] - Types, type references and the type registry
//! - [`signatures`] - Method, local variable and type specification signatures
//! - [`streams`] - Metadata streams (`#~`, `#Strings`, `#Blob`, `#GUID`)
//! - [`tables`] - Raw rows of the metadata tables the type model is built from
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotinspect::CilModule;
//!
//! let module = CilModule::from_file("tests/samples/Sample.dll".as_ref())?;
//! println!("Module: {} ({})", module.name(), module.version());
//! println!("Types: {}", module.types().len());
//! # Ok::<(), dotinspect::Error>(())
//! ```

/// A loaded module and its type model
pub mod cilmodule;
/// The CLI header
pub mod cor20header;
/// Methods, method flags and method bodies
pub mod method;
/// The metadata root
pub mod root;
/// Signature blobs
pub mod signatures;
/// Metadata streams
pub mod streams;
/// Metadata tables
pub mod tables;
/// Metadata tokens
pub mod token;
/// The type model
pub mod typesystem;
